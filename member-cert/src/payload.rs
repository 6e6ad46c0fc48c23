//! QR code payload: `{"v":1,"id":"MEM-2025-001","sig":"4dfadc7ec768"}`

use crate::error::{MemberCertError, Result};
use crate::secret::MemberSecret;
use crate::signature::sign;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PAYLOAD_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub v: u64,
    pub id: String,
    pub sig: String,
}

impl QrPayload {
    /// Payload for a member, signature computed from the secret
    pub fn for_member(id: &str, secret: &MemberSecret) -> Result<Self> {
        Ok(Self {
            v: PAYLOAD_VERSION,
            id: id.to_string(),
            sig: sign(id, secret)?,
        })
    }

    /// Compact JSON, field order `v`, `id`, `sig`
    pub fn to_qr_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a scanned QR string.
    ///
    /// Not JSON → [`MemberCertError::UnreadablePayload`]; missing or blank
    /// `id`/`sig`, or a version other than 1 → [`MemberCertError::InvalidPayload`].
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|e| MemberCertError::UnreadablePayload(e.to_string()))?;

        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let v = value
            .get("v")
            .and_then(Value::as_u64)
            .ok_or(MemberCertError::InvalidPayload("missing version"))?;
        if v != PAYLOAD_VERSION {
            return Err(MemberCertError::InvalidPayload("unsupported version"));
        }
        let id = field("id").ok_or(MemberCertError::InvalidPayload("missing id"))?;
        let sig = field("sig").ok_or(MemberCertError::InvalidPayload("missing sig"))?;

        Ok(Self { v, id, sig })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_string_is_compact_and_ordered() {
        let payload = QrPayload {
            v: 1,
            id: "MEM-2025-001".to_string(),
            sig: "4dfadc7ec768".to_string(),
        };
        assert_eq!(
            payload.to_qr_string().unwrap(),
            r#"{"v":1,"id":"MEM-2025-001","sig":"4dfadc7ec768"}"#
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            QrPayload::parse("https://example.org"),
            Err(MemberCertError::UnreadablePayload(_))
        ));
        assert!(matches!(
            QrPayload::parse(r#"{"v":1,"id":"MEM-2025-001"}"#),
            Err(MemberCertError::InvalidPayload("missing sig"))
        ));
        assert!(matches!(
            QrPayload::parse(r#"{"v":2,"id":"MEM-2025-001","sig":"4dfadc7ec768"}"#),
            Err(MemberCertError::InvalidPayload("unsupported version"))
        ));
        assert!(matches!(
            QrPayload::parse(r#"{"id":"MEM-2025-001","sig":"4dfadc7ec768"}"#),
            Err(MemberCertError::InvalidPayload("missing version"))
        ));
        assert!(matches!(
            QrPayload::parse(r#"{"v":1,"id":"  ","sig":"4dfadc7ec768"}"#),
            Err(MemberCertError::InvalidPayload("missing id"))
        ));
    }

    #[test]
    fn test_parse_ok() {
        let p = QrPayload::parse(r#" {"v":1,"id":"MEM-2025-001","sig":"4dfadc7ec768"} "#).unwrap();
        assert_eq!(p.id, "MEM-2025-001");
        assert_eq!(p.sig, "4dfadc7ec768");
    }
}
