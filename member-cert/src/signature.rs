//! Member signatures: truncated HMAC-SHA256 over the member id
//!
//! A signature is the first 12 lowercase hex characters (6 bytes) of
//! `HMAC-SHA256(secret, member_id)`. It is short enough to sit in a QR code
//! next to the id and is recomputed on every verification.

use crate::error::{MemberCertError, Result};
use crate::secret::MemberSecret;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex characters in a signature
pub const SIGNATURE_HEX_LEN: usize = 12;

fn mac_for(identifier: &str, secret: &MemberSecret) -> Result<HmacSha256> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| MemberCertError::InvalidKey)?;
    mac.update(identifier.as_bytes());
    Ok(mac)
}

/// Deterministic signature for a member id
pub fn sign(identifier: &str, secret: &MemberSecret) -> Result<String> {
    let tag = mac_for(identifier, secret)?.finalize().into_bytes();
    Ok(hex::encode(&tag[..SIGNATURE_HEX_LEN / 2]))
}

fn is_signature_shaped(candidate: &str) -> bool {
    candidate.len() == SIGNATURE_HEX_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Check a presented signature against the member id.
///
/// The HMAC is always computed. A candidate that is not exactly 12
/// lowercase hex characters never matches; otherwise the comparison is
/// constant-time.
pub fn verify(identifier: &str, candidate: &str, secret: &MemberSecret) -> Result<bool> {
    let mac = mac_for(identifier, secret)?;
    if !is_signature_shaped(candidate) {
        return Ok(false);
    }
    let Ok(tag) = hex::decode(candidate) else {
        return Ok(false);
    };
    Ok(mac.verify_truncated_left(&tag).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> MemberSecret {
        MemberSecret::new("test-secret-32-bytes-minimum-xx").unwrap()
    }

    #[test]
    fn test_known_signature() {
        assert_eq!(sign("MEM-2025-001", &secret()).unwrap(), "4dfadc7ec768");
        assert_eq!(sign("MEM-2025-002", &secret()).unwrap(), "55564ba9dcf3");
    }

    #[test]
    fn test_shape_check() {
        assert!(is_signature_shaped("4dfadc7ec768"));
        assert!(!is_signature_shaped("4DFADC7EC768"));
        assert!(!is_signature_shaped("4dfadc7ec76"));
        assert!(!is_signature_shaped("4dfadc7ec7680"));
        assert!(!is_signature_shaped("4dfadc7ec76g"));
        assert!(!is_signature_shaped(""));
    }

    #[test]
    fn test_verify_rejects_prefix_of_valid_signature() {
        // A shorter tag is a left-truncation of the real one but must not pass
        assert!(!verify("MEM-2025-001", "4dfadc", &secret()).unwrap());
        assert!(verify("MEM-2025-001", "4dfadc7ec768", &secret()).unwrap());
    }
}
