use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemberCertError {
    #[error("Member secret is empty")]
    EmptySecret,
    #[error("Invalid HMAC key")]
    InvalidKey,
    #[error("Could not read QR code data: {0}")]
    UnreadablePayload(String),
    #[error("Invalid QR code format: {0}")]
    InvalidPayload(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MemberCertError {
    /// Whether this came from reading a scanned QR string
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Self::UnreadablePayload(_) | Self::InvalidPayload(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MemberCertError>;
