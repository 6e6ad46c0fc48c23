//! Membership signatures and QR payloads
//!
//! ```
//! use member_cert::{MemberSecret, QrPayload, sign, verify};
//!
//! let secret = MemberSecret::new("test-secret-32-bytes-minimum-xx").unwrap();
//! let sig = sign("MEM-2025-001", &secret).unwrap();
//! assert!(verify("MEM-2025-001", &sig, &secret).unwrap());
//!
//! let qr = QrPayload::for_member("MEM-2025-001", &secret).unwrap();
//! assert_eq!(QrPayload::parse(&qr.to_qr_string().unwrap()).unwrap(), qr);
//! ```

mod error;
mod payload;
mod secret;
pub mod signature;

pub use error::{MemberCertError, Result};
pub use payload::{PAYLOAD_VERSION, QrPayload};
pub use secret::MemberSecret;
pub use signature::{SIGNATURE_HEX_LEN, sign, verify};
