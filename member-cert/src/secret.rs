use crate::error::{MemberCertError, Result};
use std::fmt;
use zeroize::Zeroize;

/// Server-held HMAC key for member signatures
///
/// Any non-empty length is accepted here; minimum-length policy belongs to
/// whoever loads the secret.
#[derive(Clone)]
pub struct MemberSecret {
    key: Vec<u8>,
}

impl Drop for MemberSecret {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for MemberSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberSecret")
            .field("len", &self.key.len())
            .finish_non_exhaustive()
    }
}

impl MemberSecret {
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(MemberCertError::EmptySecret);
        }
        Ok(Self { key })
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}
