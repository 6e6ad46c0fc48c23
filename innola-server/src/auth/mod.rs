//! Request authentication: shared admin password, board PINs, admin users

pub mod admin_users;
pub mod rate_limit;

use shared::error::{AppError, AppResult};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// Constant-time string equality
pub fn secret_eq(candidate: &str, expected: &str) -> bool {
    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Check the shared admin password carried by a request
pub fn check_admin_password(expected: &str, candidate: Option<&str>) -> AppResult<()> {
    match candidate {
        Some(c) if !c.is_empty() && secret_eq(c, expected) => Ok(()),
        _ => {
            tracing::warn!("Rejected admin password");
            Err(AppError::invalid_admin_password())
        }
    }
}

/// Per-person board bio PINs (username -> PIN)
#[derive(Debug, Clone, Default)]
pub struct PinBook {
    pins: HashMap<String, String>,
}

impl PinBook {
    pub fn new(pins: HashMap<String, String>) -> Self {
        Self {
            pins: pins
                .into_iter()
                .map(|(user, pin)| (user.trim().to_lowercase(), pin))
                .collect(),
        }
    }

    /// Whether `pin` unlocks `username`'s own record
    pub fn verify(&self, username: &str, pin: &str) -> bool {
        match self.pins.get(username) {
            Some(expected) => secret_eq(pin, expected),
            // Still compare so the miss costs the same
            None => {
                let _ = secret_eq(pin, "000000");
                false
            }
        }
    }
}
