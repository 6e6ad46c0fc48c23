//! Unified error codes for the site service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Membership errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the browser scripts can
/// branch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Invalid username/PIN pair
    InvalidPin = 1003,
    /// Shared admin password rejected
    InvalidAdminPassword = 1004,
    /// Too many attempts from the same client
    TooManyAttempts = 1005,

    // ==================== 3xxx: Membership ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Member email already registered
    MemberEmailExists = 3002,
    /// CSV roster could not be parsed
    RosterInvalid = 3003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Key-value store error
    StoreError = 9002,
    /// Configuration error (binding or secret missing)
    ConfigError = 9003,
    /// Outbound mail delivery failed
    MailError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::InvalidPin => "Invalid username or PIN",
            ErrorCode::InvalidAdminPassword => "Invalid admin password",
            ErrorCode::TooManyAttempts => "Too many requests, try again later",

            // Membership
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberEmailExists => "Email already exists",
            ErrorCode::RosterInvalid => "Invalid CSV roster",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreError => "Storage error",
            ErrorCode::ConfigError => "Server not configured",
            ErrorCode::MailError => "Failed to send message. Please try again later.",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::InvalidPin),
            1004 => Ok(ErrorCode::InvalidAdminPassword),
            1005 => Ok(ErrorCode::TooManyAttempts),

            // Membership
            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::MemberEmailExists),
            3003 => Ok(ErrorCode::RosterInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StoreError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::MailError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
