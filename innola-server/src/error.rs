//! Unified service-layer error type
//!
//! `ServiceError` bridges store and mailer errors into the API-layer error
//! (`AppError`) so handlers can use `?` everywhere.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use std::sync::OnceLock;

use crate::email::MailError;
use crate::kv::StoreError;

static DEBUG_ERRORS: OnceLock<bool> = OnceLock::new();

/// Attach underlying error detail to 500 responses (`DEBUG=true`).
/// Only the first call has an effect.
pub fn set_debug_errors(enabled: bool) {
    let _ = DEBUG_ERRORS.set(enabled);
}

fn debug_errors() -> bool {
    DEBUG_ERRORS.get().copied().unwrap_or(false)
}

/// Service-layer error
///
/// - `Store`: key-value store errors (an unbound binding is a configuration
///   error, anything else is logged and mapped to StoreError)
/// - `Mail`: outbound mail failures
/// - `App`: business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Mail(MailError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<MailError> for ServiceError {
    fn from(e: MailError) -> Self {
        ServiceError::Mail(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl ServiceError {
    /// Map to the client-facing error, with detail attached when `debug` is set
    pub fn into_app_error(self, debug: bool) -> AppError {
        match self {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(StoreError::Unbound(binding)) => {
                tracing::error!(binding = %binding, "KV binding not configured");
                AppError::config(format!("{binding} not configured"))
            }
            ServiceError::Store(err) => {
                tracing::error!(error = %err, "Service storage error");
                let app_err = AppError::new(ErrorCode::StoreError);
                if debug {
                    app_err.with_detail("debug", err.to_string())
                } else {
                    app_err
                }
            }
            ServiceError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery error");
                let app_err = AppError::new(ErrorCode::MailError);
                if debug {
                    app_err.with_detail("debug", err.to_string())
                } else {
                    app_err
                }
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        e.into_app_error(debug_errors())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
