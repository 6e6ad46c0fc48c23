//! HTTP routes
//!
//! - [`health`] - liveness probe
//! - [`auth`] - admin portal login
//! - [`board`] - board bios (PIN edits)
//! - [`events`] - events list and admin CRUD
//! - [`tickets`] - volunteer tech requests
//! - [`tasks`] - dashboard task board
//! - [`positions`] - village map positions
//! - [`contact`] - contact form delivery
//! - [`members`] - member roster, login and QR verification

pub mod auth;
pub mod board;
pub mod contact;
pub mod events;
pub mod health;
pub mod members;
pub mod positions;
pub mod tasks;
pub mod tickets;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::response::IntoResponse;
use http::{Method, header};
use shared::error::{AppError, AppResult, ErrorCode};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_LIMIT: usize = 1024 * 1024;

/// Shared admin password check for handlers
pub(crate) fn require_admin(state: &AppState, candidate: Option<&str>) -> AppResult<()> {
    crate::auth::check_admin_password(&state.config.admin_password, candidate)
}

/// Build a router with all routes registered (no outer middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state))
        .merge(board::router(state))
        .merge(events::router())
        .merge(tickets::router())
        .merge(tasks::router())
        .merge(positions::router())
        .merge(contact::router())
        .merge(members::router(state))
}

async fn not_found() -> impl IntoResponse {
    AppError::with_message(ErrorCode::NotFound, "Not found")
}

/// Build the fully configured application: routes, static site fallback,
/// middleware and state
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let router = build_router(&state);
    let router = match &state.config.site_dir {
        Some(dir) => {
            tracing::info!(site_dir = %dir.display(), "Serving static site");
            router.fallback_service(ServeDir::new(dir).fallback(not_found.into_service()))
        }
        None => router.fallback(not_found),
    };

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
