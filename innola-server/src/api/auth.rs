//! Admin portal login
//!
//! Accounts live in `admin_users`; the first login against an empty store
//! seeds them from `ADMIN_BOOTSTRAP_USERS`. A successful login hands back the
//! shared admin password as the API token the portal pages send along.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router, middleware};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::AppError;
use shared::models::{AdminUser, AdminUserInfo};
use shared::util::non_blank;

use crate::auth::admin_users::{authenticate, seed_users};
use crate::auth::rate_limit::admin_login_rate_limit;
use crate::error::ServiceResult;
use crate::kv::{ADMIN_USERS, Binding};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/api/auth",
        post(login).route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_login_rate_limit,
        )),
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

async fn load_users(state: &AppState) -> ServiceResult<Vec<AdminUser>> {
    if let Some(users) = state.docs.load::<Vec<AdminUser>>(ADMIN_USERS).await? {
        return Ok(users);
    }

    let users = seed_users(&state.config.bootstrap_users).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash bootstrap users");
        AppError::internal("Failed to initialize admin users")
    })?;
    state.docs.save(ADMIN_USERS, &users).await?;
    tracing::info!(count = users.len(), "Admin users seeded");
    Ok(users)
}

/// POST /api/auth
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<Json<Value>> {
    let (Some(username), Some(password)) = (
        non_blank(req.username.as_deref()),
        non_blank(req.password.as_deref()),
    ) else {
        return Err(AppError::validation("Username and password are required").into());
    };

    state.docs.ensure_bound(Binding::Board)?;
    let users = load_users(&state).await?;

    let Some(user) = authenticate(&users, username, password) else {
        tracing::warn!(username = %username.to_lowercase(), "Admin login failed");
        return Err(AppError::invalid_credentials().into());
    };

    tracing::info!(username = %user.username, "Admin login");
    Ok(Json(json!({
        "success": true,
        "user": AdminUserInfo::from(user),
        "apiToken": state.config.admin_password,
    })))
}
