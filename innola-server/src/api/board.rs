//! Board member bios
//!
//! Anyone may read the roster; each board member edits only their own bio,
//! authenticated by username + PIN.

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use shared::error::AppError;
use shared::models::{BoardDocument, BoardProfileUpdate};
use shared::util::{non_blank, now_iso};

use crate::auth::rate_limit::board_pin_rate_limit;
use crate::error::ServiceResult;
use crate::kv::{BOARD_MEMBERS, Binding};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/board", get(list))
        .route(
            "/api/board",
            put(update).route_layer(middleware::from_fn_with_state(
                state.clone(),
                board_pin_rate_limit,
            )),
        )
}

fn seeded(state: &AppState) -> BoardDocument {
    BoardDocument {
        members: state.seeds.board.clone(),
    }
}

/// GET /api/board
pub async fn list(State(state): State<AppState>) -> ServiceResult<Json<Value>> {
    if !state.docs.is_bound(Binding::Board) {
        let mut doc = seeded(&state);
        doc.sort_by_order();
        return Ok(Json(json!({ "members": doc.members, "source": "default" })));
    }

    let mut doc = match state.docs.load::<BoardDocument>(BOARD_MEMBERS).await? {
        Some(doc) => doc,
        None => {
            let doc = seeded(&state);
            state.docs.save(BOARD_MEMBERS, &doc).await?;
            tracing::info!(count = doc.members.len(), "Board roster initialized");
            doc
        }
    };
    doc.sort_by_order();
    Ok(Json(json!({ "members": doc.members })))
}

/// PUT /api/board
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<BoardProfileUpdate>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Board)?;

    let username = non_blank(req.username.as_deref()).map(str::to_lowercase);
    let pin = non_blank(req.pin.as_deref());
    let (Some(username), Some(pin)) = (username, pin) else {
        return Err(AppError::validation("Username and PIN required").into());
    };

    if !state.pins.verify(&username, pin) {
        tracing::warn!(username = %username, "Board PIN rejected");
        return Err(AppError::invalid_pin().into());
    }

    let mut doc = state
        .docs
        .load::<BoardDocument>(BOARD_MEMBERS)
        .await?
        .unwrap_or_else(|| seeded(&state));

    let Some(member) = doc.members.iter_mut().find(|m| m.id == username) else {
        return Err(AppError::not_found("Member").into());
    };
    member.apply(&req, now_iso());
    let member = member.clone();

    state.docs.save(BOARD_MEMBERS, &doc).await?;
    tracing::info!(username = %username, "Board bio updated");

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "member": member,
    })))
}
