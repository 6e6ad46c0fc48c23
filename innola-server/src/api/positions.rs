//! Village map cottage positions

use std::sync::LazyLock;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use shared::error::AppError;
use shared::models::{POSITION_PROPERTIES, VillagePositions};

use super::require_admin;
use crate::error::ServiceResult;
use crate::kv::{Binding, VILLAGE_POSITIONS};
use crate::state::AppState;

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?%$").expect("valid percentage pattern"));

pub fn router() -> Router<AppState> {
    Router::new().route("/api/village-positions", get(list).put(save))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePositionsRequest {
    pub admin_password: Option<String>,
    pub positions: Option<Value>,
}

/// GET /api/village-positions
pub async fn list(State(state): State<AppState>) -> ServiceResult<Json<Value>> {
    if !state.docs.is_bound(Binding::Board) {
        return Ok(Json(json!({})));
    }
    let positions: VillagePositions = state.docs.load_or_default(VILLAGE_POSITIONS).await?;
    Ok(Json(json!(positions)))
}

/// Check every cottage entry and convert to the stored shape
fn validate(positions: &Map<String, Value>) -> Result<VillagePositions, AppError> {
    let mut out = VillagePositions::new();
    for (key, pos) in positions {
        let Value::Object(props) = pos else {
            return Err(AppError::validation(format!("Invalid position for \"{key}\"")));
        };
        let mut cottage = shared::models::CottagePosition::new();
        for (prop, val) in props {
            if !POSITION_PROPERTIES.contains(&prop.as_str()) {
                return Err(AppError::validation(format!(
                    "Invalid CSS property \"{prop}\" for \"{key}\""
                )));
            }
            let value = match val {
                Value::Null => None,
                Value::String(s) if PERCENTAGE.is_match(s) => Some(s.clone()),
                other => {
                    let shown = other.as_str().map_or_else(|| other.to_string(), str::to_string);
                    return Err(AppError::validation(format!(
                        "Invalid value \"{shown}\" for \"{key}.{prop}\" - must be a percentage like \"42%\""
                    )));
                }
            };
            cottage.insert(prop.clone(), value);
        }
        out.insert(key.clone(), cottage);
    }
    Ok(out)
}

/// PUT /api/village-positions
pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SavePositionsRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Board)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let Some(Value::Object(raw)) = &req.positions else {
        return Err(AppError::validation("Missing or invalid positions object").into());
    };
    let positions = validate(raw)?;

    state.docs.save(VILLAGE_POSITIONS, &positions).await?;
    tracing::info!(cottages = positions.len(), "Village positions saved");

    Ok(Json(json!({ "success": true, "message": "Positions saved" })))
}
