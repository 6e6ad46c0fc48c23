//! Events: public listing, admin CRUD, one-time seeding

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{Event, EventCreate, EventListing, EventUpdate, EventsDocument};
use shared::util::{non_blank, now_iso, record_id, today_utc};

use super::require_admin;
use crate::error::ServiceResult;
use crate::kv::{ALL_EVENTS, Binding};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/events",
            get(list).post(create).put(update).delete(remove),
        )
        .route("/api/events/seed", post(seed))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub admin_password: Option<String>,
    #[serde(flatten)]
    pub event: EventCreate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub admin_password: Option<String>,
    pub event_id: Option<String>,
    #[serde(flatten)]
    pub update: EventUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventIdRequest {
    pub admin_password: Option<String>,
    pub event_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRequest {
    pub admin_password: Option<String>,
}

fn no_events() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "No events found")
}

/// GET /api/events
pub async fn list(State(state): State<AppState>) -> ServiceResult<Json<Value>> {
    if !state.docs.is_bound(Binding::Events) {
        return Ok(Json(json!({
            "error": "KV not configured",
            "events": EventListing::default(),
        })));
    }

    let doc: EventsDocument = state.docs.load_or_default(ALL_EVENTS).await?;
    Ok(Json(json!(EventListing::split(doc.events, today_utc()))))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    non_blank(value.as_deref()).ok_or_else(|| AppError::required_field(field))
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    state.docs.ensure_bound(Binding::Events)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let e = &req.event;
    let title = required(&e.title, "title")?;
    let date = required(&e.date, "date")?;
    let location = required(&e.location, "location")?;
    let description = required(&e.description, "description")?;

    let event = Event {
        id: record_id(None),
        title: title.to_string(),
        date: date.to_string(),
        time: trimmed(&e.time),
        location: location.to_string(),
        description: description.to_string(),
        emoji: trimmed(&e.emoji),
        cost: trimmed(&e.cost),
        contact: trimmed(&e.contact),
        notes: trimmed(&e.notes),
        facebook: trimmed(&e.facebook),
        instagram: trimmed(&e.instagram),
        created_at: now_iso(),
        updated_at: None,
    };

    let mut doc: EventsDocument = state.docs.load_or_default(ALL_EVENTS).await?;
    doc.events.push(event.clone());
    state.docs.save(ALL_EVENTS, &doc).await?;
    tracing::info!(event_id = %event.id, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "event": event,
            "message": "Event added successfully!",
        })),
    ))
}

/// PUT /api/events
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateEventRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Events)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let event_id = non_blank(req.event_id.as_deref())
        .ok_or_else(|| AppError::validation("Missing event ID"))?;

    let mut doc = state
        .docs
        .load::<EventsDocument>(ALL_EVENTS)
        .await?
        .ok_or_else(no_events)?;
    let event = doc
        .events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or_else(|| AppError::not_found("Event"))?;
    event.apply(&req.update, now_iso());
    let event = event.clone();

    state.docs.save(ALL_EVENTS, &doc).await?;
    tracing::info!(event_id = %event.id, "Event updated");

    Ok(Json(json!({
        "success": true,
        "message": "Event updated successfully",
        "event": event,
    })))
}

/// DELETE /api/events
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<EventIdRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Events)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let event_id = non_blank(req.event_id.as_deref())
        .ok_or_else(|| AppError::validation("Missing event ID"))?;

    let mut doc = state
        .docs
        .load::<EventsDocument>(ALL_EVENTS)
        .await?
        .ok_or_else(no_events)?;
    let before = doc.events.len();
    doc.events.retain(|e| e.id != event_id);
    if doc.events.len() == before {
        return Err(AppError::not_found("Event").into());
    }

    state.docs.save(ALL_EVENTS, &doc).await?;
    tracing::info!(event_id = %event_id, "Event deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Event deleted successfully",
    })))
}

/// POST /api/events/seed
pub async fn seed(
    State(state): State<AppState>,
    Json(req): Json<SeedRequest>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    state.docs.ensure_bound(Binding::Events)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let existing: EventsDocument = state.docs.load_or_default(ALL_EVENTS).await?;
    if !existing.events.is_empty() {
        return Err(AppError::validation(
            "Events already exist in KV. Delete them first if you want to reseed.",
        )
        .with_detail("existingCount", existing.events.len())
        .into());
    }

    let doc = EventsDocument {
        events: state.seeds.events.clone(),
    };
    state.docs.save(ALL_EVENTS, &doc).await?;
    tracing::info!(count = doc.events.len(), "Events seeded");

    let summary: Vec<Value> = doc
        .events
        .iter()
        .map(|e| json!({ "id": e.id, "title": e.title, "date": e.date }))
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Events seeded successfully!",
            "count": doc.events.len(),
            "events": summary,
        })),
    ))
}
