//! Volunteer tech requests (admin only)

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Ticket, TicketComment, TicketCreate, TicketPriority, TicketStatus, TicketUpdate,
    TicketsDocument,
};
use shared::util::{non_blank, now_iso, record_id};

use super::require_admin;
use crate::email::ticket_email;
use crate::error::ServiceResult;
use crate::kv::{ALL_TICKETS, Binding};
use crate::state::AppState;

const DEFAULT_COMMENT_AUTHOR: &str = "Board Member";

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/tickets",
        get(list).post(create).put(update).delete(remove),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuery {
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub admin_password: Option<String>,
    #[serde(flatten)]
    pub ticket: TicketCreate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub admin_password: Option<String>,
    pub ticket_id: Option<String>,
    #[serde(flatten)]
    pub update: TicketUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketIdRequest {
    pub admin_password: Option<String>,
    pub ticket_id: Option<String>,
}

fn no_tickets() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "No tickets found")
}

fn ticket_id(value: &Option<String>) -> Result<&str, AppError> {
    non_blank(value.as_deref()).ok_or_else(|| AppError::validation("Missing ticket ID"))
}

/// GET /api/tickets?adminPassword=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> ServiceResult<Json<Value>> {
    require_admin(&state, query.admin_password.as_deref())?;

    if !state.docs.is_bound(Binding::Tickets) {
        return Ok(Json(json!({ "error": "KV not configured", "tickets": [] })));
    }

    let doc: TicketsDocument = state.docs.load_or_default(ALL_TICKETS).await?;
    let tickets: Vec<Ticket> = doc.sorted().iter().map(Ticket::sanitized).collect();
    Ok(Json(json!({ "tickets": tickets })))
}

/// Notification failures are logged and never fail the request
async fn notify(state: &AppState, ticket: &Ticket) {
    let email = ticket_email(
        &state.config.contact_from_email,
        &state.config.notify_email,
        ticket,
    );
    if let Err(e) = state.mailer.send(email).await {
        tracing::warn!(ticket_id = %ticket.id, error = %e, "Ticket notification failed");
    }
}

/// POST /api/tickets
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTicketRequest>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    state.docs.ensure_bound(Binding::Tickets)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let t = &req.ticket;
    let title = non_blank(t.title.as_deref()).ok_or_else(|| AppError::required_field("title"))?;
    let description = non_blank(t.description.as_deref())
        .ok_or_else(|| AppError::required_field("description"))?;

    let now = now_iso();
    let ticket = Ticket {
        id: record_id(None),
        title: title.to_string(),
        description: description.to_string(),
        priority: t
            .priority
            .as_deref()
            .and_then(TicketPriority::parse)
            .unwrap_or_default(),
        status: TicketStatus::Open,
        submitted_by: t
            .submitted_by
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        created_at: now.clone(),
        updated_at: now,
        comments: Vec::new(),
    };

    let mut doc: TicketsDocument = state.docs.load_or_default(ALL_TICKETS).await?;
    doc.tickets.push(ticket.clone());
    state.docs.save(ALL_TICKETS, &doc).await?;
    tracing::info!(ticket_id = %ticket.id, priority = ?ticket.priority, "Ticket created");

    notify(&state, &ticket).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "ticket": ticket.sanitized(),
            "message": "Ticket created successfully!",
        })),
    ))
}

/// PUT /api/tickets
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateTicketRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Tickets)?;
    require_admin(&state, req.admin_password.as_deref())?;
    let id = ticket_id(&req.ticket_id)?;

    let mut doc = state
        .docs
        .load::<TicketsDocument>(ALL_TICKETS)
        .await?
        .ok_or_else(no_tickets)?;
    let ticket = doc
        .tickets
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| AppError::not_found("Ticket"))?;

    let u = &req.update;
    let now = now_iso();
    if let Some(comment) = &u.add_comment {
        let text = non_blank(comment.text.as_deref())
            .ok_or_else(|| AppError::validation("Comment text is required"))?;
        ticket.comments.push(TicketComment {
            text: text.to_string(),
            author: non_blank(comment.author.as_deref())
                .unwrap_or(DEFAULT_COMMENT_AUTHOR)
                .to_string(),
            created_at: now.clone(),
        });
    }

    if let Some(title) = non_blank(u.title.as_deref()) {
        ticket.title = title.to_string();
    }
    if let Some(description) = non_blank(u.description.as_deref()) {
        ticket.description = description.to_string();
    }
    if let Some(priority) = u.priority.as_deref().and_then(TicketPriority::parse) {
        ticket.priority = priority;
    }
    if let Some(status) = u.status.as_deref().and_then(TicketStatus::parse) {
        ticket.status = status;
    }
    if let Some(submitted_by) = u.submitted_by.as_deref() {
        ticket.submitted_by = submitted_by.trim().to_string();
    }
    ticket.updated_at = now;
    let ticket = ticket.clone();

    state.docs.save(ALL_TICKETS, &doc).await?;
    tracing::info!(ticket_id = %ticket.id, status = ?ticket.status, "Ticket updated");

    let message = if u.add_comment.is_some() {
        "Comment added successfully"
    } else {
        "Ticket updated successfully"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "ticket": ticket.sanitized(),
    })))
}

/// DELETE /api/tickets
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<TicketIdRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Tickets)?;
    require_admin(&state, req.admin_password.as_deref())?;
    let id = ticket_id(&req.ticket_id)?;

    let mut doc = state
        .docs
        .load::<TicketsDocument>(ALL_TICKETS)
        .await?
        .ok_or_else(no_tickets)?;
    let before = doc.tickets.len();
    doc.tickets.retain(|t| t.id != id);
    if doc.tickets.len() == before {
        return Err(AppError::not_found("Ticket").into());
    }

    state.docs.save(ALL_TICKETS, &doc).await?;
    tracing::info!(ticket_id = %id, "Ticket deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Ticket deleted successfully",
    })))
}
