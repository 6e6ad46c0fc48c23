//! Member roster: CSV import, member login, QR verification, admin listing
//! and batch QR issuance

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use chrono::Datelike;
use member_cert::{MemberSecret, QrPayload};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{MemberProfile, MemberTier, MemberUpdate, MembersDocument};
use shared::util::{non_blank, now_iso, parse_calendar_date, today_utc};

use super::require_admin;
use crate::auth::rate_limit::member_login_rate_limit;
use crate::auth::secret_eq;
use crate::error::ServiceResult;
use crate::kv::{ALL_MEMBERS, Binding};
use crate::membership::{Verification, import_rows, parse_roster, verify_membership, verify_scan};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/members", get(list).put(update))
        .route("/api/members/import", post(import))
        .route(
            "/api/members/login",
            post(login).route_layer(middleware::from_fn_with_state(
                state.clone(),
                member_login_rate_limit,
            )),
        )
        .route("/api/members/verify", get(verify))
        .route("/api/members/scan", post(scan))
        .route("/api/members/qr/batch", post(qr_batch))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuery {
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub admin_password: Option<String>,
    pub csv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemberLoginRequest {
    pub username: Option<String>,
    pub pin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub id: Option<String>,
    pub sig: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub qr: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub admin_password: Option<String>,
    pub member_id: Option<String>,
    #[serde(flatten)]
    pub update: MemberUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrBatchRequest {
    pub admin_password: Option<String>,
    pub member_ids: Option<Value>,
}

fn require_secret(state: &AppState) -> Result<&MemberSecret, AppError> {
    state
        .member_secret()
        .ok_or_else(|| AppError::config("MEMBER_SECRET not configured"))
}

fn member_not_found() -> AppError {
    AppError::with_message(ErrorCode::MemberNotFound, "Member not found")
}

fn signing_failed(e: member_cert::MemberCertError) -> AppError {
    tracing::error!(error = %e, "Member signature failed");
    AppError::internal("Failed to sign member credentials")
}

/// POST /api/members/import
pub async fn import(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Members)?;
    let secret = require_secret(&state)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let csv = non_blank(req.csv.as_deref()).ok_or_else(|| AppError::validation("Missing CSV data"))?;
    let today = today_utc();
    let rows = parse_roster(csv, today)
        .map_err(|e| AppError::with_message(ErrorCode::RosterInvalid, e.to_string()))?;

    let mut doc: MembersDocument = state.docs.load_or_default(ALL_MEMBERS).await?;
    let report = import_rows(&mut doc, rows, secret, today.year()).map_err(signing_failed)?;

    state.docs.save(ALL_MEMBERS, &doc).await?;
    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        total = report.total_members,
        "Member roster imported"
    );

    Ok(Json(json!({
        "success": true,
        "imported": report.imported,
        "skipped": report.skipped,
        "totalMembers": report.total_members,
    })))
}

/// POST /api/members/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<MemberLoginRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Members)?;

    let (Some(username), Some(pin)) = (
        non_blank(req.username.as_deref()),
        non_blank(req.pin.as_deref()),
    ) else {
        return Err(AppError::validation("Username and PIN required").into());
    };

    let doc: MembersDocument = state.docs.load_or_default(ALL_MEMBERS).await?;
    let Some(member) = doc
        .find_by_username(username)
        .filter(|m| secret_eq(pin, &m.pin))
    else {
        tracing::warn!(username = %username.to_lowercase(), "Member login failed");
        return Err(AppError::invalid_pin().into());
    };

    tracing::info!(member_id = %member.id, "Member login");
    Ok(Json(json!({
        "success": true,
        "member": MemberProfile::from(member),
    })))
}

/// GET /api/members/verify?id=&sig=
pub async fn verify(State(state): State<AppState>, Query(query): Query<VerifyQuery>) -> Verification {
    verify_membership(
        &state.docs,
        state.member_secret(),
        query.id.as_deref(),
        query.sig.as_deref(),
        today_utc(),
    )
    .await
}

/// POST /api/members/scan
pub async fn scan(State(state): State<AppState>, Json(req): Json<ScanRequest>) -> Verification {
    verify_scan(
        &state.docs,
        state.member_secret(),
        req.qr.as_deref(),
        today_utc(),
    )
    .await
}

/// GET /api/members?adminPassword=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Members)?;
    require_admin(&state, query.admin_password.as_deref())?;

    let doc: MembersDocument = state.docs.load_or_default(ALL_MEMBERS).await?;
    let members: Vec<MemberProfile> = doc.members.iter().map(MemberProfile::listing).collect();
    Ok(Json(json!({ "members": members })))
}

/// PUT /api/members
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateMemberRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Members)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let member_id = non_blank(req.member_id.as_deref())
        .ok_or_else(|| AppError::validation("Missing member ID"))?;

    let u = &req.update;
    let expiration = match non_blank(u.expiration_date.as_deref()) {
        Some(raw) => Some(
            parse_calendar_date(raw)
                .ok_or_else(|| AppError::validation("Invalid expiration date"))?,
        ),
        None => None,
    };

    let mut doc: MembersDocument = state.docs.load_or_default(ALL_MEMBERS).await?;
    if doc.find(member_id).is_none() {
        return Err(member_not_found().into());
    }

    let email = non_blank(u.email.as_deref()).map(str::to_lowercase);
    if let Some(email) = &email
        && doc.email_taken(email, Some(member_id))
    {
        return Err(AppError::conflict(ErrorCode::MemberEmailExists, "Email already exists").into());
    }

    let member = doc.find_mut(member_id).ok_or_else(member_not_found)?;
    if let Some(name) = non_blank(u.name.as_deref()) {
        member.name = name.to_string();
    }
    if let Some(email) = email {
        member.email = email;
    }
    if let Some(tier) = non_blank(u.member_type.as_deref()) {
        member.member_type = MemberTier::from(tier);
    }
    if let Some(date) = expiration {
        member.expiration_date = date.format("%Y-%m-%d").to_string();
    }
    member.updated_at = Some(now_iso());
    let profile = MemberProfile::listing(member);

    state.docs.save(ALL_MEMBERS, &doc).await?;
    tracing::info!(member_id = %member_id, "Member updated");

    Ok(Json(json!({ "success": true, "member": profile })))
}

/// POST /api/members/qr/batch
pub async fn qr_batch(
    State(state): State<AppState>,
    Json(req): Json<QrBatchRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Members)?;
    require_admin(&state, req.admin_password.as_deref())?;
    let secret = require_secret(&state)?;

    let Some(ids) = req.member_ids.as_ref().and_then(Value::as_array) else {
        return Err(AppError::validation("memberIds array required").into());
    };

    let Some(doc) = state.docs.load::<MembersDocument>(ALL_MEMBERS).await? else {
        return Err(AppError::with_message(ErrorCode::NotFound, "No members found").into());
    };

    let mut qr_data = Vec::new();
    for id in ids.iter().filter_map(Value::as_str) {
        let Some(member) = doc.find(id) else {
            continue;
        };
        let payload = QrPayload::for_member(&member.id, secret).map_err(signing_failed)?;
        let qr_string = payload.to_qr_string().map_err(signing_failed)?;
        qr_data.push(json!({
            "id": member.id,
            "name": member.name,
            "memberType": member.member_type,
            "qrString": qr_string,
        }));
    }

    tracing::info!(requested = ids.len(), issued = qr_data.len(), "QR batch issued");
    Ok(Json(json!({ "qrData": qr_data })))
}
