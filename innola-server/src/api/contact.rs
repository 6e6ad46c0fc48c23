//! Public contact form

use std::sync::LazyLock;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::routing::post;
use axum::{Form, Json, Router};
use http::header;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::AppError;
use shared::util::non_blank;

use crate::email::contact_email;
use crate::error::ServiceResult;
use crate::state::AppState;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub fn router() -> Router<AppState> {
    Router::new().route("/api/contact", post(submit))
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Collect the text fields of a `multipart/form-data` body
async fn read_multipart(mut multipart: Multipart) -> Result<ContactForm, String> {
    let mut form = ContactForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let slot = match field.name() {
            Some("name") => &mut form.name,
            Some("email") => &mut form.email,
            Some("message") => &mut form.message,
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(|e| e.body_text())?);
    }
    Ok(form)
}

/// Accept JSON, an urlencoded form or a multipart form, chosen by content type
async fn read_form(state: &AppState, req: Request) -> Result<ContactForm, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let parsed = if content_type.contains("application/json") {
        Json::<ContactForm>::from_request(req, state)
            .await
            .map(|Json(f)| f)
            .map_err(|e| e.body_text())
    } else if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(e) => Err(e.body_text()),
        }
    } else if content_type.contains("form") {
        Form::<ContactForm>::from_request(req, state)
            .await
            .map(|Form(f)| f)
            .map_err(|e| e.body_text())
    } else {
        return Err(AppError::validation("Invalid content type"));
    };

    parsed.map_err(|reason| {
        tracing::debug!(reason = %reason, "Contact body rejected");
        AppError::validation("Failed to parse request")
    })
}

/// POST /api/contact
pub async fn submit(State(state): State<AppState>, req: Request) -> ServiceResult<Json<Value>> {
    let form = read_form(&state, req).await?;

    let name = non_blank(form.name.as_deref());
    let email = non_blank(form.email.as_deref());
    let message = non_blank(form.message.as_deref());
    let (Some(name), Some(email), Some(message)) = (name, email, message) else {
        return Err(AppError::validation("Missing required fields")
            .with_detail(
                "fields",
                json!({
                    "name": name.is_none(),
                    "email": email.is_none(),
                    "message": message.is_none(),
                }),
            )
            .into());
    };

    if !EMAIL_SHAPE.is_match(email) {
        return Err(AppError::validation("Invalid email address").into());
    }

    let outgoing = contact_email(
        &state.config.contact_from_email,
        &state.config.contact_to_email,
        name,
        email,
        message,
    );
    state.mailer.send(outgoing).await?;
    tracing::info!("Contact message delivered");

    Ok(Json(json!({
        "success": true,
        "message": "Your message has been sent. We'll be in touch soon!",
    })))
}
