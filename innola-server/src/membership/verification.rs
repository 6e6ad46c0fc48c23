//! Membership verification: signature, lookup, expiration

use crate::kv::{ALL_MEMBERS, Binding, Documents};
use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use http::StatusCode;
use member_cert::{MemberCertError, MemberSecret, QrPayload};
use shared::models::{MembersDocument, VerificationResponse};
use shared::util::{non_blank, parse_calendar_date};

/// A verification answer and the HTTP status it is sent with
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub status: StatusCode,
    pub body: VerificationResponse,
}

impl Verification {
    fn ok(body: VerificationResponse) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: VerificationResponse::error(message),
        }
    }
}

impl IntoResponse for Verification {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn configured<'a>(docs: &Documents, secret: Option<&'a MemberSecret>) -> Option<&'a MemberSecret> {
    if !docs.is_bound(Binding::Members) {
        tracing::error!(binding = %Binding::Members, "Verification without member store");
        return None;
    }
    if secret.is_none() {
        tracing::error!("Verification without MEMBER_SECRET");
    }
    secret
}

/// Check an `(id, sig)` pair against the secret and the member roster.
///
/// The signature is always recomputed; the stored copy is never consulted.
pub async fn verify_membership(
    docs: &Documents,
    secret: Option<&MemberSecret>,
    id: Option<&str>,
    sig: Option<&str>,
    today: NaiveDate,
) -> Verification {
    let Some(secret) = configured(docs, secret) else {
        return Verification::failed("Server not configured");
    };

    let (Some(id), Some(sig)) = (non_blank(id), non_blank(sig)) else {
        return Verification::ok(VerificationResponse::invalid("Missing ID or signature"));
    };

    match member_cert::verify(id, sig, secret) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(member_id = %id, "QR signature mismatch");
            return Verification::ok(VerificationResponse::invalid(
                "Invalid QR code signature - possible tampering",
            ));
        }
        Err(e) => {
            tracing::error!(error = %e, "Signature check failed");
            return Verification::failed("Verification failed");
        }
    }

    let doc: Option<MembersDocument> = match docs.load(ALL_MEMBERS).await {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!(error = %e, "Member store read failed");
            return Verification::failed("Verification failed");
        }
    };
    let Some(member) = doc.as_ref().and_then(|d| d.find(id)) else {
        return Verification::ok(VerificationResponse::invalid("Member not found"));
    };

    match parse_calendar_date(&member.expiration_date) {
        Some(expires) if expires < today => {
            Verification::ok(VerificationResponse::expired(member))
        }
        Some(_) => Verification::ok(VerificationResponse::valid(member)),
        None => {
            tracing::warn!(member_id = %member.id, expiration = %member.expiration_date, "Unreadable expiration date");
            Verification::ok(VerificationResponse::invalid(
                "Membership record has an invalid expiration date",
            ))
        }
    }
}

/// Verify a raw scanned QR string
pub async fn verify_scan(
    docs: &Documents,
    secret: Option<&MemberSecret>,
    raw: Option<&str>,
    today: NaiveDate,
) -> Verification {
    if configured(docs, secret).is_none() {
        return Verification::failed("Server not configured");
    }

    let payload = match QrPayload::parse(raw.unwrap_or_default()) {
        Ok(p) => p,
        Err(MemberCertError::UnreadablePayload(_)) => {
            return Verification::ok(VerificationResponse::invalid("Could not read QR code data"));
        }
        Err(_) => {
            return Verification::ok(VerificationResponse::invalid("Invalid QR code format"));
        }
    };

    verify_membership(docs, secret, Some(&payload.id), Some(&payload.sig), today).await
}
