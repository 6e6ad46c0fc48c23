//! Outbound mail: contact form delivery and ticket notifications

mod resend;

pub use resend::{RESEND_API_URL, ResendMailer};

use async_trait::async_trait;
use shared::models::Ticket;
use shared::util::escape_html;
use std::sync::Mutex;
use thiserror::Error;

pub const TICKETS_ADMIN_URL: &str = "https://in-nola.org/admin-portal/tickets.html";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Mail rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Mailer used when no mail API key is configured: logs and succeeds
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Mail delivery disabled, message logged only"
        );
        Ok(())
    }
}

/// Captures sent messages in memory; can be told to fail
#[derive(Default)]
pub struct OutboxMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail_with: Option<String>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if let Some(reason) = &self.fail_with {
            return Err(MailError::Rejected(reason.clone()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email);
        }
        Ok(())
    }
}

/// Contact form message to the site inbox, reply-to the submitter
pub fn contact_email(
    from: &str,
    to: &str,
    name: &str,
    email: &str,
    message: &str,
) -> OutgoingEmail {
    OutgoingEmail {
        from: from.to_string(),
        to: to.to_string(),
        reply_to: Some(email.to_string()),
        subject: format!("[IN-NOLA Contact] Message from {name}"),
        text: format!(
            "New contact form submission from in-nola.org\n\n\
             Name: {name}\n\
             Email: {email}\n\n\
             Message:\n{message}\n\n\
             ---\n\
             Sent via IN-NOLA Contact Form"
        ),
        html: None,
    }
}

fn html_paragraphs(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// New-ticket notification for the tech volunteers
pub fn ticket_email(from: &str, to: &str, ticket: &Ticket) -> OutgoingEmail {
    let priority = ticket.priority.label();
    let submitted_by = if ticket.submitted_by.is_empty() {
        "Unknown"
    } else {
        ticket.submitted_by.as_str()
    };

    let html = format!(
        "<h2>New Tech Request</h2>\
         <p><strong>Title:</strong> {title}</p>\
         <p><strong>Priority:</strong> {priority}</p>\
         <p><strong>Submitted by:</strong> {by}</p>\
         <p><strong>Description:</strong></p>\
         <p>{description}</p>\
         <p><a href=\"{url}\">View all tickets</a></p>",
        title = escape_html(&ticket.title),
        by = escape_html(submitted_by),
        description = html_paragraphs(&ticket.description),
        url = TICKETS_ADMIN_URL,
    );
    let text = format!(
        "New Tech Request\n\n\
         Title: {title}\n\
         Priority: {priority}\n\
         Submitted by: {submitted_by}\n\n\
         Description:\n{description}\n\n\
         View all tickets: {TICKETS_ADMIN_URL}",
        title = ticket.title,
        description = ticket.description,
    );

    OutgoingEmail {
        from: format!("IN-NOLA Tech Requests <{from}>"),
        to: to.to_string(),
        reply_to: None,
        subject: format!("[Tech Request] {} ({priority})", ticket.title),
        text,
        html: Some(html),
    }
}
