//! Ticket Model (volunteer tech requests)

use crate::util::escape_html;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TicketPriority {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Capitalized label for notification mails
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

impl TicketStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketComment {
    pub text: String,
    pub author: String,
    pub created_at: String,
}

/// Ticket entity (stored in `all_tickets`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub submitted_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub comments: Vec<TicketComment>,
}

impl Ticket {
    /// Copy with every free-text field HTML-escaped, for display
    pub fn sanitized(&self) -> Self {
        Self {
            title: escape_html(&self.title),
            description: escape_html(&self.description),
            submitted_by: escape_html(&self.submitted_by),
            comments: self
                .comments
                .iter()
                .map(|c| TicketComment {
                    text: escape_html(&c.text),
                    author: escape_html(&c.author),
                    created_at: c.created_at.clone(),
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// The `all_tickets` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketsDocument {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl TicketsDocument {
    /// Open, then in-progress, then completed; newest first within a status
    pub fn sorted(&self) -> Vec<Ticket> {
        let mut tickets = self.tickets.clone();
        tickets.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        tickets
    }
}

/// Create ticket payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub submitted_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentCreate {
    pub text: Option<String>,
    pub author: Option<String>,
}

/// Update ticket payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub submitted_by: Option<String>,
    pub add_comment: Option<CommentCreate>,
}
