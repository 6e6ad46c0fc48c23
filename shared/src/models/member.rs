//! Member Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership tier
///
/// Unknown tier strings from older imports are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberTier {
    #[default]
    Individual,
    Family,
    Lifetime,
    Student,
    Adult,
    Other(String),
}

impl MemberTier {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Individual => "Individual",
            Self::Family => "Family",
            Self::Lifetime => "Lifetime",
            Self::Student => "Student",
            Self::Adult => "Adult",
            Self::Other(s) => s,
        }
    }

    /// Map a free-text membership answer (Google Form style) onto a tier.
    ///
    /// Matches by substring, in the order student, adult, family, lifetime;
    /// anything else is `Individual`.
    pub fn from_form_answer(answer: &str) -> Self {
        let lower = answer.to_lowercase();
        if lower.contains("student") {
            Self::Student
        } else if lower.contains("adult") {
            Self::Adult
        } else if lower.contains("family") {
            Self::Family
        } else if lower.contains("lifetime") {
            Self::Lifetime
        } else {
            Self::Individual
        }
    }
}

impl From<String> for MemberTier {
    fn from(value: String) -> Self {
        match value.trim() {
            "Individual" => Self::Individual,
            "Family" => Self::Family,
            "Lifetime" => Self::Lifetime,
            "Student" => Self::Student,
            "Adult" => Self::Adult,
            "" => Self::Individual,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for MemberTier {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<MemberTier> for String {
    fn from(tier: MemberTier) -> Self {
        tier.as_str().to_string()
    }
}

impl fmt::Display for MemberTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member entity (stored in `all_members`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub username: String,
    pub pin: String,
    pub name: String,
    pub email: String,
    pub member_type: MemberTier,
    pub join_date: String,
    pub expiration_date: String,
    /// Convenience copy for QR issuance; never trusted when verifying
    #[serde(default)]
    pub qr_signature: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The `all_members` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembersDocument {
    #[serde(default)]
    pub members: Vec<Member>,
}

impl MembersDocument {
    pub fn find(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    /// Case-insensitive username lookup
    pub fn find_by_username(&self, username: &str) -> Option<&Member> {
        let wanted = username.to_lowercase();
        self.members
            .iter()
            .find(|m| m.username.to_lowercase() == wanted)
    }

    /// Case-insensitive email check, optionally ignoring one member
    pub fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        let wanted = email.trim().to_lowercase();
        self.members
            .iter()
            .filter(|m| Some(m.id.as_str()) != except_id)
            .any(|m| m.email.to_lowercase() == wanted)
    }
}

/// Member as returned to admins and to the member after login (no PIN)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    pub email: String,
    pub member_type: MemberTier,
    pub join_date: String,
    pub expiration_date: String,
    pub qr_signature: String,
}

impl MemberProfile {
    /// Admin listing view, username included
    pub fn listing(member: &Member) -> Self {
        Self {
            username: Some(member.username.clone()),
            ..Self::from(member)
        }
    }
}

impl From<&Member> for MemberProfile {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            username: None,
            name: m.name.clone(),
            email: m.email.clone(),
            member_type: m.member_type.clone(),
            join_date: m.join_date.clone(),
            expiration_date: m.expiration_date.clone(),
            qr_signature: m.qr_signature.clone(),
        }
    }
}

/// Update member payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub member_type: Option<String>,
    pub expiration_date: Option<String>,
}
