//! Membership verification result

use super::member::{Member, MemberTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Valid,
    Expired,
    Invalid,
    Error,
}

/// Minimal member projection carried by `valid` and `expired` results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedMember {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: MemberTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_on: Option<String>,
}

/// Body of `/api/members/verify` and `/api/members/scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub valid: bool,
    pub status: VerificationStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<VerifiedMember>,
}

impl VerificationResponse {
    pub fn valid(member: &Member) -> Self {
        Self {
            valid: true,
            status: VerificationStatus::Valid,
            message: "Member in Good Standing".to_string(),
            member: Some(VerifiedMember {
                id: member.id.clone(),
                name: member.name.clone(),
                member_type: member.member_type.clone(),
                valid_until: Some(member.expiration_date.clone()),
                expired_on: None,
            }),
        }
    }

    pub fn expired(member: &Member) -> Self {
        Self {
            valid: false,
            status: VerificationStatus::Expired,
            message: "Membership has expired".to_string(),
            member: Some(VerifiedMember {
                id: member.id.clone(),
                name: member.name.clone(),
                member_type: member.member_type.clone(),
                valid_until: None,
                expired_on: Some(member.expiration_date.clone()),
            }),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            status: VerificationStatus::Invalid,
            message: message.into(),
            member: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            status: VerificationStatus::Error,
            message: message.into(),
            member: None,
        }
    }
}
