//! Admin portal user Model (`admin_users`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Board,
}

impl AdminRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "board" => Some(Self::Board),
            _ => None,
        }
    }
}

/// Stored admin user; `password_hash` is an argon2 PHC string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub username: String,
    pub password_hash: String,
    pub role: AdminRole,
    #[serde(default)]
    pub created_at: String,
}

/// Public view of an admin user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserInfo {
    pub username: String,
    pub role: AdminRole,
}

impl From<&AdminUser> for AdminUserInfo {
    fn from(user: &AdminUser) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
        }
    }
}
