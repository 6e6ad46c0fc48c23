//! Board Member Model

use serde::{Deserialize, Serialize};

pub const DEFAULT_PHOTO_POSITION: &str = "50% 50%";

/// Board member bio (stored in `board_members`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    /// Lowercase username, doubles as the PIN login name
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_position: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl BoardMember {
    /// Apply a self-service profile edit.
    ///
    /// Blank `name`/`bio` keep the current value; `email`, `photo` and
    /// `photoPosition` are replaced whenever present.
    pub fn apply(&mut self, update: &BoardProfileUpdate, now: String) {
        if let Some(name) = update.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(email) = update.email.as_deref() {
            self.email = email.trim().to_string();
        }
        if let Some(bio) = update.bio.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            self.bio = bio.to_string();
        }
        if let Some(photo) = &update.photo {
            self.photo = photo.clone();
        }
        self.photo_position = Some(
            update
                .photo_position
                .clone()
                .or_else(|| self.photo_position.take())
                .unwrap_or_else(|| DEFAULT_PHOTO_POSITION.to_string()),
        );
        self.updated_at = Some(now);
    }
}

/// The `board_members` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default)]
    pub members: Vec<BoardMember>,
}

impl BoardDocument {
    pub fn sort_by_order(&mut self) {
        self.members.sort_by_key(|m| m.order);
    }
}

/// PUT /api/board payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardProfileUpdate {
    pub username: Option<String>,
    pub pin: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub photo_position: Option<String>,
}
