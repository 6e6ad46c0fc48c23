//! Initial documents loaded from JSON files at start-up
//!
//! Each `*_SEED_FILE` variable is optional. When it is unset the document
//! starts empty; when it names a file that is absent or not valid JSON,
//! start-up fails.

use crate::config::Config;
use serde::de::DeserializeOwned;
use shared::models::{BoardDocument, BoardMember, Event, EventsDocument, TaskBoard};
use std::path::Path;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct Seeds {
    /// Board roster used when `board_members` does not exist yet
    pub board: Vec<BoardMember>,
    /// Events written by `POST /api/events/seed`
    pub events: Vec<Event>,
    /// Task board used when `dashboard_tasks` does not exist yet
    pub tasks: TaskBoard,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BoxError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read seed file {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid seed file {}: {e}", path.display()).into())
}

fn optional_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, BoxError> {
    match path {
        Some(p) => {
            let value = read_json(p)?;
            tracing::info!(path = %p.display(), "Seed file loaded");
            Ok(value)
        }
        None => Ok(T::default()),
    }
}

impl Seeds {
    pub fn load(config: &Config) -> Result<Self, BoxError> {
        let board: BoardDocument = optional_json(config.board_seed_file.as_deref())?;
        let events: EventsDocument = optional_json(config.events_seed_file.as_deref())?;
        let tasks: TaskBoard = optional_json(config.tasks_seed_file.as_deref())?;
        Ok(Self {
            board: board.members,
            events: events.events,
            tasks,
        })
    }
}
