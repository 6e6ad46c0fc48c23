//! Event Model

use crate::util::parse_calendar_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Event entity (stored in `all_events`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Event {
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Partial update; keeps `id` and `createdAt`.
    ///
    /// Blank `title`/`date`/`location`/`description` keep the current value,
    /// the optional text fields are replaced whenever present.
    pub fn apply(&mut self, update: &EventUpdate, now: String) {
        fn keep_unless_blank(slot: &mut String, value: Option<&str>) {
            if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
                *slot = v.to_string();
            }
        }
        fn replace_if_present(slot: &mut String, value: Option<&str>) {
            if let Some(v) = value {
                *slot = v.trim().to_string();
            }
        }

        keep_unless_blank(&mut self.title, update.title.as_deref());
        keep_unless_blank(&mut self.date, update.date.as_deref());
        keep_unless_blank(&mut self.location, update.location.as_deref());
        keep_unless_blank(&mut self.description, update.description.as_deref());
        replace_if_present(&mut self.time, update.time.as_deref());
        replace_if_present(&mut self.emoji, update.emoji.as_deref());
        replace_if_present(&mut self.cost, update.cost.as_deref());
        replace_if_present(&mut self.contact, update.contact.as_deref());
        replace_if_present(&mut self.notes, update.notes.as_deref());
        replace_if_present(&mut self.facebook, update.facebook.as_deref());
        replace_if_present(&mut self.instagram, update.instagram.as_deref());
        self.updated_at = Some(now);
    }
}

/// The `all_events` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsDocument {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Events split around a reference day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventListing {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

impl EventListing {
    /// Events dated `today` or later are upcoming (soonest first); the rest
    /// are past (most recent first). Undated events sort last among the past.
    pub fn split(events: Vec<Event>, today: NaiveDate) -> Self {
        let (mut upcoming, mut past): (Vec<_>, Vec<_>) = events
            .into_iter()
            .partition(|e| e.calendar_date().is_some_and(|d| d >= today));

        upcoming.sort_by_key(Event::calendar_date);
        past.sort_by(|a, b| match (a.calendar_date(), b.calendar_date()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        Self { upcoming, past }
    }
}

/// Create event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub cost: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

/// Update event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub cost: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}
