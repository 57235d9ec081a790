//! Calendar events.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{dates, Collection, OrganizerError, Patch, Record};

pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_END_TIME: &str = "10:00";

/// Palette an event can be drawn with. Persisted as the literal hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventColor {
    #[default]
    #[serde(rename = "#f97316")]
    Orange,
    #[serde(rename = "#eab308")]
    Yellow,
    #[serde(rename = "#84cc16")]
    Lime,
    #[serde(rename = "#06b6d4")]
    Cyan,
    #[serde(rename = "#8b5cf6")]
    Violet,
    #[serde(rename = "#ec4899")]
    Pink,
}

impl EventColor {
    pub const ALL: [EventColor; 6] = [
        EventColor::Orange,
        EventColor::Yellow,
        EventColor::Lime,
        EventColor::Cyan,
        EventColor::Violet,
        EventColor::Pink,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            EventColor::Orange => "#f97316",
            EventColor::Yellow => "#eab308",
            EventColor::Lime => "#84cc16",
            EventColor::Cyan => "#06b6d4",
            EventColor::Violet => "#8b5cf6",
            EventColor::Pink => "#ec4899",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventColor::Orange => "orange",
            EventColor::Yellow => "yellow",
            EventColor::Lime => "lime",
            EventColor::Cyan => "cyan",
            EventColor::Violet => "violet",
            EventColor::Pink => "pink",
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl FromStr for EventColor {
    type Err = OrganizerError;

    /// Accepts a palette name (`"cyan"`) or its hex value (`"#06b6d4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        EventColor::ALL
            .into_iter()
            .find(|color| color.name() == wanted || color.hex() == wanted)
            .ok_or_else(|| OrganizerError::InvalidInput {
                message: format!(
                    "unknown color '{}', expected one of: {}",
                    s,
                    EventColor::ALL.map(EventColor::name).join(", ")
                ),
            })
    }
}

/// A single calendar entry pinned to one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "dates::day")]
    pub date: NaiveDate,
    /// `HH:MM`, independent of `end_time`.
    pub start_time: String,
    pub end_time: String,
    pub color: EventColor,
    pub created_at: DateTime<Utc>,
}

/// Partial event. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub color: Option<EventColor>,
}

impl EventPatch {
    /// An empty patch aimed at the event with `id`.
    pub fn for_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

impl Patch for EventPatch {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Record for Event {
    const KIND: &'static str = "event";
    type Patch = EventPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: EventPatch, now: DateTime<Utc>) -> Self {
        Event {
            id,
            title: patch.title.unwrap_or_default(),
            description: patch.description.flatten(),
            date: patch
                .date
                .unwrap_or_else(|| now.with_timezone(&Local).date_naive()),
            start_time: patch
                .start_time
                .unwrap_or_else(|| DEFAULT_START_TIME.to_string()),
            end_time: patch
                .end_time
                .unwrap_or_else(|| DEFAULT_END_TIME.to_string()),
            color: patch.color.unwrap_or_default(),
            created_at: now,
        }
    }

    fn merge(&self, patch: EventPatch, _now: DateTime<Utc>) -> Self {
        Event {
            id: self.id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .unwrap_or_else(|| self.description.clone()),
            date: patch.date.unwrap_or(self.date),
            start_time: patch
                .start_time
                .unwrap_or_else(|| self.start_time.clone()),
            end_time: patch.end_time.unwrap_or_else(|| self.end_time.clone()),
            color: patch.color.unwrap_or(self.color),
            created_at: self.created_at,
        }
    }
}

impl Collection<Event> {
    /// Events falling on `day`, in insertion order.
    pub fn on_day(&self, day: NaiveDate) -> Vec<&Event> {
        self.filter(|event| dates::is_same_day(event.date, day))
    }

    /// Events falling anywhere in the month containing `day`.
    pub fn in_month(&self, day: NaiveDate) -> Vec<&Event> {
        self.filter(|event| dates::is_same_month(event.date, day))
    }
}
