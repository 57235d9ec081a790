//! Free-form notes.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Collection, Patch, Record};

/// Title given to notes saved with a blank one.
pub const UNTITLED_NOTE: &str = "Untitled Note";

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// Note title, never blank once stored
    pub title: String,
    /// Note body, may be empty
    #[serde(default)]
    pub content: String,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn for_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

impl Patch for NotePatch {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Replaces a blank title with [`UNTITLED_NOTE`].
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_NOTE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Next `updated_at` value: `now`, or just past `previous` if the clock has
/// not moved beyond it.
fn touch(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

impl Record for Note {
    const KIND: &'static str = "note";
    type Patch = NotePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: NotePatch, now: DateTime<Utc>) -> Self {
        Note {
            id,
            title: normalize_title(patch.title.as_deref().unwrap_or_default()),
            content: patch.content.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    // Every update refreshes updated_at, whether or not content changed.
    fn merge(&self, patch: NotePatch, now: DateTime<Utc>) -> Self {
        Note {
            id: self.id.clone(),
            title: patch
                .title
                .as_deref()
                .map(normalize_title)
                .unwrap_or_else(|| self.title.clone()),
            content: patch.content.unwrap_or_else(|| self.content.clone()),
            created_at: self.created_at,
            updated_at: touch(self.updated_at, now),
        }
    }
}

impl Note {
    /// Case-insensitive substring match on title or content. An empty term
    /// matches every note.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.content.to_lowercase().contains(&term)
    }
}

impl Collection<Note> {
    pub fn search(&self, term: &str) -> Vec<&Note> {
        self.filter(|note| note.matches(term))
    }
}
