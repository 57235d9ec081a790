//! Prioritized todos.
use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{dates, Collection, OrganizerError, Patch, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = OrganizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(OrganizerError::InvalidInput {
                message: format!("unknown priority '{}', expected low, medium or high", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub priority: Priority,
    #[serde(
        default,
        with = "dates::opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Partial todo. `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub id: Option<String>,
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TodoPatch {
    pub fn for_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

impl Patch for TodoPatch {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Record for Todo {
    const KIND: &'static str = "todo";
    type Patch = TodoPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: TodoPatch, now: DateTime<Utc>) -> Self {
        Todo {
            id,
            title: patch.title.unwrap_or_default(),
            completed: false,
            priority: patch.priority.unwrap_or_default(),
            due_date: patch.due_date.flatten(),
            created_at: now,
        }
    }

    fn merge(&self, patch: TodoPatch, _now: DateTime<Utc>) -> Self {
        Todo {
            id: self.id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            completed: patch.completed.unwrap_or(self.completed),
            priority: patch.priority.unwrap_or(self.priority),
            due_date: patch.due_date.unwrap_or(self.due_date),
            created_at: self.created_at,
        }
    }
}

/// Which slice of the todo list to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TodoFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TodoFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Pending => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }
}

/// Sizes of each todo partition. `all == pending + completed` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

impl Collection<Todo> {
    /// Flips `completed` on the todo with `id` and returns the new value.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        match self.get_mut(id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                debug!("Todo {} completed={}", id, todo.completed);
                Some(todo.completed)
            }
            None => {
                debug!("Toggle of unknown todo {} ignored", id);
                None
            }
        }
    }

    pub fn by_filter(&self, filter: TodoFilter) -> Vec<&Todo> {
        self.filter(|todo| filter.matches(todo))
    }

    pub fn counts(&self) -> TodoCounts {
        let completed = self.iter().filter(|todo| todo.completed).count();
        TodoCounts {
            all: self.len(),
            pending: self.len() - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> TodoPatch {
        TodoPatch {
            title: Some(title.to_string()),
            ..TodoPatch::default()
        }
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut todos = Collection::<Todo>::new();
        let patch = TodoPatch {
            priority: Some(Priority::High),
            ..titled("Ship report")
        };
        let id = todos.create(patch, Utc::now()).id.clone();
        assert!(!todos.get(&id).unwrap().completed);

        assert_eq!(todos.toggle(&id), Some(true));
        assert!(todos.get(&id).unwrap().completed);
        assert_eq!(todos.toggle(&id), Some(false));
        assert!(!todos.get(&id).unwrap().completed);
        assert_eq!(todos.get(&id).unwrap().priority, Priority::High);
    }

    #[test]
    fn toggle_unknown_is_no_op() {
        let mut todos = Collection::<Todo>::new();
        todos.create(titled("a"), Utc::now());
        let before = todos.clone();
        assert_eq!(todos.toggle("nope"), None);
        assert_eq!(todos, before);
    }

    #[test]
    fn partitions_are_exact() {
        let mut todos = Collection::<Todo>::new();
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(todos.create(titled(&format!("t{}", i)), Utc::now()).id.clone());
        }
        for id in ids.iter().step_by(3) {
            todos.toggle(id);
        }

        let counts = todos.counts();
        assert_eq!(counts.completed, 3);
        assert_eq!(counts.pending, 4);
        assert_eq!(counts.all, counts.pending + counts.completed);
        assert_eq!(todos.by_filter(TodoFilter::Pending).len(), counts.pending);
        assert_eq!(todos.by_filter(TodoFilter::Completed).len(), counts.completed);
        assert_eq!(todos.by_filter(TodoFilter::All).len(), counts.all);
    }

    #[test]
    fn merge_preserves_completion_unless_given() {
        let mut todos = Collection::<Todo>::new();
        let id = todos.create(titled("a"), Utc::now()).id.clone();
        todos.toggle(&id);

        let patch = TodoPatch {
            title: Some("renamed".to_string()),
            due_date: Some(NaiveDate::from_ymd_opt(2024, 7, 1)),
            ..TodoPatch::for_id(&id)
        };
        let updated = todos.update(patch, Utc::now()).cloned().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.due_date, NaiveDate::from_ymd_opt(2024, 7, 1));
    }

    #[test]
    fn priority_is_stored_lowercase() {
        let todo = Todo::create(
            "t1".to_string(),
            TodoPatch {
                priority: Some(Priority::High),
                due_date: Some(NaiveDate::from_ymd_opt(2024, 6, 10)),
                ..titled("x")
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["priority"], "high");
        assert_eq!(json["dueDate"], "2024-06-10");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn missing_due_date_reads_as_none() {
        let raw = r#"{"id":"t","title":"x","completed":true,"priority":"low","createdAt":"2024-06-01T10:00:00Z"}"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.priority, Priority::Low);
        assert!(todo.completed);
    }
}
