//! Application state container: the three collections and their store.
use chrono::Utc;
use log::info;

use crate::{
    Backend, Collection, Config, Event, EventPatch, FileBackend, Note, NotePatch,
    PersistedStore, Record, SaveOutcome, Todo, TodoPatch,
};

/// Where each collection lives in the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub events: String,
    pub todos: String,
    pub notes: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for StorageKeys {
    fn from(config: &Config) -> Self {
        Self {
            events: config.events_key.clone(),
            todos: config.todos_key.clone(),
            notes: config.notes_key.clone(),
        }
    }
}

/// Owns every collection. Each mutation computes the next snapshot, writes
/// it through the store, and only then replaces the in-memory copy.
#[derive(Debug)]
pub struct AppState<B: Backend = FileBackend> {
    store: PersistedStore<B>,
    keys: StorageKeys,
    events: Collection<Event>,
    todos: Collection<Todo>,
    notes: Collection<Note>,
}

impl<B: Backend> AppState<B> {
    /// Rehydrates all three collections, persisting empty ones for keys that
    /// were never written.
    pub fn load(mut store: PersistedStore<B>, keys: StorageKeys) -> Self {
        let events = store.read(&keys.events, Collection::new());
        let todos = store.read(&keys.todos, Collection::new());
        let notes = store.read(&keys.notes, Collection::new());
        info!(
            "Loaded {} events, {} todos, {} notes",
            events.len(),
            todos.len(),
            notes.len()
        );

        Self {
            store,
            keys,
            events,
            todos,
            notes,
        }
    }

    pub fn events(&self) -> &Collection<Event> {
        &self.events
    }

    pub fn todos(&self) -> &Collection<Todo> {
        &self.todos
    }

    pub fn notes(&self) -> &Collection<Note> {
        &self.notes
    }

    pub fn store(&self) -> &PersistedStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PersistedStore<B> {
        &mut self.store
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn save_event(&mut self, patch: EventPatch) -> SaveOutcome {
        let now = Utc::now();
        commit(&mut self.store, &self.keys.events, &mut self.events, |events| {
            let outcome = events.save(patch, now);
            let changed = outcome.changed();
            (outcome, changed)
        })
    }

    pub fn delete_event(&mut self, id: &str) -> Option<Event> {
        commit(&mut self.store, &self.keys.events, &mut self.events, |events| {
            removed(events.delete(id))
        })
    }

    pub fn save_todo(&mut self, patch: TodoPatch) -> SaveOutcome {
        let now = Utc::now();
        commit(&mut self.store, &self.keys.todos, &mut self.todos, |todos| {
            let outcome = todos.save(patch, now);
            let changed = outcome.changed();
            (outcome, changed)
        })
    }

    pub fn toggle_todo(&mut self, id: &str) -> Option<bool> {
        commit(&mut self.store, &self.keys.todos, &mut self.todos, |todos| {
            let completed = todos.toggle(id);
            (completed, completed.is_some())
        })
    }

    pub fn delete_todo(&mut self, id: &str) -> Option<Todo> {
        commit(&mut self.store, &self.keys.todos, &mut self.todos, |todos| {
            removed(todos.delete(id))
        })
    }

    pub fn save_note(&mut self, patch: NotePatch) -> SaveOutcome {
        let now = Utc::now();
        commit(&mut self.store, &self.keys.notes, &mut self.notes, |notes| {
            let outcome = notes.save(patch, now);
            let changed = outcome.changed();
            (outcome, changed)
        })
    }

    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        commit(&mut self.store, &self.keys.notes, &mut self.notes, |notes| {
            removed(notes.delete(id))
        })
    }
}

fn removed<R>(record: Option<R>) -> (Option<R>, bool) {
    let changed = record.is_some();
    (record, changed)
}

/// Runs `op` on a copy of `current`. If it reports a change, the copy is
/// persisted under `key` and then becomes the current collection.
fn commit<B, R, T, F>(
    store: &mut PersistedStore<B>,
    key: &str,
    current: &mut Collection<R>,
    op: F,
) -> T
where
    B: Backend,
    R: Record + serde::Serialize,
    F: FnOnce(&mut Collection<R>) -> (T, bool),
{
    let mut next = current.clone();
    let (result, changed) = op(&mut next);
    if changed {
        store.write(key, &next);
        *current = next;
        info!("{} collection saved ({} records)", R::KIND, current.len());
    }
    result
}
