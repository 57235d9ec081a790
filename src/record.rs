//! Generic collection of identified records.
//!
//! A [`Collection`] is the insertion-ordered, in-memory sequence of one
//! record kind. All mutation goes through create/update/delete so that ids
//! stay unique and patches never drop fields they do not mention.

use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record-shaped value where any subset of fields may be present.
pub trait Patch {
    /// Id of the record this patch targets, if it targets an existing one.
    fn id(&self) -> Option<&str>;
}

/// A record kind that can live in a [`Collection`].
pub trait Record: Clone {
    /// Human readable kind name used in logs and messages.
    const KIND: &'static str;

    type Patch: Patch;

    fn id(&self) -> &str;

    /// Builds a new record from `patch`, filling absent fields with creation
    /// defaults. The patch's own id, if any, is ignored.
    fn create(id: String, patch: Self::Patch, now: DateTime<Utc>) -> Self;

    /// Shallow merge: every field present in `patch` replaces the current
    /// value, every absent field is kept. Identity and creation time never
    /// change.
    fn merge(&self, patch: Self::Patch, now: DateTime<Utc>) -> Self;
}

/// What a save intent turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
    /// The patch named an id that is not in the collection. Nothing changed.
    Unmatched(String),
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            SaveOutcome::Created(id) | SaveOutcome::Updated(id) | SaveOutcome::Unmatched(id) => id,
        }
    }

    /// Whether the collection changed and needs persisting.
    pub fn changed(&self) -> bool {
        !matches!(self, SaveOutcome::Unmatched(_))
    }
}

/// Insertion-ordered sequence of records of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Records matching `predicate`, in insertion order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&R>
    where
        P: Fn(&R) -> bool,
    {
        self.records.iter().filter(|record| predicate(record)).collect()
    }

    /// Appends a new record built from `patch` with a fresh id and `now` as
    /// its creation time.
    pub fn create(&mut self, patch: R::Patch, now: DateTime<Utc>) -> &R {
        let id = self.fresh_id();
        debug!("Creating {} {}", R::KIND, id);
        let index = self.records.len();
        self.records.push(R::create(id, patch, now));
        &self.records[index]
    }

    /// Merges `patch` into the record it names. Returns `None` without
    /// touching anything when the patch carries no id or the id is unknown.
    pub fn update(&mut self, patch: R::Patch, now: DateTime<Utc>) -> Option<&R> {
        let id = patch.id()?.to_string();
        let Some(index) = self.position(&id) else {
            debug!("Update of unknown {} {} ignored", R::KIND, id);
            return None;
        };

        let merged = self.records[index].merge(patch, now);
        debug_assert_eq!(merged.id(), id);
        self.records[index] = merged;
        trace!("Updated {} {}", R::KIND, id);
        Some(&self.records[index])
    }

    /// Routes a save intent: a patch carrying an id updates, one without
    /// creates.
    pub fn save(&mut self, patch: R::Patch, now: DateTime<Utc>) -> SaveOutcome {
        match patch.id().map(str::to_string) {
            Some(id) => match self.update(patch, now) {
                Some(_) => SaveOutcome::Updated(id),
                None => SaveOutcome::Unmatched(id),
            },
            None => SaveOutcome::Created(self.create(patch, now).id().to_string()),
        }
    }

    /// Removes the record with `id`. Deleting an unknown id is a no-op.
    pub fn delete(&mut self, id: &str) -> Option<R> {
        match self.position(id) {
            Some(index) => {
                debug!("Deleting {} {}", R::KIND, id);
                Some(self.records.remove(index))
            }
            None => {
                debug!("Delete of unknown {} {} ignored", R::KIND, id);
                None
            }
        }
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

impl<R: Record> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a, R: Record> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Label {
        id: String,
        name: String,
        hue: u8,
        created_at: DateTime<Utc>,
    }

    #[derive(Default)]
    struct LabelPatch {
        id: Option<String>,
        name: Option<String>,
        hue: Option<u8>,
    }

    impl Patch for LabelPatch {
        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }
    }

    impl Record for Label {
        const KIND: &'static str = "label";
        type Patch = LabelPatch;

        fn id(&self) -> &str {
            &self.id
        }

        fn create(id: String, patch: LabelPatch, now: DateTime<Utc>) -> Self {
            Label {
                id,
                name: patch.name.unwrap_or_default(),
                hue: patch.hue.unwrap_or(0),
                created_at: now,
            }
        }

        fn merge(&self, patch: LabelPatch, _now: DateTime<Utc>) -> Self {
            Label {
                id: self.id.clone(),
                name: patch.name.unwrap_or_else(|| self.name.clone()),
                hue: patch.hue.unwrap_or(self.hue),
                created_at: self.created_at,
            }
        }
    }

    fn named(name: &str) -> LabelPatch {
        LabelPatch {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_assigns_unique_ids_in_order() {
        let mut labels = Collection::<Label>::new();
        for i in 0..50 {
            labels.create(named(&format!("l{}", i)), Utc::now());
        }

        let ids: HashSet<_> = labels.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(labels.as_slice()[0].name, "l0");
        assert_eq!(labels.as_slice()[49].name, "l49");
    }

    #[test]
    fn create_ignores_patch_id() {
        let mut labels = Collection::<Label>::new();
        let first = labels.create(named("a"), Utc::now()).id.clone();
        let patch = LabelPatch {
            id: Some(first.clone()),
            ..named("b")
        };
        let second = labels.create(patch, Utc::now()).id.clone();
        assert_ne!(first, second);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn update_keeps_absent_fields() {
        let mut labels = Collection::<Label>::new();
        let created = labels
            .create(
                LabelPatch {
                    hue: Some(7),
                    ..named("work")
                },
                Utc::now(),
            )
            .clone();

        let patch = LabelPatch {
            id: Some(created.id.clone()),
            name: Some("home".to_string()),
            hue: None,
        };
        let updated = labels.update(patch, Utc::now()).cloned().unwrap();

        assert_eq!(updated.name, "home");
        assert_eq!(updated.hue, 7);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut labels = Collection::<Label>::new();
        labels.create(named("a"), Utc::now());
        let before = labels.clone();

        let patch = LabelPatch {
            id: Some("missing".to_string()),
            ..named("b")
        };
        assert_eq!(
            labels.save(patch, Utc::now()),
            SaveOutcome::Unmatched("missing".to_string())
        );
        assert!(labels.delete("missing").is_none());
        assert_eq!(labels, before);
    }

    #[test]
    fn save_disambiguates_on_id() {
        let mut labels = Collection::<Label>::new();
        let outcome = labels.save(named("a"), Utc::now());
        assert!(matches!(outcome, SaveOutcome::Created(_)));

        let patch = LabelPatch {
            id: Some(outcome.id().to_string()),
            ..named("b")
        };
        assert_eq!(
            labels.save(patch, Utc::now()),
            SaveOutcome::Updated(outcome.id().to_string())
        );
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get(outcome.id()).unwrap().name, "b");
    }

    #[test]
    fn delete_is_idempotent() {
        let mut labels = Collection::<Label>::new();
        let id = labels.create(named("a"), Utc::now()).id.clone();
        labels.create(named("b"), Utc::now());

        assert!(labels.delete(&id).is_some());
        assert!(labels.get(&id).is_none());
        assert!(labels.delete(&id).is_none());
        assert_eq!(labels.len(), 1);
    }
}
