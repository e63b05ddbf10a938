//! Completion record: which lessons the learner has finished.
//!
//! Persisted as a JSON array of lesson ids under a single key. The in-memory copy is the
//! source of truth for the session, so a failed write still lets the learner keep going; only
//! survival across a reload is lost.

use crate::error::PersistenceError;
use crate::storage::KeyValueStore;
use crate::unlock::CompletionLookup;

pub const DEFAULT_STORAGE_KEY: &str = "mandarin_quest_progress";

pub struct ProgressStore<S: KeyValueStore> {
    store: S,
    key: String,
    completed: Vec<String>,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Loads the record, starting empty when it is missing, unreadable or corrupt.
    pub fn open(store: S, key: &str) -> Self {
        let completed = match read_record(&store, key) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("starting with empty progress: {e}");
                Vec::new()
            }
        };
        tracing::debug!(key, completed = completed.len(), "progress loaded");
        Self {
            store,
            key: key.to_string(),
            completed,
        }
    }

    /// Like [`open`](Self::open) but reports read failures instead of swallowing them.
    pub fn try_open(store: S, key: &str) -> Result<Self, PersistenceError> {
        let completed = read_record(&store, key)?;
        Ok(Self {
            store,
            key: key.to_string(),
            completed,
        })
    }

    pub fn is_complete(&self, lesson_id: &str) -> bool {
        self.completed.iter().any(|id| id == lesson_id)
    }

    /// Records a completion and writes through. Marking an already-complete lesson is a no-op
    /// and performs no write. On error the completion still holds for this session.
    pub fn mark_complete(&mut self, lesson_id: &str) -> Result<(), PersistenceError> {
        if self.is_complete(lesson_id) {
            return Ok(());
        }
        self.completed.push(lesson_id.to_string());
        self.flush()
    }

    /// Forgets every completion and removes the persisted record.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.completed.clear();
        self.store.remove(&self.key)
    }

    /// Completed ids in the order they were first recorded.
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&self.completed).map_err(|e| PersistenceError::WriteFailed {
            key: self.key.clone(),
            reason: e.to_string(),
        })?;
        self.store.set(&self.key, &json)
    }
}

impl<S: KeyValueStore> CompletionLookup for ProgressStore<S> {
    fn is_complete(&self, lesson_id: &str) -> bool {
        ProgressStore::is_complete(self, lesson_id)
    }
}

fn read_record<S: KeyValueStore>(store: &S, key: &str) -> Result<Vec<String>, PersistenceError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    let ids: Vec<String> = serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::storage::MemoryStore;

    fn open(store: &MemoryStore) -> ProgressStore<MemoryStore> {
        ProgressStore::open(store.clone(), DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn round_trips_through_reload() {
        let backing = MemoryStore::new();
        let mut progress = open(&backing);
        progress.mark_complete("L1").unwrap();
        progress.mark_complete("L2").unwrap();

        let mut reloaded = open(&backing);
        let ids: HashSet<&str> = reloaded.completed().iter().map(String::as_str).collect();
        assert_eq!(ids, HashSet::from(["L1", "L2"]));

        reloaded.mark_complete("L1").unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(open(&backing).len(), 2);
    }

    #[test]
    fn persisted_layout_is_a_json_array_of_ids() {
        let backing = MemoryStore::new();
        let mut progress = open(&backing);
        progress.mark_complete("Group_1").unwrap();
        assert_eq!(backing.raw(DEFAULT_STORAGE_KEY).as_deref(), Some(r#"["Group_1"]"#));
    }

    #[test]
    fn clear_removes_record() {
        let backing = MemoryStore::new();
        let mut progress = open(&backing);
        progress.mark_complete("Group_1").unwrap();
        progress.clear().unwrap();
        assert!(!progress.is_complete("Group_1"));
        assert!(backing.raw(DEFAULT_STORAGE_KEY).is_none());
        assert!(open(&backing).is_empty());
    }

    #[test]
    fn failed_write_keeps_session_progress() {
        let backing = MemoryStore::new();
        let mut progress = open(&backing);
        backing.set_fail_writes(true);
        let err = progress.mark_complete("Group_1").unwrap_err();
        assert!(matches!(err, PersistenceError::WriteFailed { .. }));
        assert!(progress.is_complete("Group_1"));
        // Nothing reached durable storage.
        assert!(open(&backing).is_empty());
    }

    #[test]
    fn corrupt_record_starts_empty_or_reports() {
        let mut backing = MemoryStore::new();
        backing.set(DEFAULT_STORAGE_KEY, "{oops").unwrap();
        assert!(open(&backing).is_empty());
        assert!(matches!(
            ProgressStore::try_open(backing.clone(), DEFAULT_STORAGE_KEY),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn duplicate_ids_in_storage_are_collapsed() {
        let mut backing = MemoryStore::new();
        backing.set(DEFAULT_STORAGE_KEY, r#"["a","b","a"]"#).unwrap();
        assert_eq!(open(&backing).completed(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn unreadable_storage_starts_empty() {
        let backing = MemoryStore::new();
        backing.set_fail_reads(true);
        assert!(open(&backing).is_empty());
    }
}
