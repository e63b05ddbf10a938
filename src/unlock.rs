//! Sequential unlock rule: a lesson opens once the one before it is finished.

use std::collections::{BTreeSet, HashSet};

use crate::lesson::Catalog;

/// Anything that can answer "has this lesson been completed?".
pub trait CompletionLookup {
    fn is_complete(&self, lesson_id: &str) -> bool;
}

impl CompletionLookup for HashSet<String> {
    fn is_complete(&self, lesson_id: &str) -> bool {
        self.contains(lesson_id)
    }
}

impl CompletionLookup for BTreeSet<String> {
    fn is_complete(&self, lesson_id: &str) -> bool {
        self.contains(lesson_id)
    }
}

impl CompletionLookup for [String] {
    fn is_complete(&self, lesson_id: &str) -> bool {
        self.iter().any(|id| id == lesson_id)
    }
}

/// The first lesson is always playable; lesson `i` is playable once lesson `i - 1` is complete.
///
/// `index` must be inside the catalog. Debug builds assert it; release builds answer `false`.
pub fn is_unlocked<P: CompletionLookup + ?Sized>(catalog: &Catalog, progress: &P, index: usize) -> bool {
    debug_assert!(index < catalog.len(), "lesson index {index} out of bounds ({} lessons)", catalog.len());
    if index >= catalog.len() {
        return false;
    }
    match index {
        0 => true,
        i => catalog
            .get(i - 1)
            .is_some_and(|previous| progress.is_complete(&previous.id)),
    }
}

/// Unlock flag for every lesson, in catalog order.
pub fn unlock_states<P: CompletionLookup + ?Sized>(catalog: &Catalog, progress: &P) -> Vec<bool> {
    (0..catalog.len()).map(|i| is_unlocked(catalog, progress, i)).collect()
}
