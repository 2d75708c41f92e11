use std::collections::HashMap;

use parking_lot::Mutex;

/// Remembers which external series id was chosen for a series name.
///
/// Keys are lowercased and trimmed. An id of `0` records that the user picked
/// nothing, which also suppresses further questions for that name.
#[derive(Debug, Default)]
pub struct SelectionCache {
    entries: Mutex<HashMap<String, u64>>,
}

impl SelectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded selection for `series`, if any.
    pub fn get(&self, series: &str) -> Option<u64> {
        self.entries.lock().get(&normalize(series)).copied()
    }

    /// Records `id` unless a selection already exists, and returns the stored
    /// selection.
    pub fn insert_if_absent(&self, series: &str, id: u64) -> u64 {
        *self.entries.lock().entry(normalize(series)).or_insert(id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize(series: &str) -> String {
    series.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        let cache = SelectionCache::new();
        cache.insert_if_absent("  Doctor Who ", 42);
        assert_eq!(cache.get("doctor who"), Some(42));
        assert_eq!(cache.get("DOCTOR WHO"), Some(42));
    }

    #[test]
    fn first_selection_wins() {
        let cache = SelectionCache::new();
        assert_eq!(cache.insert_if_absent("Show", 7), 7);
        assert_eq!(cache.insert_if_absent("show", 9), 7);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn none_selection_is_remembered() {
        let cache = SelectionCache::new();
        cache.insert_if_absent("Show", 0);
        assert_eq!(cache.get("Show"), Some(0));
    }
}
