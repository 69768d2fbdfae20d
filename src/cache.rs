use dashmap::DashMap;
use std::{collections::HashMap, sync::Arc};

/// Thread-safe in-memory mirror of the `urls` table.
///
/// Holds two DashMaps: `by_code` (code -> original) serves redirects, and
/// `by_original` (original -> code) makes the dedup check on shorten O(1)
/// instead of a scan over every entry. The cache is warmed on startup from
/// the store and updated after every successful store read or write, so it
/// never holds a mapping the store does not.
///
/// Cloning is cheap; clones share the same maps.
#[derive(Clone, Debug, Default)]
pub struct LinkCache {
    by_code: Arc<DashMap<String, String>>,
    by_original: Arc<DashMap<String, String>>,
}

impl LinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a mapping.
    ///
    /// If `code` previously pointed at a different original, that original's
    /// reverse entry is dropped so both directions stay consistent.
    pub fn put(&self, code: impl Into<String>, original: impl Into<String>) {
        let code = code.into();
        let original = original.into();

        if let Some(previous) = self.by_code.insert(code.clone(), original.clone()) {
            if previous != original {
                self.by_original.remove_if(&previous, |_, c| *c == code);
            }
        }
        self.by_original.insert(original, code);
    }

    /// Look up a code. Returns a clone of the original URL if present.
    pub fn get(&self, code: &str) -> Option<String> {
        self.by_code.get(code).map(|v| v.clone())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Reverse lookup: the code already assigned to `original`, if cached.
    pub fn code_for(&self, original: &str) -> Option<String> {
        self.by_original.get(original).map(|v| v.clone())
    }

    /// Drop every entry. The store is untouched.
    pub fn clear(&self) {
        self.by_code.clear();
        self.by_original.clear();
    }

    /// Snapshot of the code -> original direction.
    pub fn entries(&self) -> HashMap<String, String> {
        self.by_code
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
