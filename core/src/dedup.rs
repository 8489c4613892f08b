//! Duplicate index: advisory only.
//!
//! Maps a normalized (area, description) key to the most recent open
//! complaint filed under it. A newer complaint overwrites the mapping, and
//! serving or deleting either one drops it. Missed duplicates are acceptable;
//! nothing downstream relies on this for correctness.

use crate::{complaint::DuplicateKey, types::ComplaintId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DuplicateIndex {
    entries: HashMap<DuplicateKey, ComplaintId>,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &DuplicateKey) -> Option<ComplaintId> {
        self.entries.get(key).copied()
    }

    /// Overwrites any prior mapping for `key`.
    pub fn put(&mut self, key: DuplicateKey, id: ComplaintId) {
        self.entries.insert(key, id);
    }

    /// Silently succeeds when `key` is absent.
    pub fn remove(&mut self, key: &DuplicateKey) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
