//! Fallback queue: strict arrival order for below-threshold complaints.

use crate::types::ComplaintId;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct FallbackQueue {
    entries: VecDeque<ComplaintId>,
}

impl FallbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, id: ComplaintId) {
        self.entries.push_back(id);
    }

    /// Earliest-enqueued id, if any.
    pub fn dequeue(&mut self) -> Option<ComplaintId> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplaintId> + '_ {
        self.entries.iter()
    }
}
