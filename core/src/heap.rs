//! Priority queue: a binary max-heap of dispatch handles.
//!
//! Holds only open complaints at or above the urgency threshold. The top
//! is always the greatest `DispatchKey`: highest severity, then oldest.
//! Capacity starts at the configured size and doubles when exceeded.

use crate::complaint::DispatchKey;

#[derive(Debug)]
pub struct PriorityQueue {
    slots:    Vec<DispatchKey>,
    capacity: usize,
}

impl PriorityQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// O(log n).
    pub fn insert(&mut self, key: DispatchKey) {
        if self.slots.len() == self.capacity {
            self.grow();
        }
        self.slots.push(key);
        self.sift_up(self.slots.len() - 1);
    }

    /// Remove and return the most urgent handle. O(log n).
    pub fn extract_max(&mut self) -> Option<DispatchKey> {
        if self.slots.is_empty() {
            return None;
        }
        let top = self.slots.swap_remove(0);
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    pub fn peek(&self) -> Option<&DispatchKey> {
        self.slots.first()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every handle. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        self.slots.reserve_exact(new_capacity - self.slots.len());
        log::debug!("priority queue: grew {} -> {new_capacity}", self.capacity);
        self.capacity = new_capacity;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.slots[i] > self.slots[parent] {
                self.slots.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut largest = i;
            if left < len && self.slots[left] > self.slots[largest] {
                largest = left;
            }
            if right < len && self.slots[right] > self.slots[largest] {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.slots.swap(i, largest);
            i = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use chrono::{Duration, TimeZone, Utc};

    fn key(id: u64, severity: u8, offset_secs: i64) -> DispatchKey {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        DispatchKey {
            id,
            severity: Severity::new(severity).unwrap(),
            timestamp: base + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn extracts_by_severity_then_age() {
        let mut heap = PriorityQueue::with_capacity(4);
        heap.insert(key(1, 4, 10));
        heap.insert(key(2, 5, 30));
        heap.insert(key(3, 5, 20));
        heap.insert(key(4, 4, 5));

        let order: Vec<u64> = std::iter::from_fn(|| heap.extract_max()).map(|k| k.id).collect();
        assert_eq!(order, vec![3, 2, 4, 1]);
        assert!(heap.is_empty());
        assert_eq!(heap.extract_max(), None);
    }

    #[test]
    fn equal_timestamps_fall_back_to_lower_id() {
        let mut heap = PriorityQueue::with_capacity(1);
        heap.insert(key(9, 5, 0));
        heap.insert(key(3, 5, 0));
        heap.insert(key(6, 5, 0));

        assert_eq!(heap.extract_max().map(|k| k.id), Some(3));
        assert_eq!(heap.extract_max().map(|k| k.id), Some(6));
        assert_eq!(heap.extract_max().map(|k| k.id), Some(9));
    }

    #[test]
    fn peek_reports_the_next_extraction_without_removing_it() {
        let mut heap = PriorityQueue::with_capacity(4);
        assert!(heap.peek().is_none());
        heap.insert(key(1, 4, 0));
        heap.insert(key(2, 5, 10));

        assert_eq!(heap.peek().map(|k| k.id), Some(2));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.extract_max().map(|k| k.id), Some(2));
        assert_eq!(heap.peek().map(|k| k.id), Some(1));
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut heap = PriorityQueue::with_capacity(2);
        for i in 0..100u64 {
            heap.insert(key(i + 1, 4 + (i % 2) as u8, i as i64));
        }
        assert_eq!(heap.len(), 100);
        assert!(heap.capacity() >= 100);

        let mut prev = heap.extract_max().unwrap();
        while let Some(next) = heap.extract_max() {
            assert!(prev > next, "heap order violated: {prev:?} before {next:?}");
            prev = next;
        }
    }
}
