//! Record store: every complaint ever filed, in arrival order.
//!
//! RULE: this is the single source of truth. Queues and the duplicate
//! index are derived views and may be rebuilt from it at any time.
//! Only the store mutates `status`.

use crate::{
    complaint::Complaint,
    error::{DeskError, DeskResult},
    types::{ComplaintId, ComplaintStatus},
};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RecordStore {
    records:  Vec<Complaint>,
    position: HashMap<ComplaintId, usize>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end. An existing id is an invariant violation.
    pub fn append(&mut self, complaint: Complaint) -> DeskResult<()> {
        if self.position.contains_key(&complaint.id) {
            return Err(DeskError::DuplicateId { id: complaint.id });
        }
        self.position.insert(complaint.id, self.records.len());
        self.records.push(complaint);
        Ok(())
    }

    pub fn find_by_id(&self, id: ComplaintId) -> Option<&Complaint> {
        self.position.get(&id).map(|&i| &self.records[i])
    }

    /// Remove a record, returning it. Positions after it are reindexed.
    pub fn remove(&mut self, id: ComplaintId) -> Option<Complaint> {
        let index = self.position.remove(&id)?;
        let removed = self.records.remove(index);
        for (i, c) in self.records.iter().enumerate().skip(index) {
            self.position.insert(c.id, i);
        }
        Some(removed)
    }

    /// Flip a pending record to processed. Returns the updated record.
    pub fn mark_processed(&mut self, id: ComplaintId) -> DeskResult<&Complaint> {
        let index = *self.position.get(&id).ok_or(DeskError::NotFound { id })?;
        let record = &mut self.records[index];
        record.status = ComplaintStatus::Processed;
        Ok(record)
    }

    /// All records in insertion order. Call again to restart.
    pub fn snapshot(&self) -> impl Iterator<Item = &Complaint> + '_ {
        self.records.iter()
    }

    /// Pending records in insertion order.
    pub fn pending_snapshot(&self) -> impl Iterator<Item = &Complaint> + '_ {
        self.records.iter().filter(|c| c.is_pending())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_snapshot().count()
    }

    pub fn max_id(&self) -> Option<ComplaintId> {
        self.records.iter().map(|c| c.id).max()
    }
}
