//! One lock around the whole desk.
//!
//! serve_next and rebuild read one structure and write another, so the
//! store, index, both queues and the id counter share a single mutex.
//! Every call holds it for its full duration.

use crate::{
    complaint::Complaint,
    engine::{DispatchEngine, QueueDepths},
    error::DeskResult,
    event::DeskEvent,
    types::{ComplaintId, ComplaintKind},
};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<DispatchEngine>>,
}

impl SharedEngine {
    pub fn new(engine: DispatchEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run several operations under one acquisition.
    pub fn with<R>(&self, f: impl FnOnce(&mut DispatchEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn submit(
        &self,
        kind: ComplaintKind,
        area: &str,
        description: &str,
        severity: u8,
    ) -> DeskResult<ComplaintId> {
        self.lock().submit(kind, area, description, severity)
    }

    pub fn check_duplicate(&self, area: &str, description: &str) -> Option<ComplaintId> {
        self.lock().check_duplicate(area, description)
    }

    pub fn serve_next(&self, use_priority: bool) -> Option<Complaint> {
        self.lock().serve_next(use_priority)
    }

    pub fn search_by_id(&self, id: ComplaintId) -> Option<Complaint> {
        self.lock().search_by_id(id).cloned()
    }

    pub fn delete_by_id(&self, id: ComplaintId) -> DeskResult<Complaint> {
        self.lock().delete_by_id(id)
    }

    pub fn all_records(&self) -> Vec<Complaint> {
        self.lock().all_records().cloned().collect()
    }

    pub fn pending_report(&self) -> Vec<Complaint> {
        self.lock().pending_report().into_iter().cloned().collect()
    }

    pub fn queue_depths(&self) -> QueueDepths {
        self.lock().queue_depths()
    }

    pub fn drain_events(&self) -> Vec<DeskEvent> {
        self.lock().drain_events()
    }

    // Poisoned locks are recovered; no operation leaves a partial write.
    fn lock(&self) -> MutexGuard<'_, DispatchEngine> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
