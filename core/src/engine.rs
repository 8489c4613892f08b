//! The dispatch engine: intake, dedup advisory, and two-queue serving.
//!
//! STRUCTURES (all owned here, no globals):
//!   1. Record store      authoritative, every complaint ever filed
//!   2. Duplicate index   advisory, normalized (area, description) -> id
//!   3. Priority queue    max-heap, pending complaints at/above threshold
//!   4. Fallback queue    FIFO, pending complaints below threshold
//!   5. Next-id counter
//!
//! RULES:
//!   - Queues hold handles into the store, never records.
//!   - A pending record sits in exactly one queue; a processed one in none.
//!   - Deletion never edits a queue in place; it rebuilds both from the store.
//!   - The engine performs no I/O. State changes go to the journal.

use crate::{
    clock::DeskClock,
    complaint::{Complaint, DispatchKey, DuplicateKey},
    config::DeskConfig,
    dedup::DuplicateIndex,
    error::{DeskError, DeskResult},
    event::{DeskEvent, QueueKind},
    fifo::FallbackQueue,
    heap::PriorityQueue,
    records::RecordStore,
    snapshot::DeskSnapshot,
    types::{ComplaintId, ComplaintKind, ComplaintStatus, Severity},
};
use serde::Serialize;

/// A validated submission that has not been committed yet.
///
/// Produced by `DispatchEngine::prepare`. Carries the duplicate advisory so
/// the caller can decide whether to go ahead before anything is mutated.
#[derive(Debug, Clone)]
pub struct Intake {
    kind:         ComplaintKind,
    area:         String,
    description:  String,
    severity:     Severity,
    key:          DuplicateKey,
    duplicate_of: Option<ComplaintId>,
}

impl Intake {
    /// Id of an open complaint with the same normalized area/description.
    pub fn duplicate_of(&self) -> Option<ComplaintId> {
        self.duplicate_of
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueDepths {
    pub priority: usize,
    pub fallback: usize,
}

/// The heap and the FIFO, routed by the urgency threshold.
#[derive(Debug)]
struct DispatchQueues {
    config:   DeskConfig,
    priority: PriorityQueue,
    fallback: FallbackQueue,
}

impl DispatchQueues {
    fn new(config: &DeskConfig) -> Self {
        Self {
            config:   config.clone(),
            priority: PriorityQueue::with_capacity(config.initial_heap_capacity),
            fallback: FallbackQueue::new(),
        }
    }

    fn route(&mut self, key: DispatchKey) -> QueueKind {
        if self.config.is_urgent(key.severity) {
            self.priority.insert(key);
            QueueKind::Priority
        } else {
            self.fallback.enqueue(key.id);
            QueueKind::Fallback
        }
    }

    /// Pop from the preferred queue, falling back to the other when empty.
    fn pop(&mut self, use_priority: bool) -> Option<(ComplaintId, QueueKind)> {
        if use_priority {
            if let Some(key) = self.priority.extract_max() {
                return Some((key.id, QueueKind::Priority));
            }
            self.fallback.dequeue().map(|id| (id, QueueKind::Fallback))
        } else {
            if let Some(id) = self.fallback.dequeue() {
                return Some((id, QueueKind::Fallback));
            }
            self.priority.extract_max().map(|key| (key.id, QueueKind::Priority))
        }
    }

    fn clear(&mut self) {
        self.priority.clear();
        self.fallback.clear();
    }

    fn depths(&self) -> QueueDepths {
        QueueDepths {
            priority: self.priority.len(),
            fallback: self.fallback.len(),
        }
    }
}

pub struct DispatchEngine {
    config:     DeskConfig,
    clock:      Box<dyn DeskClock>,
    next_id:    ComplaintId,
    records:    RecordStore,
    duplicates: DuplicateIndex,
    queues:     DispatchQueues,
    journal:    Vec<DeskEvent>,
}

impl DispatchEngine {
    pub fn new(config: DeskConfig, clock: Box<dyn DeskClock>) -> Self {
        let queues = DispatchQueues::new(&config);
        Self {
            config,
            clock,
            next_id: 1,
            records: RecordStore::new(),
            duplicates: DuplicateIndex::new(),
            queues,
            journal: Vec::new(),
        }
    }

    /// Rebuild a desk from a snapshot: records in their saved order, the
    /// duplicate index from pending records, and both queues.
    pub fn restore(
        config: DeskConfig,
        clock: Box<dyn DeskClock>,
        snapshot: DeskSnapshot,
    ) -> DeskResult<Self> {
        let mut engine = Self::new(config, clock);
        for record in snapshot.records {
            engine.records.append(record)?;
        }
        for record in engine.records.pending_snapshot() {
            engine.duplicates.put(record.duplicate_key(), record.id);
        }
        let floor = engine.records.max_id().map_or(1, |id| id + 1);
        engine.next_id = snapshot.next_id.max(floor);
        engine.rebuild();

        let at = engine.clock.now();
        engine.journal.push(DeskEvent::SessionRestored {
            at,
            records: engine.records.len(),
            next_id: engine.next_id,
        });
        log::info!(
            "desk: restored session {} with {} records (next id {})",
            snapshot.session_id,
            engine.records.len(),
            engine.next_id,
        );
        Ok(engine)
    }

    // ── Intake ─────────────────────────────────────────────────

    /// Id of the open complaint filed under the same normalized key, if any.
    pub fn check_duplicate(&self, area: &str, description: &str) -> Option<ComplaintId> {
        self.duplicates.lookup(&DuplicateKey::from_parts(area, description))
    }

    /// Validate a submission and attach the duplicate advisory. No state changes.
    pub fn prepare(
        &self,
        kind: ComplaintKind,
        area: &str,
        description: &str,
        severity: u8,
    ) -> DeskResult<Intake> {
        let severity = Severity::new(severity)?;
        let area = area.trim();
        let description = description.trim();
        if area.is_empty() {
            return Err(DeskError::invalid("area", "must not be empty"));
        }
        if description.is_empty() {
            return Err(DeskError::invalid("description", "must not be empty"));
        }

        let key = DuplicateKey::from_parts(area, description);
        let duplicate_of = self.duplicates.lookup(&key);
        Ok(Intake {
            kind,
            area: area.to_string(),
            description: description.to_string(),
            severity,
            key,
            duplicate_of,
        })
    }

    /// Accept a prepared submission: assign the id, stamp it, store it,
    /// take over its duplicate key, and route it to a queue.
    pub fn commit(&mut self, intake: Intake) -> DeskResult<ComplaintId> {
        let id = self.next_id;
        let complaint = Complaint {
            id,
            kind: intake.kind,
            area: intake.area,
            description: intake.description,
            severity: intake.severity,
            timestamp: self.clock.now(),
            status: ComplaintStatus::Pending,
        };
        let key = complaint.dispatch_key();
        let at = complaint.timestamp;

        self.records.append(complaint)?;
        self.next_id += 1;

        // Re-read: the index may have moved since prepare().
        if let Some(existing_id) = self.duplicates.lookup(&intake.key) {
            self.journal.push(DeskEvent::DuplicateSuspected { at, id, existing_id });
        }
        self.duplicates.put(intake.key, id);

        let queue = self.queues.route(key);
        self.journal.push(DeskEvent::ComplaintSubmitted {
            at,
            id,
            severity: key.severity,
            queue,
        });
        log::info!("desk: complaint {id} filed (severity {}, {queue:?} queue)", key.severity);
        Ok(id)
    }

    /// Validate and commit in one step. A duplicate advisory is logged but
    /// never blocks the submission.
    pub fn submit(
        &mut self,
        kind: ComplaintKind,
        area: &str,
        description: &str,
        severity: u8,
    ) -> DeskResult<ComplaintId> {
        let intake = self.prepare(kind, area, description, severity)?;
        if let Some(existing) = intake.duplicate_of() {
            log::warn!("desk: submission resembles open complaint {existing}; filing anyway");
        }
        self.commit(intake)
    }

    // ── Dispatch ───────────────────────────────────────────────

    /// Serve the next complaint. `use_priority` picks which queue is tried
    /// first; the other is the fallback. Returns the record as processed.
    pub fn serve_next(&mut self, use_priority: bool) -> Option<Complaint> {
        loop {
            let (id, queue) = self.queues.pop(use_priority)?;
            let key = match self.records.find_by_id(id) {
                Some(record) if record.is_pending() => record.duplicate_key(),
                Some(_) => {
                    log::warn!("desk: skipped handle {id}, complaint already processed");
                    continue;
                }
                None => {
                    log::warn!("desk: skipped handle {id}, complaint no longer stored");
                    continue;
                }
            };

            let served = match self.records.mark_processed(id) {
                Ok(record) => record.clone(),
                Err(e) => {
                    log::warn!("desk: could not mark {id} processed: {e}");
                    continue;
                }
            };
            self.duplicates.remove(&key);

            let at = self.clock.now();
            self.journal.push(DeskEvent::ComplaintServed { at, id, queue });
            log::info!("desk: served complaint {id} from {queue:?} queue");
            return Some(served);
        }
    }

    pub fn search_by_id(&self, id: ComplaintId) -> Option<&Complaint> {
        self.records.find_by_id(id)
    }

    /// Remove a complaint outright, then rebuild both queues from the store.
    pub fn delete_by_id(&mut self, id: ComplaintId) -> DeskResult<Complaint> {
        let removed = self.records.remove(id).ok_or(DeskError::NotFound { id })?;
        self.duplicates.remove(&removed.duplicate_key());

        let at = self.clock.now();
        self.journal.push(DeskEvent::ComplaintDeleted { at, id });
        log::info!("desk: deleted complaint {id}");

        self.rebuild();
        Ok(removed)
    }

    /// Discard both queues and re-route every pending record in store order.
    pub fn rebuild(&mut self) {
        self.queues.clear();
        for record in self.records.pending_snapshot() {
            self.queues.route(record.dispatch_key());
        }

        let depths = self.queues.depths();
        let at = self.clock.now();
        self.journal.push(DeskEvent::QueuesRebuilt {
            at,
            priority: depths.priority,
            fallback: depths.fallback,
        });
        log::debug!(
            "desk: queues rebuilt (priority={} fallback={})",
            depths.priority,
            depths.fallback,
        );
    }

    // ── Reads ──────────────────────────────────────────────────

    /// Every record ever filed and not deleted, in insertion order.
    pub fn all_records(&self) -> impl Iterator<Item = &Complaint> + '_ {
        self.records.snapshot()
    }

    /// Pending records by severity descending, then oldest first.
    /// Independent of the live heap layout.
    pub fn pending_report(&self) -> Vec<&Complaint> {
        let mut pending: Vec<&Complaint> = self.records.pending_snapshot().collect();
        pending.sort_by(|a, b| b.dispatch_key().cmp(&a.dispatch_key()));
        pending
    }

    pub fn queue_depths(&self) -> QueueDepths {
        self.queues.depths()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn pending_count(&self) -> usize {
        self.records.pending_count()
    }

    pub fn next_id(&self) -> ComplaintId {
        self.next_id
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Hand the journal to the caller and start a fresh one.
    pub fn drain_events(&mut self) -> Vec<DeskEvent> {
        std::mem::take(&mut self.journal)
    }

    pub fn snapshot(&self, session_id: &str) -> DeskSnapshot {
        DeskSnapshot {
            session_id: session_id.to_string(),
            taken_at:   self.clock.now(),
            next_id:    self.next_id,
            records:    self.records.snapshot().cloned().collect(),
        }
    }
}
