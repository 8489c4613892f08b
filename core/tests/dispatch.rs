//! Dispatch policy tests: priority heap, FIFO fallback, and the
//! severity/age ordering both rely on.

use chrono::Duration;
use complaint_desk_core::{
    clock::ManualClock,
    config::DeskConfig,
    engine::DispatchEngine,
    types::{ComplaintKind, ComplaintStatus},
};

fn build() -> DispatchEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    DispatchEngine::new(DeskConfig::default_test(), Box::new(ManualClock::at_epoch()))
}

fn served_ids(engine: &mut DispatchEngine, use_priority: bool) -> Vec<u64> {
    std::iter::from_fn(|| engine.serve_next(use_priority)).map(|c| c.id).collect()
}

/// leak (5, t1), smell (2, t2), jam (5, t3): leak, then jam, then smell.
#[test]
fn priority_serves_severity_then_age() {
    let mut engine = build();
    let leak = engine.submit(ComplaintKind::Water, "A", "leak", 5).unwrap();
    let smell = engine.submit(ComplaintKind::Garbage, "B", "smell", 2).unwrap();
    let jam = engine.submit(ComplaintKind::Traffic, "C", "jam", 5).unwrap();

    assert_eq!(served_ids(&mut engine, true), vec![leak, jam, smell]);
    assert!(engine.serve_next(true).is_none());
}

/// A severity ≥ 4 complaint filed later still jumps ahead of earlier low ones.
#[test]
fn urgent_complaint_overtakes_earlier_routine_ones() {
    let mut engine = build();
    let low_a = engine.submit(ComplaintKind::Other, "Malir", "stray dogs", 3).unwrap();
    let low_b = engine.submit(ComplaintKind::Other, "Lyari", "noise", 1).unwrap();
    let urgent = engine.submit(ComplaintKind::Electricity, "Saddar", "sparking", 4).unwrap();

    let first = engine.serve_next(true).unwrap();
    assert_eq!(first.id, urgent);
    assert_eq!(first.status, ComplaintStatus::Processed);

    // The fallback then drains in arrival order.
    assert_eq!(served_ids(&mut engine, true), vec![low_a, low_b]);
}

/// FIFO mode never hands out an urgent complaint while routine ones remain.
#[test]
fn fifo_mode_drains_fallback_first() {
    let mut engine = build();
    let urgent_a = engine.submit(ComplaintKind::Water, "Clifton", "main burst", 5).unwrap();
    let low_a = engine.submit(ComplaintKind::Garbage, "Orangi", "bins full", 2).unwrap();
    let urgent_b = engine.submit(ComplaintKind::Water, "Korangi", "no supply", 4).unwrap();
    let low_b = engine.submit(ComplaintKind::Traffic, "Malir", "signal out", 3).unwrap();

    let order = served_ids(&mut engine, false);
    assert_eq!(order, vec![low_a, low_b, urgent_a, urgent_b]);
}

/// Priority mode with an empty heap falls back to the FIFO, and vice versa.
#[test]
fn each_mode_falls_back_to_the_other_queue() {
    let mut engine = build();
    let low = engine.submit(ComplaintKind::Other, "Gulshan", "streetlight", 2).unwrap();
    assert_eq!(engine.serve_next(true).map(|c| c.id), Some(low));

    let urgent = engine.submit(ComplaintKind::Electricity, "DHA", "wires down", 5).unwrap();
    assert_eq!(engine.serve_next(false).map(|c| c.id), Some(urgent));

    assert!(engine.serve_next(true).is_none());
    assert!(engine.serve_next(false).is_none());
}

/// With identical timestamps the tie still resolves oldest-filed first.
#[test]
fn equal_severity_and_timestamp_resolve_by_arrival() {
    let clock = ManualClock::at_epoch().with_step(Duration::zero());
    let mut engine = DispatchEngine::new(DeskConfig::default_test(), Box::new(clock));
    let ids: Vec<u64> = (0..5)
        .map(|i| {
            engine
                .submit(ComplaintKind::Water, "Saddar", &format!("leak {i}"), 4)
                .unwrap()
        })
        .collect();

    assert_eq!(served_ids(&mut engine, true), ids);
}

/// A clock handle kept by the caller moves the desk's notion of "now".
#[test]
fn manual_clock_advance_is_seen_by_the_engine() {
    let clock = ManualClock::at_epoch();
    let handle = clock.clone();
    let mut engine = DispatchEngine::new(DeskConfig::default_test(), Box::new(clock));

    let start = handle.peek();
    let first = engine.submit(ComplaintKind::Water, "A", "leak", 2).unwrap();
    handle.advance(Duration::hours(3));
    let expected = handle.peek();
    let second = engine.submit(ComplaintKind::Water, "B", "leak", 2).unwrap();

    assert_eq!(engine.search_by_id(first).unwrap().timestamp, start);
    assert_eq!(engine.search_by_id(second).unwrap().timestamp, expected);
    assert!(expected - start >= Duration::hours(3));
}

/// Thresholds are configurable; at 5, severity 4 goes to the fallback.
#[test]
fn urgency_threshold_is_configurable() {
    let config = DeskConfig {
        urgency_threshold: complaint_desk_core::types::Severity::new(5).unwrap(),
        ..DeskConfig::default_test()
    };
    let mut engine = DispatchEngine::new(config, Box::new(ManualClock::at_epoch()));
    engine.submit(ComplaintKind::Water, "A", "x", 4).unwrap();
    engine.submit(ComplaintKind::Water, "B", "y", 5).unwrap();

    let depths = engine.queue_depths();
    assert_eq!(depths.priority, 1);
    assert_eq!(depths.fallback, 1);
}

/// Serving flips the record in the store; it stays searchable afterwards.
#[test]
fn served_complaint_remains_in_history() {
    let mut engine = build();
    let id = engine.submit(ComplaintKind::Garbage, "Lyari", "burning waste", 3).unwrap();
    engine.serve_next(false).unwrap();

    let record = engine.search_by_id(id).expect("served records are retained");
    assert_eq!(record.status, ComplaintStatus::Processed);
    assert_eq!(engine.record_count(), 1);
    assert_eq!(engine.pending_count(), 0);
    assert_eq!(engine.queue_depths().priority + engine.queue_depths().fallback, 0);
}

/// The report ignores submission order and heap layout.
#[test]
fn pending_report_sorted_by_severity_then_age() {
    let mut engine = build();
    for (sev, desc) in [(2, "a"), (5, "b"), (3, "c"), (5, "d"), (1, "e"), (4, "f"), (2, "g")] {
        engine.submit(ComplaintKind::Other, "Area", desc, sev).unwrap();
    }
    engine.serve_next(true).unwrap(); // removes "b"

    let report = engine.pending_report();
    let descs: Vec<&str> = report.iter().map(|c| c.description.as_str()).collect();
    assert_eq!(descs, vec!["d", "f", "c", "a", "g", "e"]);
    for pair in report.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(
            a.severity > b.severity || (a.severity == b.severity && a.timestamp <= b.timestamp),
            "report out of order: {} before {}",
            a.id,
            b.id
        );
    }
}

/// The heap grows past its configured capacity without losing entries.
#[test]
fn priority_queue_has_no_fixed_ceiling() {
    let mut engine = build(); // default_test() starts the heap at 2 slots
    for i in 0..500 {
        engine
            .submit(ComplaintKind::Traffic, "Area", &format!("jam {i}"), 4 + (i % 2) as u8)
            .unwrap();
    }
    assert_eq!(engine.queue_depths().priority, 500);
    assert_eq!(served_ids(&mut engine, true).len(), 500);
}

/// Every state change lands in the journal, and draining empties it.
#[test]
fn journal_records_submit_serve_delete() {
    let mut engine = build();
    let a = engine.submit(ComplaintKind::Water, "A", "leak", 5).unwrap();
    let b = engine.submit(ComplaintKind::Water, "B", "leak", 2).unwrap();
    engine.serve_next(true).unwrap();
    engine.delete_by_id(b).unwrap();

    let names: Vec<&str> = engine.drain_events().iter().map(|e| e.type_name()).collect();
    assert_eq!(
        names,
        vec![
            "complaint_submitted",
            "complaint_submitted",
            "complaint_served",
            "complaint_deleted",
            "queues_rebuilt",
        ]
    );
    assert!(engine.drain_events().is_empty());
    assert!(engine.search_by_id(a).is_some());
}
