//! desk-runner: headless front end for the complaint desk.
//!
//! Usage:
//!   desk-runner --db desk.db --generate 200 --seed 42 --serve 50
//!   desk-runner --db desk.db --session <id> --ipc-mode
//!
//! In IPC mode the journal is flushed to the database after every command.
//! On exit the session's records, remaining journal and a snapshot are
//! written to the database, and the flat export to the configured CSV path.

use anyhow::Result;
use complaint_desk_core::{
    clock::SystemClock,
    command::DeskCommand,
    complaint::Complaint,
    config::DeskConfig,
    engine::{DispatchEngine, QueueDepths},
    error::DeskError,
    export::write_csv_file,
    generator::{synthetic_intake, IntakeRng, SyntheticIntake},
    snapshot::DeskSnapshot,
    store::DeskStore,
    types::ComplaintId,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Reply {
    Submitted { id: ComplaintId, duplicate_of: Option<ComplaintId> },
    DuplicateSuspected { existing_id: ComplaintId },
    Duplicate { existing_id: Option<ComplaintId> },
    Served { complaint: Option<Complaint> },
    Found { complaint: Option<Complaint> },
    Deleted { id: ComplaintId, deleted: bool },
    Records { complaints: Vec<Complaint> },
    Rebuilt { depths: QueueDepths },
    Exported { path: String, rows: usize },
    Error { message: String },
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let generate = parse_arg(&args, "--generate", 0usize);
    let serve = parse_arg(&args, "--serve", 0usize);
    let use_priority = !args.iter().any(|a| a == "--fifo");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let config = match str_arg(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };
    let csv_path = str_arg(&args, "--csv")
        .map(String::from)
        .unwrap_or_else(|| config.csv_path.clone());

    let store = DeskStore::open(db)?;
    store.migrate()?;

    let requested = str_arg(&args, "--session");
    let known = match requested {
        Some(id) => store.session_exists(id)?,
        None => false,
    };
    let (session_id, mut engine) = match requested {
        Some(id) if known => (id.to_string(), resume(&store, id, config)?),
        _ => {
            let id = requested
                .map(String::from)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            store.insert_session(&id, env!("CARGO_PKG_VERSION"), chrono::Utc::now())?;
            (id, DispatchEngine::new(config, Box::new(SystemClock)))
        }
    };

    if !ipc_mode {
        println!("Complaint desk: desk-runner");
        println!("  session:   {session_id}");
        println!("  db:        {db}");
        println!("  csv:       {csv_path}");
        println!();
    }

    if generate > 0 {
        generate_load(&mut engine, seed, generate)?;
    }

    if ipc_mode {
        run_ipc_loop(&store, &mut engine, &session_id, &csv_path)?;
    } else {
        for _ in 0..serve {
            if engine.serve_next(use_priority).is_none() {
                break;
            }
        }
        print_summary(&engine, &session_id);
    }

    persist(&store, &mut engine, &session_id, &csv_path)?;
    Ok(())
}

/// Load the latest snapshot for a session, or fall back to its saved rows.
fn resume(store: &DeskStore, session_id: &str, config: DeskConfig) -> Result<DispatchEngine> {
    let snapshot = match store.latest_snapshot(session_id)? {
        Some(s) => s,
        None => {
            let records = store.load_records(session_id)?;
            DeskSnapshot {
                session_id: session_id.to_string(),
                taken_at:   chrono::Utc::now(),
                next_id:    records.iter().map(|c| c.id + 1).max().unwrap_or(1),
                records,
            }
        }
    };
    Ok(DispatchEngine::restore(config, Box::new(SystemClock), snapshot)?)
}

fn generate_load(engine: &mut DispatchEngine, seed: u64, n: usize) -> Result<()> {
    let mut rng = IntakeRng::new(seed);
    let mut prev: Option<SyntheticIntake> = None;
    for _ in 0..n {
        let s = synthetic_intake(&mut rng, prev.as_ref(), 0.1);
        engine.submit(s.kind, &s.area, &s.description, s.severity)?;
        prev = Some(s);
    }
    log::info!("generated {n} complaints from seed {seed}");
    Ok(())
}

fn persist(store: &DeskStore, engine: &mut DispatchEngine, session_id: &str, csv_path: &str) -> Result<()> {
    let rows = store.save_records(session_id, engine.all_records())?;
    let events = store.flush_journal(session_id, engine)?;
    store.save_snapshot(&engine.snapshot(session_id))?;
    write_csv_file(csv_path, engine.all_records())?;
    log::info!("session {session_id}: saved {rows} records and {events} events, exported to {csv_path}");
    Ok(())
}

fn run_ipc_loop(
    store: &DeskStore,
    engine: &mut DispatchEngine,
    session_id: &str,
    csv_path: &str,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<DeskCommand>(&buffer) {
            Ok(DeskCommand::Quit) => break,
            Ok(cmd) => handle_command(engine, cmd, csv_path),
            Err(e) => Reply::Error { message: e.to_string() },
        };
        store.flush_journal(session_id, engine)?;
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(engine: &mut DispatchEngine, cmd: DeskCommand, csv_path: &str) -> Reply {
    match cmd {
        DeskCommand::Submit { kind, area, description, severity, force } => {
            let intake = match engine.prepare(kind, &area, &description, severity) {
                Ok(intake) => intake,
                Err(e) => return error_reply(e),
            };
            let duplicate_of = intake.duplicate_of();
            match duplicate_of {
                Some(existing_id) if !force => Reply::DuplicateSuspected { existing_id },
                _ => match engine.commit(intake) {
                    Ok(id) => Reply::Submitted { id, duplicate_of },
                    Err(e) => error_reply(e),
                },
            }
        }
        DeskCommand::CheckDuplicate { area, description } => Reply::Duplicate {
            existing_id: engine.check_duplicate(&area, &description),
        },
        DeskCommand::ServeNext { use_priority } => Reply::Served {
            complaint: engine.serve_next(use_priority),
        },
        DeskCommand::Search { id } => Reply::Found {
            complaint: engine.search_by_id(id).cloned(),
        },
        DeskCommand::Delete { id } => match engine.delete_by_id(id) {
            Ok(_) => Reply::Deleted { id, deleted: true },
            Err(DeskError::NotFound { .. }) => Reply::Deleted { id, deleted: false },
            Err(e) => error_reply(e),
        },
        DeskCommand::Rebuild => {
            engine.rebuild();
            Reply::Rebuilt { depths: engine.queue_depths() }
        }
        DeskCommand::AllRecords => Reply::Records {
            complaints: engine.all_records().cloned().collect(),
        },
        DeskCommand::PendingReport => Reply::Records {
            complaints: engine.pending_report().into_iter().cloned().collect(),
        },
        DeskCommand::Export { path } => {
            let path = path.unwrap_or_else(|| csv_path.to_string());
            match write_csv_file(&path, engine.all_records()) {
                Ok(rows) => Reply::Exported { path, rows },
                Err(e) => error_reply(e),
            }
        }
        DeskCommand::Quit => Reply::Error {
            message: "quit is handled by the loop".to_string(),
        },
    }
}

fn error_reply(e: DeskError) -> Reply {
    log::warn!("command failed: {e}");
    Reply::Error { message: e.to_string() }
}

fn print_summary(engine: &DispatchEngine, session_id: &str) {
    let QueueDepths { priority, fallback } = engine.queue_depths();
    let total = engine.record_count();
    let pending = engine.pending_count();

    println!("=== DESK SUMMARY ===");
    println!("  session:        {session_id}");
    println!("  records:        {total}");
    println!("  pending:        {pending}");
    println!("  processed:      {}", total - pending);
    println!("  priority queue: {priority}");
    println!("  fallback queue: {fallback}");

    println!();
    println!("=== PENDING REPORT (top 10) ===");
    let report = engine.pending_report();
    if report.is_empty() {
        println!("  (Nothing pending)");
    } else {
        for c in report.iter().take(10) {
            println!(
                "  #{:<5} sev {} | {:<11} | {:<18} | {}",
                c.id, c.severity, c.kind, c.area, c.description
            );
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
