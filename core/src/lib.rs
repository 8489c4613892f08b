//! Municipal complaint intake and dispatch.
//!
//! A single-writer, in-memory desk: an append-only record store, an
//! advisory duplicate index, and two dispatch queues (severity heap and
//! arrival FIFO) that are always derivable from the store.

pub mod clock;
pub mod command;
pub mod complaint;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod event;
pub mod export;
pub mod fifo;
pub mod generator;
pub mod heap;
pub mod records;
pub mod shared;
pub mod snapshot;
pub mod store;
pub mod types;
