#![forbid(unsafe_code)]

//! Memory-bounded chat log with point-in-time snapshots.
//!
//! # Role in FrankenChat
//! `fchat-log` is the storage layer of the scrollback core. A producer
//! appends messages, the view layer takes a [`Snapshot`] per frame and lays
//! out only the entries the scroll tracker in `fchat-view` points at.
//!
//! # Primary responsibilities
//! - **BoundedLog**: capacity-limited append, head backfill, optimistic
//!   replace, and hinted search.
//! - **Snapshot**: an immutable view that stays valid while the log keeps
//!   mutating.
//!
//! # Threading
//! The log itself does no locking; mutate it from the UI thread only.
//! Snapshots are `Send + Sync` whenever entries are, so a finished snapshot
//! can be handed to another thread.

mod segment;

pub mod bounded_log;
pub mod snapshot;

pub use bounded_log::{BoundedLog, DEFAULT_CAPACITY, DEFAULT_SEGMENT_SIZE};
pub use snapshot::Snapshot;
