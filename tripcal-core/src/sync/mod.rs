//! Optimistic-concurrency sync of mapped rows into remote tables.
//!
//! A remote table is anything that can hand out its rows with a version
//! marker (ETag) and accept a full row set conditioned on that marker. The
//! [`SyncEngine`] reads, overlays local rows, and commits; a concurrent
//! writer makes the commit fail its precondition and the whole cycle is
//! retried from a fresh read.

mod engine;
pub mod http;

pub use engine::{
    DEFAULT_MAX_ATTEMPTS, SyncEngine, SyncReport, SyncStatus, TableSyncResult, merge_rows,
    strip_weak_validator,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TripCalResult;
use crate::rows::Row;

/// Current state of a remote table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    pub rows: Vec<Row>,
    pub etag: Option<String>,
}

/// How the remote table answered a conditional commit.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed,
    /// The ETag no longer matches: someone else wrote in between
    PreconditionFailed,
    Rejected { status: u16, body: Value },
}

/// Read and conditionally replace the rows of one table.
#[async_trait]
pub trait RemoteTable: Send + Sync {
    /// Table identifier, used in messages and logs.
    fn name(&self) -> &str;

    async fn fetch(&self) -> TripCalResult<TableSnapshot>;

    /// A stale `if_match` is answered with `CommitOutcome::PreconditionFailed`.
    /// Tables that can only report the conflict as an error return
    /// `TripCalError::TablePreconditionFailed`, which is retried the same way.
    async fn commit(&self, rows: &[Row], if_match: Option<&str>) -> TripCalResult<CommitOutcome>;
}
