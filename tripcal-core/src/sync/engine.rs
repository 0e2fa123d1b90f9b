//! Fetch / merge / commit loop with bounded retry.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::rows::{Row, SyncRows};
use crate::sync::{CommitOutcome, RemoteTable};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Terminal state of one table sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    /// Every attempt lost the race against a concurrent writer
    RetriesExhausted,
    /// The table refused the commit for a reason other than the ETag
    Rejected,
    /// Fetch or transport failure
    Failed,
}

/// Outcome of syncing one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableSyncResult {
    pub success: bool,
    pub message: String,
    pub synced_count: usize,
    /// Error payload returned by the table, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(skip)]
    pub status: SyncStatus,
    #[serde(skip)]
    pub attempts: u32,
}

impl TableSyncResult {
    fn synced(table: &str, count: usize, attempts: u32) -> Self {
        TableSyncResult {
            success: true,
            message: format!("Synced {count} rows to {table}"),
            synced_count: count,
            error: None,
            status: SyncStatus::Synced,
            attempts,
        }
    }

    fn failure(status: SyncStatus, message: String, attempts: u32) -> Self {
        TableSyncResult {
            success: false,
            message,
            synced_count: 0,
            error: None,
            status,
            attempts,
        }
    }
}

/// Result for both destination tables.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub success: bool,
    pub trips: TableSyncResult,
    pub events: TableSyncResult,
}

#[derive(Debug, Clone, Copy)]
pub struct SyncEngine {
    max_attempts: u32,
}

impl Default for SyncEngine {
    fn default() -> Self {
        SyncEngine::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl SyncEngine {
    pub fn new(max_attempts: u32) -> Self {
        SyncEngine {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Merge `local` into the table, retrying on ETag conflicts.
    pub async fn sync<T>(&self, table: &T, local: &[Row]) -> TableSyncResult
    where
        T: RemoteTable + ?Sized,
    {
        let name = table.name();

        for attempt in 1..=self.max_attempts {
            let snapshot = match table.fetch().await {
                Ok(snapshot) => snapshot,
                Err(e) if e.is_precondition_failed() => {
                    tracing::warn!(table = name, attempt, "Precondition failed on fetch, retrying");
                    continue;
                }
                Err(e) => {
                    tracing::error!(table = name, attempt, "Failed to fetch table: {e}");
                    return TableSyncResult::failure(
                        SyncStatus::Failed,
                        format!("Failed to fetch {name}: {e}"),
                        attempt,
                    );
                }
            };

            let merged = merge_rows(snapshot.rows, local);
            let etag = snapshot.etag.as_deref().map(strip_weak_validator);
            if etag.is_none() {
                tracing::warn!(table = name, "Table returned no ETag, committing unconditionally");
            }

            match table.commit(&merged, etag).await {
                Ok(CommitOutcome::Committed) => {
                    tracing::debug!(table = name, attempt, rows = merged.len(), "Committed rows");
                    return TableSyncResult::synced(name, merged.len(), attempt);
                }
                Ok(CommitOutcome::PreconditionFailed) => {
                    tracing::warn!(table = name, attempt, "ETag mismatch, retrying");
                }
                Ok(CommitOutcome::Rejected { status, body }) => {
                    tracing::error!(table = name, status, "Commit rejected: {body}");
                    let mut result = TableSyncResult::failure(
                        SyncStatus::Rejected,
                        format!("Failed to update {name} (HTTP {status}): {body}"),
                        attempt,
                    );
                    result.error = Some(body);
                    return result;
                }
                Err(e) if e.is_precondition_failed() => {
                    tracing::warn!(table = name, attempt, "Precondition failed on commit, retrying");
                }
                Err(e) => {
                    tracing::error!(table = name, attempt, "Failed to commit table: {e}");
                    return TableSyncResult::failure(
                        SyncStatus::Failed,
                        format!("Failed to update {name}: {e}"),
                        attempt,
                    );
                }
            }
        }

        tracing::error!(table = name, attempts = self.max_attempts, "Maximum retries exceeded");
        TableSyncResult::failure(
            SyncStatus::RetriesExhausted,
            "Maximum retries exceeded".to_string(),
            self.max_attempts,
        )
    }

    /// Sync trips and events rows into their tables. The two syncs run
    /// concurrently and do not affect each other.
    pub async fn sync_all<A, B>(&self, trips: &A, events: &B, rows: &SyncRows) -> SyncReport
    where
        A: RemoteTable + ?Sized,
        B: RemoteTable + ?Sized,
    {
        let (trips, events) = tokio::join!(
            self.sync(trips, &rows.trips),
            self.sync(events, &rows.events)
        );

        SyncReport {
            success: trips.success && events.success,
            trips,
            events,
        }
    }
}

/// Overlay local rows onto remote rows by uid.
///
/// Remote rows keep their order and every field the local row does not set.
/// Local rows with an unknown uid are appended; local rows without a uid are
/// ignored.
pub fn merge_rows(remote: Vec<Row>, local: &[Row]) -> Vec<Row> {
    let mut merged = remote;
    let mut by_uid: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| row_uid(row).map(|uid| (uid.to_string(), idx)))
        .collect();

    for row in local {
        let Some(uid) = row_uid(row) else {
            continue;
        };
        match by_uid.get(uid) {
            Some(&idx) => {
                for (key, value) in row {
                    merged[idx].insert(key.clone(), value.clone());
                }
            }
            None => {
                by_uid.insert(uid.to_string(), merged.len());
                merged.push(row.clone());
            }
        }
    }

    merged
}

fn row_uid(row: &Row) -> Option<&str> {
    row.get("uid")
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
}

/// `W/"abc"` → `"abc"`
pub fn strip_weak_validator(etag: &str) -> &str {
    etag.strip_prefix("W/").unwrap_or(etag)
}
