//! Usage reporting to a local SQLite store
//!
//! Accepted submissions are appended to an `actions` table by a background
//! writer so the search flow never blocks on disk. Every run gets a random
//! session id. Reporting failures are logged and otherwise ignored.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

const CREATE_ACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS actions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session TEXT NOT NULL,
    page TEXT NOT NULL,
    query TEXT NOT NULL,
    timestampStr TEXT NOT NULL
);
"#;

const INSERT_ACTION: &str =
    "INSERT INTO actions (session, page, query, timestampStr) VALUES (?1, ?2, ?3, ?4)";

/// Errors opening the usage store
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("failed to create usage directory {0}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("failed to open usage database {0}: {1}")]
    Open(PathBuf, #[source] rusqlite::Error),

    #[error("failed to initialize usage schema: {0}")]
    Schema(#[source] rusqlite::Error),
}

struct Action {
    page: String,
    query: String,
    timestamp: String,
}

/// Cheap handle for enqueueing usage actions
#[derive(Clone)]
pub struct UsageHandle {
    tx: UnboundedSender<Action>,
}

impl UsageHandle {
    /// Asynchronously record a user action. Never blocks; an action sent
    /// after the writer has gone away is dropped with a warning.
    pub fn report_usage(&self, page: &str, query: &str) {
        let action = Action {
            page: page.to_string(),
            query: query.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };

        if self.tx.send(action).is_err() {
            tracing::warn!("usage writer is gone, dropping action");
        }
    }
}

/// Owns the background writer for the usage store
pub struct UsageReporter {
    handle: UsageHandle,
    worker: JoinHandle<()>,
}

impl UsageReporter {
    /// Open (or create) the usage database and spawn the writer.
    pub fn open(path: &Path) -> Result<Self, UsageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| UsageError::CreateDir(parent.to_path_buf(), e))?;
        }

        let conn =
            Connection::open(path).map_err(|e| UsageError::Open(path.to_path_buf(), e))?;
        conn.execute_batch(CREATE_ACTIONS).map_err(UsageError::Schema)?;

        let session = Uuid::new_v4().to_string();
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        let worker = tokio::task::spawn_blocking(move || {
            while let Some(action) = rx.blocking_recv() {
                let inserted = conn.execute(
                    INSERT_ACTION,
                    params![session, action.page, action.query, action.timestamp],
                );
                if let Err(error) = inserted {
                    tracing::warn!(%error, "failed to record usage action");
                }
            }
        });

        tracing::info!(path = %path.display(), "usage reporting enabled");

        Ok(Self {
            handle: UsageHandle { tx },
            worker,
        })
    }

    /// Handle for reporting from other components
    pub fn handle(&self) -> UsageHandle {
        self.handle.clone()
    }

    /// Record a user action through the reporter's own handle.
    pub fn report_usage(&self, page: &str, query: &str) {
        self.handle.report_usage(page, query);
    }

    /// Close the queue and wait until every queued action is on disk.
    ///
    /// Outstanding clones of the handle keep the queue open; drop them
    /// before calling this or the wait will not end.
    pub async fn shutdown(self) {
        let UsageReporter { handle, worker } = self;
        drop(handle);

        if let Err(error) = worker.await {
            tracing::warn!(%error, "usage writer task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_actions(path: &Path) -> i64 {
        let conn = Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM actions", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reported_actions_are_written_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.db");

        let reporter = UsageReporter::open(&path).unwrap();
        reporter.report_usage("app", "");
        reporter.report_usage("app", "climate");
        reporter.shutdown().await;

        assert_eq!(count_actions(&path), 2);
    }

    #[tokio::test]
    async fn test_actions_share_a_session_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.db");

        let reporter = UsageReporter::open(&path).unwrap();
        let handle = reporter.handle();
        handle.report_usage("app", "a");
        handle.report_usage("app", "b");
        drop(handle);
        reporter.shutdown().await;

        let conn = Connection::open(&path).unwrap();
        let sessions: i64 = conn
            .query_row("SELECT COUNT(DISTINCT session) FROM actions", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(sessions, 1);
    }

    #[tokio::test]
    async fn test_missing_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("usage.db");

        let reporter = UsageReporter::open(&path).unwrap();
        reporter.shutdown().await;

        assert!(path.exists());
    }
}
