//! TursoFactCollection - libsql/Turso Backend for the Fact Log
//!
//! Stores each inverse reference fact as one row of the
//! `inverse_references` table. Column names are quoted to carry the exact
//! persisted field names of the document contract (`nodePath`,
//! `referringNodePath`, `revision`, `state`), so existing data remains
//! interoperable.
//!
//! # Streaming
//!
//! Reads and writes hand back bounded-channel streams fed by a cursor
//! task that owns the connection. Rows are pulled from the backend as the
//! consumer polls; dropping the stream stops the task and releases the
//! cursor. Inserts are echoed per document as each row is durably
//! written, so a mid-batch failure still reports every fact persisted
//! before it.
//!
//! # Database Connection Pattern
//!
//! Connections are created per operation and configured with a 5 second
//! busy timeout so concurrent readers wait and retry instead of failing
//! immediately with `SQLITE_BUSY` when the Tokio runtime moves futures
//! between threads.
//!
//! # Examples
//!
//! ```rust,no_run
//! use strata_core::db::{FactCollection, TursoFactCollection};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collection = TursoFactCollection::new(PathBuf::from("./data/facts.db")).await?;
//!     collection.delete_all().await?;
//!     Ok(())
//! }
//! ```

use crate::db::{DocumentStream, FactCollection, FactDocument, FactFilter, StoreError};
use async_trait::async_trait;
use libsql::{Builder, Connection, Database, Row};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

const SELECT_COLUMNS: &str =
    r#"SELECT "nodePath", "referringNodePath", "revision", "state" FROM inverse_references"#;

/// Bound on in-flight stream items between the cursor task and the
/// consumer. A consumer slower than the cursor applies backpressure
/// instead of the task accumulating the full result.
const STREAM_BUFFER: usize = 32;

/// libsql-backed document collection for the fact log
#[derive(Debug, Clone)]
pub struct TursoFactCollection {
    /// libsql database handle (wrapped in Arc for sharing)
    db: Arc<Database>,

    /// Path to the database file
    db_path: PathBuf,
}

impl TursoFactCollection {
    /// Open (or create) a fact store at the given path
    ///
    /// Ensures the parent directory exists, opens the database, and
    /// initializes the schema idempotently.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be created, the
    /// connection fails, or schema initialization fails.
    pub async fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| StoreError::connection_failed(db_path.clone(), e))?;

        let collection = Self {
            db: Arc::new(db),
            db_path,
        };
        collection.initialize_schema().await?;
        info!(path = %collection.db_path.display(), "initialized inverse reference fact store");
        Ok(collection)
    }

    /// Open an in-memory fact store (tests, bootstrap)
    pub async fn new_in_memory() -> Result<Self, StoreError> {
        Self::new(PathBuf::from(":memory:")).await
    }

    /// Create a connection with the busy timeout configured
    async fn connect(&self) -> Result<Connection, StoreError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::connection_failed(self.db_path.clone(), e))?;
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        Ok(conn)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so query() must be used instead of
    /// execute().
    async fn execute_pragma(&self, conn: &Connection, pragma: &str) -> Result<(), StoreError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            StoreError::backend_unavailable(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            StoreError::backend_unavailable(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize schema and connection configuration
    ///
    /// Uses CREATE TABLE IF NOT EXISTS so initialization is idempotent.
    async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect().await?;

        // WAL mode for concurrent readers against the single writer
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS inverse_references (
                "nodePath" TEXT NOT NULL,
                "referringNodePath" TEXT NOT NULL,
                "revision" INTEGER NOT NULL,
                "state" TEXT NOT NULL CHECK ("state" IN ('NORMAL', 'DELETED'))
            )"#,
            (),
        )
        .await
        .map_err(|e| {
            StoreError::initialization_failed(format!(
                "Failed to create inverse_references table: {}",
                e
            ))
        })?;

        // Covering index for the as-of query shape (path match + revision bound)
        conn.execute(
            r#"CREATE INDEX IF NOT EXISTS idx_inverse_references_node_revision
               ON inverse_references("nodePath", "revision")"#,
            (),
        )
        .await
        .map_err(|e| {
            StoreError::initialization_failed(format!(
                "Failed to create index 'idx_inverse_references_node_revision': {}",
                e
            ))
        })?;

        Ok(())
    }

    /// Convert a libsql row to a FactDocument
    fn row_to_document(row: &Row) -> Result<FactDocument, StoreError> {
        let node_path: String = row
            .get(0)
            .map_err(|e| StoreError::malformed_document(format!("Failed to get nodePath: {}", e)))?;
        let referring_node_path: String = row.get(1).map_err(|e| {
            StoreError::malformed_document(format!("Failed to get referringNodePath: {}", e))
        })?;
        let revision: i64 = row
            .get(2)
            .map_err(|e| StoreError::malformed_document(format!("Failed to get revision: {}", e)))?;
        let state: String = row
            .get(3)
            .map_err(|e| StoreError::malformed_document(format!("Failed to get state: {}", e)))?;

        let revision = u64::try_from(revision).map_err(|_| {
            StoreError::malformed_document(format!(
                "negative revision {} for node '{}'",
                revision, node_path
            ))
        })?;

        Ok(FactDocument {
            node_path,
            referring_node_path,
            revision,
            state,
        })
    }
}

#[async_trait]
impl FactCollection for TursoFactCollection {
    async fn insert(&self, documents: Vec<FactDocument>) -> Result<DocumentStream, StoreError> {
        let conn = self.connect().await?;
        debug!(count = documents.len(), "inserting fact documents");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            for document in documents {
                let item = insert_document(&conn, document).await;
                let failed = item.is_err();
                // Every yielded Ok is durably written. The first failure
                // ends the batch, so earlier facts stay verifiable from
                // the stream; a dropped receiver means the caller
                // cancelled the remainder of the batch.
                if tx.send(item).await.is_err() || failed {
                    break;
                }
            }
        });
        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn query(&self, filter: FactFilter) -> Result<DocumentStream, StoreError> {
        let conn = self.connect().await?;
        debug!(?filter, "querying fact documents");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            let mut rows = match run_query(&conn, &filter).await {
                Ok(rows) => rows,
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            };
            loop {
                let item = match rows.next().await {
                    Ok(Some(row)) => TursoFactCollection::row_to_document(&row),
                    Ok(None) => break,
                    Err(e) => Err(StoreError::backend_unavailable(format!(
                        "Failed to read fact document row: {}",
                        e
                    ))),
                };
                let failed = item.is_err();
                // A dropped receiver ends the loop, dropping the cursor
                // with it.
                if tx.send(item).await.is_err() || failed {
                    break;
                }
            }
        });
        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let conn = self.connect().await?;
        conn.execute("DELETE FROM inverse_references", ())
            .await
            .map_err(|e| {
                StoreError::backend_unavailable(format!("Failed to clear fact collection: {}", e))
            })?;
        Ok(())
    }
}

/// Write one document; returns it only once the row is durable
async fn insert_document(
    conn: &Connection,
    document: FactDocument,
) -> Result<FactDocument, StoreError> {
    let revision = i64::try_from(document.revision).map_err(|_| {
        StoreError::malformed_document(format!(
            "revision {} for node '{}' exceeds the storable range",
            document.revision, document.node_path
        ))
    })?;

    conn.execute(
        r#"INSERT INTO inverse_references ("nodePath", "referringNodePath", "revision", "state")
           VALUES (?, ?, ?, ?)"#,
        (
            document.node_path.as_str(),
            document.referring_node_path.as_str(),
            revision,
            document.state.as_str(),
        ),
    )
    .await
    .map_err(|e| {
        StoreError::backend_unavailable(format!("Failed to insert fact document: {}", e))
    })?;
    Ok(document)
}

/// Open a cursor over the documents matching the filter
async fn run_query(conn: &Connection, filter: &FactFilter) -> Result<libsql::Rows, StoreError> {
    let result = match (&filter.node_path, filter.max_revision) {
        (Some(node_path), Some(max_revision)) => {
            let sql = format!(
                r#"{} WHERE "nodePath" = ? AND "revision" <= ?"#,
                SELECT_COLUMNS
            );
            conn.query(&sql, (node_path.as_str(), bound_revision(max_revision)))
                .await
        }
        (Some(node_path), None) => {
            let sql = format!(r#"{} WHERE "nodePath" = ?"#, SELECT_COLUMNS);
            conn.query(&sql, [node_path.as_str()]).await
        }
        (None, Some(max_revision)) => {
            let sql = format!(r#"{} WHERE "revision" <= ?"#, SELECT_COLUMNS);
            conn.query(&sql, [bound_revision(max_revision)]).await
        }
        (None, None) => conn.query(SELECT_COLUMNS, ()).await,
    };
    result.map_err(|e| {
        StoreError::backend_unavailable(format!("Failed to query fact documents: {}", e))
    })
}

/// Stored revisions never exceed `i64::MAX` (enforced on insert), so an
/// upper bound past that range matches every stored revision.
fn bound_revision(revision: u64) -> i64 {
    i64::try_from(revision).unwrap_or(i64::MAX)
}

// Include tests
#[cfg(test)]
#[path = "turso_test.rs"]
mod turso_test;
