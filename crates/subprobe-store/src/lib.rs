//! Database access: the [`Store`] seam, the REST gateway client, and an in-memory stand-in.

mod error;
mod memory;
pub mod probe;
pub mod query;
mod rest;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use probe::{RpcOutcome, classify, probe_functions};
pub use query::{Filter, FilterOp, Query};
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use subprobe_core::Record;
use tracing::info;

/// Row-level operations against the hosted database.
#[async_trait]
pub trait Store: Send + Sync {
    /// Rows matching `query`, possibly none.
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Insert one row; returns the rows the server echoed back.
    async fn insert(&self, table: &str, record: &Record) -> Result<Vec<Record>, StoreError>;

    /// Apply a partial update to the row with primary key `id`.
    async fn update(&self, table: &str, id: &str, patch: &Record)
    -> Result<Vec<Record>, StoreError>;

    /// Invoke a remote procedure with JSON arguments.
    async fn rpc(&self, function: &str, args: &Value) -> Result<Value, StoreError>;

    /// Exact row count of `table`.
    async fn count(&self, table: &str) -> Result<u64, StoreError>;
}

/// Fetch a single row by primary key. Absence is `Ok(None)`.
pub async fn fetch_by_id(
    store: &dyn Store,
    table: &str,
    id: &str,
) -> Result<Option<Record>, StoreError> {
    let rows = store.select(&Query::table(table).eq("id", id)).await?;
    Ok(rows.into_iter().next())
}

/// Insert a row and require exactly one row back.
pub async fn insert_one(
    store: &dyn Store,
    table: &str,
    record: &Record,
) -> Result<Record, StoreError> {
    let rows = store.insert(table, record).await?;
    if rows.len() != 1 {
        return Err(StoreError::UnexpectedRowCount {
            operation: "insert",
            table: table.to_string(),
            rows: rows.len(),
        });
    }
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Other("empty insert".into()))?;
    info!(table, id = ?row.get("id"), "inserted row");
    Ok(row)
}

/// Partial update by primary key; no matching row is an error.
///
/// Callers usually downgrade failures to warnings.
pub async fn update_by_id(
    store: &dyn Store,
    table: &str,
    id: &str,
    patch: &Record,
) -> Result<Vec<Record>, StoreError> {
    let rows = store.update(table, id, patch).await?;
    if rows.is_empty() {
        return Err(StoreError::UnexpectedRowCount {
            operation: "update",
            table: table.to_string(),
            rows: 0,
        });
    }
    info!(table, id, rows = rows.len(), "updated row");
    Ok(rows)
}
