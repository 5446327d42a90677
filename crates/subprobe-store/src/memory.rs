//! In-process store with the same observable behaviour as the REST gateway.
//!
//! Test double for the `Store` seam. Tables spring into existence on first insert
//! (or via [`MemoryStore::with_table`]); remote procedures must be registered.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use subprobe_core::Record;

use crate::{Query, Store, StoreError};

enum Procedure {
    Returns(Value),
    Fails(String),
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    procedures: HashMap<String, Procedure>,
    next_id: AtomicU64,
    silent_inserts: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty table so that selects and counts succeed.
    pub fn with_table(self, table: &str) -> Self {
        self.lock_tables().entry(table.to_string()).or_default();
        self
    }

    /// Seed a table with existing rows.
    pub fn with_rows(self, table: &str, rows: Vec<Record>) -> Self {
        self.lock_tables()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }

    /// Register a procedure that returns `result`.
    pub fn with_function(mut self, name: &str, result: Value) -> Self {
        self.procedures
            .insert(name.to_string(), Procedure::Returns(result));
        self
    }

    /// Register a procedure that exists but raises `message`.
    pub fn with_failing_function(mut self, name: &str, message: &str) -> Self {
        self.procedures
            .insert(name.to_string(), Procedure::Fails(message.to_string()));
        self
    }

    /// Store inserted rows but echo nothing back, like a gateway without
    /// `return=representation`.
    pub fn with_silent_inserts(mut self) -> Self {
        self.silent_inserts = true;
        self
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Record>>> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn missing_table(table: &str) -> StoreError {
        StoreError::Api {
            status: 404,
            message: format!("relation \"public.{table}\" does not exist"),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        let tables = self.lock_tables();
        let rows = tables
            .get(&query.table)
            .ok_or_else(|| Self::missing_table(&query.table))?;

        let mut matched: Vec<Record> = rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            matched.sort_by(|a, b| {
                let key = |r: &Record| r.get(&order.column).map(sort_key).unwrap_or_default();
                let ord = key(a).cmp(&key(b));
                if order.descending { ord.reverse() } else { ord }
            });
        }
        if let Some(n) = query.limit {
            matched.truncate(n);
        }
        if let Some(columns) = query.column_list() {
            matched = matched
                .into_iter()
                .map(|row| {
                    columns
                        .iter()
                        .filter_map(|&c| row.get(c).map(|v| (c.to_string(), v.clone())))
                        .collect()
                })
                .collect();
        }
        Ok(matched)
    }

    async fn insert(&self, table: &str, record: &Record) -> Result<Vec<Record>, StoreError> {
        let mut row = record.clone();
        if !row.contains_key("id") {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            row.insert("id".into(), Value::String(format!("mem-{n:08}")));
        }
        self.lock_tables()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        if self.silent_inserts {
            return Ok(Vec::new());
        }
        Ok(vec![row])
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        patch: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        let mut tables = self.lock_tables();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Self::missing_table(table))?;
        let mut updated = Vec::new();
        for row in rows
            .iter_mut()
            .filter(|r| r.get("id").and_then(Value::as_str) == Some(id))
        {
            for (k, v) in patch {
                row.insert(k.clone(), v.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn rpc(&self, function: &str, _args: &Value) -> Result<Value, StoreError> {
        match self.procedures.get(function) {
            Some(Procedure::Returns(v)) => Ok(v.clone()),
            Some(Procedure::Fails(message)) => Err(StoreError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Err(StoreError::Api {
                status: 404,
                message: format!(
                    "Could not find the function public.{function} without parameters in the schema cache"
                ),
            }),
        }
    }

    async fn count(&self, table: &str) -> Result<u64, StoreError> {
        let tables = self.lock_tables();
        let rows = tables.get(table).ok_or_else(|| Self::missing_table(table))?;
        Ok(rows.len() as u64)
    }
}

fn sort_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
