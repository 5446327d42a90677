//! Remote procedure discovery.
//!
//! Calls each candidate with empty arguments and sorts the result into one of
//! three outcomes. Only "callable or not" is inferred; return values are not
//! interpreted.

use serde_json::{Value, json};
use tracing::info;

use crate::{Store, StoreError};

/// Substring the gateway uses when a procedure does not exist.
pub const NOT_FOUND_MARKER: &str = "Could not find the function";

/// Procedures known to have existed on the submissions database at some point.
pub const KNOWN_FUNCTIONS: &[&str] = &[
    "run_seo_automation",
    "create_submission",
    "trigger_n8n_webhook",
    "check_submissions_schema",
];

#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    Succeeded(Value),
    NotFound,
    Errored(String),
}

impl RpcOutcome {
    pub fn exists(&self) -> bool {
        !matches!(self, RpcOutcome::NotFound)
    }
}

/// Classify the result of a single procedure call.
pub fn classify(result: Result<Value, StoreError>) -> RpcOutcome {
    match result {
        Ok(value) => RpcOutcome::Succeeded(value),
        Err(err) => {
            let message = err.message();
            if message.contains(NOT_FOUND_MARKER) {
                RpcOutcome::NotFound
            } else {
                RpcOutcome::Errored(message)
            }
        }
    }
}

/// Call each procedure with `{}` in order and classify the outcome.
pub async fn probe_functions(store: &dyn Store, names: &[&str]) -> Vec<(String, RpcOutcome)> {
    let mut outcomes = Vec::with_capacity(names.len());
    for &name in names {
        let outcome = classify(store.rpc(name, &json!({})).await);
        info!(function = name, exists = outcome.exists(), "probed procedure");
        outcomes.push((name.to_string(), outcome));
    }
    outcomes
}
