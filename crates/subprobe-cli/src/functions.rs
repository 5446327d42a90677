//! `functions`: which RPC functions the database exposes.

use serde_json::{Value, json};
use subprobe_store::probe::KNOWN_FUNCTIONS;
use subprobe_store::{RpcOutcome, Store, probe_functions};

use crate::display::{FAIL, OK, WARN};

/// Reports schema details when called; shown after the probe table.
pub const SCHEMA_FUNCTION: &str = "check_submissions_schema";

const ERROR_PREVIEW_CHARS: usize = 100;

/// Probe each known function, then show what the schema helper returns.
///
/// Returns the probe results plus the schema helper's data, if it had any.
pub async fn functions(store: &dyn Store) -> (Vec<(String, RpcOutcome)>, Option<Value>) {
    println!("Testing available functions:\n");
    let results = probe_functions(store, KNOWN_FUNCTIONS).await;
    for (name, outcome) in &results {
        match outcome {
            RpcOutcome::Succeeded(_) => println!("{OK} {name} - Function exists"),
            RpcOutcome::NotFound => println!("{FAIL} {name} - Function not found"),
            RpcOutcome::Errored(msg) => {
                let head: String = msg.chars().take(ERROR_PREVIEW_CHARS).collect();
                println!("{WARN} {name} - Function exists but error: {head}...");
            }
        }
    }

    println!("\n\nTrying {SCHEMA_FUNCTION} function...");
    let schema = match store.rpc(SCHEMA_FUNCTION, &json!({})).await {
        Ok(data) if has_data(&data) => {
            println!("{OK} {SCHEMA_FUNCTION} returned data:");
            println!("{data}");
            Some(data)
        }
        Ok(_) => None,
        Err(e) => {
            println!("Error: {}", e.message());
            None
        }
    };

    (results, schema)
}

fn has_data(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}
