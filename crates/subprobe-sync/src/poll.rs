//! Fixed-budget polling for a field to be filled in by the automation system.
//!
//! Each attempt sleeps for the interval, then re-reads the row. There is no
//! backoff, and "still processing" is indistinguishable from "never will".

use std::time::Duration;

use subprobe_core::{Record, field_populated};
use subprobe_store::{Store, fetch_by_id};
use tracing::{debug, warn};

/// Field the AI workflow writes when it finishes.
pub const AI_CONTENT_FIELD: &str = "ai_generated_content";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    /// Every 5 seconds, 6 times.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 6,
        }
    }
}

impl PollConfig {
    pub fn total_wait(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The field was populated on attempt number `attempt` (1-based).
    Found { attempt: u32, record: Record },
    /// Every attempt came back empty. `last` is the most recent row seen, if any.
    Exhausted { attempts: u32, last: Option<Record> },
}

impl PollOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PollOutcome::Found { .. })
    }
}

/// Poll `table` row `id` until `field` is populated or the budget runs out.
///
/// `on_attempt` sees the attempt number and the row (if the fetch succeeded and
/// the row exists). Fetch errors use up an attempt and are logged.
pub async fn poll_for_field<F>(
    store: &dyn Store,
    table: &str,
    id: &str,
    field: &str,
    config: &PollConfig,
    mut on_attempt: F,
) -> PollOutcome
where
    F: FnMut(u32, Option<&Record>),
{
    let mut last = None;
    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        let row = match fetch_by_id(store, table, id).await {
            Ok(row) => row,
            Err(e) => {
                warn!(attempt, error = %e, "poll fetch failed");
                None
            }
        };
        on_attempt(attempt, row.as_ref());

        if let Some(record) = row {
            if field_populated(&record, field) {
                debug!(attempt, field, "field populated");
                return PollOutcome::Found { attempt, record };
            }
            last = Some(record);
        }
        debug!(attempt, field, "field still empty");
    }
    PollOutcome::Exhausted {
        attempts: config.max_attempts,
        last,
    }
}
