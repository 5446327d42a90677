//! Outbound webhook trigger and the fixed-budget poll loop that watches for its effects.

pub mod poll;
pub mod webhook;

pub use poll::{AI_CONTENT_FIELD, PollConfig, PollOutcome, poll_for_field};
pub use webhook::{
    DEFAULT_WEBHOOK_URL, WebhookClient, WebhookError, WebhookPayload, WebhookResponse,
};
