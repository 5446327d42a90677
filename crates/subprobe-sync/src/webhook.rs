//! Outbound webhook to the workflow-automation service.
//!
//! One POST per trigger, JSON body, no authentication, no retry. A non-2xx
//! answer is reported back to the caller rather than raised.

use serde::{Deserialize, Serialize};
use subprobe_core::{Record, text};
use thiserror::Error;
use tracing::info;

/// Production webhook of the submission workflow.
pub const DEFAULT_WEBHOOK_URL: &str = "https://innovareai.app.n8n.cloud/webhook/hP9yZxUjmBKJmrZt";

/// Response bodies are cut to this many characters.
pub const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Submission identifiers and descriptive fields sent to the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub submission_id: Option<String>,
    pub compliance_id: Option<String>,
    pub product_name: Option<String>,
    pub generic_name: Option<String>,
    pub indication: Option<String>,
    pub therapeutic_area: Option<String>,
    pub submitter_email: Option<String>,
    pub submitter_name: Option<String>,
    pub seo_reviewer_name: Option<String>,
    pub seo_reviewer_email: Option<String>,
    pub workflow_stage: Option<String>,
    pub priority_level: Option<String>,
    /// ISO 8601 timestamp string.
    pub created_at: Option<String>,
}

impl WebhookPayload {
    /// Build the payload from a submission row. Missing fields are sent as null.
    pub fn from_record(record: &Record) -> Self {
        let field = |name: &str| text(record, name).map(str::to_string);
        Self {
            submission_id: field("id"),
            compliance_id: field("compliance_id"),
            product_name: field("product_name"),
            generic_name: field("generic_name"),
            indication: field("indication"),
            therapeutic_area: field("therapeutic_area"),
            submitter_email: field("submitter_email"),
            submitter_name: field("submitter_name"),
            seo_reviewer_name: field("seo_reviewer_name"),
            seo_reviewer_email: field("seo_reviewer_email"),
            workflow_stage: field("workflow_stage"),
            priority_level: field("priority_level"),
            created_at: field("created_at"),
        }
    }
}

/// What came back from the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    /// First [`BODY_PREVIEW_CHARS`] characters of the body.
    pub body_preview: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct WebhookClient {
    client: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the payload once and record status plus a body preview.
    pub async fn trigger(&self, payload: &WebhookPayload) -> Result<WebhookResponse, WebhookError> {
        info!(
            url = %self.url,
            submission_id = ?payload.submission_id,
            "triggering webhook"
        );
        let resp = self.client.post(&self.url).json(payload).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        info!(status, "webhook responded");
        Ok(WebhookResponse {
            status,
            body_preview: body_preview(&body),
        })
    }
}

fn body_preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
