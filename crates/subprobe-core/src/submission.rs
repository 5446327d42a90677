//! Typed views over the rows these tools write or read from the log tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;

/// Lifecycle of AI processing on a submission, as written by the automation system.
///
/// Observed transitions are `pending → processing → completed | error`; nothing
/// here enforces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiProcessingStatus {
    Pending,
    Processing,
    Completed,
    Error,
    Unknown(String),
}

impl AiProcessingStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "error" => Self::Error,
            _ => Self::Unknown(s.to_string()),
        }
    }

    /// Read the status off a record; `None` when the column is null or absent.
    pub fn of(record: &Record) -> Option<Self> {
        record
            .get("ai_processing_status")
            .and_then(Value::as_str)
            .map(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Unknown(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl std::fmt::Display for AiProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field set for a test submission insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub compliance_id: String,
    pub product_name: String,
    pub generic_name: String,
    pub indication: String,
    pub therapeutic_area: String,
    pub submitter_email: String,
    pub submitter_name: String,
    pub seo_reviewer_name: String,
    pub seo_reviewer_email: String,
    pub workflow_stage: String,
    pub priority_level: String,
    pub ai_processing_status: String,
    pub raw_input_content: String,
    /// RFC 3339 timestamp string.
    pub created_at: String,
    /// RFC 3339 timestamp string.
    pub updated_at: String,
}

/// `TEST-<LABEL>-<unix seconds>`; unique per second, not idempotent.
pub fn test_compliance_id(label: &str, now: DateTime<Utc>) -> String {
    format!("TEST-{}-{}", label.to_ascii_uppercase(), now.timestamp())
}

impl NewSubmission {
    /// A draft oncology submission awaiting AI processing.
    pub fn sample(label: &str, now: DateTime<Utc>) -> Self {
        let ts = now.to_rfc3339();
        Self {
            compliance_id: test_compliance_id(label, now),
            product_name: "Opdivo Plus".into(),
            generic_name: "nivolumab-ipilimumab".into(),
            indication: "Unresectable malignant pleural mesothelioma".into(),
            therapeutic_area: "Oncology".into(),
            submitter_email: "final.test@pharma.com".into(),
            submitter_name: "Dr. Final Test".into(),
            seo_reviewer_name: "SEO Expert".into(),
            seo_reviewer_email: "seo@3cubed.com".into(),
            workflow_stage: "draft".into(),
            priority_level: "high".into(),
            ai_processing_status: "pending".into(),
            raw_input_content: "Product: Opdivo Plus (nivolumab + ipilimumab)\n\
                Indication: First-line treatment of unresectable malignant pleural mesothelioma\n\
                Key Clinical Data:\n\
                - CheckMate 743 trial\n\
                - Overall Survival: 18.1 vs 14.1 months (HR 0.74, p=0.002)\n\
                - 3-year OS rate: 23% vs 15%\n\
                Target Audience: Oncologists, thoracic surgeons"
                .into(),
            created_at: ts.clone(),
            updated_at: ts,
        }
    }

    pub fn to_record(&self) -> Result<Record, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

/// Row of `n8n_webhook_executions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookExecution {
    pub submission_id: Option<String>,
    pub status: Option<String>,
    pub response_data: Option<Value>,
    pub error_message: Option<String>,
    pub created_at: Option<String>,
}

/// Row of `audit_logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub user_email: Option<String>,
    pub created_at: Option<String>,
}
