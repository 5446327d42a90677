pub mod credentials;
pub mod fields;
pub mod record;
pub mod submission;

pub use credentials::{CredentialError, Credentials};
pub use fields::{
    FieldCategory, FieldGroups, categorize, field_presence, group_fields, render_value,
    scan_markers, truncate,
};
pub use record::{Record, field_populated, is_populated, project, text};
pub use submission::{
    AiProcessingStatus, AuditLog, NewSubmission, WebhookExecution, test_compliance_id,
};

/// Main submissions table.
pub const SUBMISSIONS: &str = "submissions";
/// Webhook execution log maintained by the automation system.
pub const WEBHOOK_EXECUTIONS: &str = "n8n_webhook_executions";
/// Audit log maintained by the automation system.
pub const AUDIT_LOGS: &str = "audit_logs";
