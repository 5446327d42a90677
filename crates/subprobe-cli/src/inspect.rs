//! Read-only diagnostics: field dumps, status checks, log tables, table counts.

use std::path::{Path, PathBuf};

use serde_json::json;
use subprobe_core::fields::{PROVENANCE_MARKERS, SEO_CHECKLIST};
use subprobe_core::{
    AUDIT_LOGS, AiProcessingStatus, AuditLog, Record, SUBMISSIONS, WEBHOOK_EXECUTIONS,
    WebhookExecution, field_populated, field_presence, project, scan_markers,
};
use subprobe_store::{Query, Store, fetch_by_id};
use tracing::warn;

use crate::display::{self, FAIL, OK, PENDING};
use crate::dump;

/// Submission inspected by `fields` and `detail` when no ID is given.
pub const DEFAULT_INSPECT_ID: &str = "367789ee-9e5d-4a16-9c27-30d475736dab";
/// Submission checked by `status` when no ID is given.
pub const DEFAULT_STATUS_ID: &str = "d3baa593-bd9a-4e9a-98e9-ab460e3a9960";

/// Tables probed by `tables`; some only exist on older deployments.
pub const KNOWN_TABLES: &[&str] = &[
    SUBMISSIONS,
    WEBHOOK_EXECUTIONS,
    "webhook_executions",
    "seo_automation_logs",
    "automation_logs",
    AUDIT_LOGS,
];

/// Fields summarised by `status` and saved alongside the full row.
pub const STATUS_FIELDS: &[&str] = &[
    "workflow_stage",
    "ai_processing_status",
    "ai_generated_content",
    "seo_title",
    "meta_description",
    "primary_keywords",
    "secondary_keywords",
    "h1_tag",
    "h2_tags",
    "geo_event_tags",
    "seo_strategy_outline",
    "competitive_analysis",
    "ai_error",
];

const RECENT_LIMIT: usize = 10;
const LOG_LIMIT: usize = 10;
const AUDIT_SHOWN: usize = 5;
const PROCESSED_LIMIT: usize = 5;

// ── fields ──

#[derive(Debug, PartialEq)]
pub struct FieldsSummary {
    pub marker_hits: Vec<String>,
    pub populated: Vec<String>,
}

/// Every field of a submission, bucketed, plus provenance scan and SEO checklist.
pub async fn fields(store: &dyn Store, id: &str) -> anyhow::Result<Option<FieldsSummary>> {
    let Some(record) = fetch_by_id(store, SUBMISSIONS, id).await? else {
        println!("{FAIL} Submission not found: {id}");
        return Ok(None);
    };

    display::banner(&format!("COMPLETE FIELD LIST FOR SUBMISSION {id}"));
    display::print_field_groups(&record);

    let marker_hits = scan_markers(&record, PROVENANCE_MARKERS);
    display::print_marker_scan(&marker_hits);

    let presence = field_presence(&record, SEO_CHECKLIST);
    display::print_presence(&presence);

    Ok(Some(FieldsSummary {
        marker_hits,
        populated: presence
            .into_iter()
            .filter(|(_, present)| *present)
            .map(|(name, _)| name.to_string())
            .collect(),
    }))
}

// ── status ──

#[derive(Debug, PartialEq)]
pub enum StatusReport {
    NotFound,
    Pending,
    Generated { dump: PathBuf },
}

/// AI status of one submission; saves the row once content exists.
pub async fn status(store: &dyn Store, id: &str, out_dir: &Path) -> anyhow::Result<StatusReport> {
    println!("Checking submission: {id}\n");
    let Some(record) = fetch_by_id(store, SUBMISSIONS, id).await? else {
        println!("{FAIL} Submission not found: {id}");
        return Ok(StatusReport::NotFound);
    };

    println!("📊 Submission Status:");
    display::kv("Compliance ID", &record, "compliance_id");
    display::kv("Product", &record, "product_name");
    display::kv("Workflow Stage", &record, "workflow_stage");
    display::kv("AI Processing Status", &record, "ai_processing_status");

    if field_populated(&record, "ai_error") {
        println!("\n{FAIL} AI Error: {}", display::plain(record.get("ai_error")));
    }

    if !field_populated(&record, "ai_generated_content") {
        println!("\n{PENDING} No AI content generated yet");
        println!("AI processing may still be in progress or there might be an error");
        return Ok(StatusReport::Pending);
    }

    println!("\n{OK} AI content generated successfully!");
    display::print_generated_preview(&record);

    let report = json!({
        "submission_id": id,
        "compliance_id": record.get("compliance_id"),
        "ai_fields": project(&record, STATUS_FIELDS),
        "full_submission": record,
    });
    let path = dump::write_report(out_dir, "submission", id, &report)?;
    println!("\nFull results saved to: {}", path.display());
    Ok(StatusReport::Generated { dump: path })
}

// ── detail ──

/// Sectioned view of AI/SEO state for one submission; always saves the row.
pub async fn detail(store: &dyn Store, id: &str, out_dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    println!("Detailed check for submission: {id}\n");
    let Some(record) = fetch_by_id(store, SUBMISSIONS, id).await? else {
        println!("{FAIL} Submission not found: {id}");
        return Ok(None);
    };

    println!("=== AI PROCESSING STATUS ===");
    display::kv("ai_processing_status", &record, "ai_processing_status");
    display::yes_no(&record, "ai_generated_content");
    display::kv("ai_error", &record, "ai_error");

    println!("\n=== SEO CONTENT FIELDS ===");
    display::yes_no(&record, "seo_content");
    if let Some(content) = record.get("seo_content").and_then(|v| v.as_str())
        && !content.is_empty()
    {
        println!("  Length: {} characters", content.chars().count());
        println!("  Preview: {}...", content.chars().take(200).collect::<String>());
    }
    println!();
    for field in ["seo_title", "meta_title", "meta_description", "seo_keywords"] {
        display::kv(field, &record, field);
    }

    println!("\n=== OTHER SEO FIELDS ===");
    for field in [
        "primary_keywords",
        "secondary_keywords",
        "h1_tag",
        "h2_tags",
        "geo_event_tags",
    ] {
        display::kv(field, &record, field);
    }
    display::yes_no(&record, "seo_strategy_outline");
    display::yes_no(&record, "competitive_analysis");

    println!("\n=== TIMESTAMPS ===");
    for field in [
        "created_at",
        "updated_at",
        "ai_processing_started_at",
        "ai_processing_completed_at",
    ] {
        display::kv(field, &record, field);
    }

    println!("\n=== WORKFLOW INFO ===");
    display::kv("workflow_stage", &record, "workflow_stage");
    display::kv("status", &record, "status");

    if let Some(content) = record.get("ai_generated_content")
        && field_populated(&record, "ai_generated_content")
    {
        println!("\n=== AI GENERATED CONTENT DETAILS ===");
        display::print_content_details(content);
    }

    let path = dump::write_report(
        out_dir,
        "detailed_submission",
        id,
        &serde_json::Value::Object(record),
    )?;
    println!("\n\nComplete submission data saved to: {}", path.display());
    Ok(Some(path))
}

// ── logs ──

/// Row counts per section; `None` where the section's query failed.
#[derive(Debug, Default, PartialEq)]
pub struct LogsSummary {
    pub webhook_executions: Option<usize>,
    pub audit_logs: Option<usize>,
    pub processed_submissions: Option<usize>,
}

/// Recent webhook executions, audit entries, and submissions past `pending`.
///
/// Each section stands alone: a failing query is reported and the next runs.
pub async fn logs(store: &dyn Store) -> LogsSummary {
    let mut summary = LogsSummary::default();

    println!("Checking recent webhook executions...\n");
    let query = Query::table(WEBHOOK_EXECUTIONS)
        .order_desc("created_at")
        .limit(LOG_LIMIT);
    match store.select(&query).await {
        Ok(rows) if rows.is_empty() => {
            println!("No webhook executions found in {WEBHOOK_EXECUTIONS} table");
            summary.webhook_executions = Some(0);
        }
        Ok(rows) => {
            println!("Found {} recent webhook executions:", rows.len());
            for row in &rows {
                display::print_webhook_execution(&typed::<WebhookExecution>(row));
            }
            summary.webhook_executions = Some(rows.len());
        }
        Err(e) => {
            warn!(table = WEBHOOK_EXECUTIONS, error = %e, "log query failed");
            println!("{FAIL} Error accessing {WEBHOOK_EXECUTIONS}: {e}");
        }
    }

    println!("\n\nChecking audit logs...");
    let query = Query::table(AUDIT_LOGS)
        .order_desc("created_at")
        .limit(LOG_LIMIT);
    match store.select(&query).await {
        Ok(rows) if rows.is_empty() => {
            println!("No audit logs found");
            summary.audit_logs = Some(0);
        }
        Ok(rows) => {
            println!("\nFound {} recent audit logs:", rows.len());
            for row in rows.iter().take(AUDIT_SHOWN) {
                display::print_audit_log(&typed::<AuditLog>(row));
            }
            summary.audit_logs = Some(rows.len());
        }
        Err(e) => {
            warn!(table = AUDIT_LOGS, error = %e, "log query failed");
            println!("{FAIL} Error accessing {AUDIT_LOGS}: {e}");
        }
    }

    println!("\n\nChecking submissions with AI processing...");
    let query = Query::table(SUBMISSIONS)
        .select("id, compliance_id, workflow_stage, ai_processing_status, ai_error, created_at")
        .neq("ai_processing_status", AiProcessingStatus::Pending.as_str())
        .order_desc("created_at")
        .limit(PROCESSED_LIMIT);
    match store.select(&query).await {
        Ok(rows) if rows.is_empty() => {
            println!("No submissions found with AI processing updates");
            summary.processed_submissions = Some(0);
        }
        Ok(rows) => {
            println!("\nFound {} submissions with AI processing updates:", rows.len());
            for row in &rows {
                println!("\n- ID: {}", display::plain(row.get("id")));
                println!("  Compliance ID: {}", display::plain(row.get("compliance_id")));
                println!("  Workflow Stage: {}", display::plain(row.get("workflow_stage")));
                println!("  AI Status: {}", display::plain(row.get("ai_processing_status")));
                println!("  AI Error: {}", display::plain(row.get("ai_error")));
            }
            summary.processed_submissions = Some(rows.len());
        }
        Err(e) => {
            warn!(table = SUBMISSIONS, error = %e, "submission query failed");
            println!("{FAIL} Error checking submissions: {e}");
        }
    }

    summary
}

/// Deserialise a log row leniently; unreadable rows print as all-`None`.
fn typed<T: serde::de::DeserializeOwned + Default>(row: &Record) -> T {
    serde_json::from_value(serde_json::Value::Object(row.clone())).unwrap_or_default()
}

// ── recent ──

#[derive(Debug, PartialEq)]
pub struct RecentSummary {
    pub total: usize,
    pub with_ai: usize,
}

/// Newest submissions with a per-row AI content marker.
pub async fn recent(store: &dyn Store) -> anyhow::Result<RecentSummary> {
    println!("📊 CHECKING AI PROCESSING STATUS\n");
    let rows = store
        .select(
            &Query::table(SUBMISSIONS)
                .select(
                    "compliance_id, product_name, workflow_stage, ai_processing_status, \
                     created_at, seo_keywords, meta_title",
                )
                .order_desc("created_at")
                .limit(RECENT_LIMIT),
        )
        .await?;

    println!("Recent submissions:\n");
    let mut with_ai = 0;
    for row in &rows {
        let has_ai = has_ai_output(row);
        if has_ai {
            with_ai += 1;
        }
        println!("{} {}", if has_ai { OK } else { FAIL }, display::plain(row.get("compliance_id")));
        println!("   Product: {}", display::plain(row.get("product_name")));
        println!("   Stage: {}", display::plain(row.get("workflow_stage")));
        let status = AiProcessingStatus::of(row)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "not started".to_string());
        println!("   AI Status: {status}");
        println!("   AI Content: {}", if has_ai { "YES" } else { "NO" });
        println!("   Created: {}", display::plain(row.get("created_at")));
        println!();
    }

    if with_ai > 0 {
        println!("\n{OK} Found {with_ai} submissions with AI content!");
    } else {
        println!("\n{FAIL} No submissions have AI-generated content yet.");
    }
    Ok(RecentSummary {
        total: rows.len(),
        with_ai,
    })
}

fn has_ai_output(row: &Record) -> bool {
    field_populated(row, "seo_keywords") || field_populated(row, "meta_title")
}

// ── tables ──

/// Procedure that lists the database's tables, where installed.
pub const TABLE_LIST_FUNCTION: &str = "get_table_names";

#[derive(Debug, PartialEq)]
pub enum TablesReport {
    /// The database listed its own tables.
    Listed(serde_json::Value),
    /// Per known table: exact row count, or why it could not be counted.
    Counted(Vec<(String, Result<u64, String>)>),
}

/// Ask the database for its tables; without the listing procedure, count
/// each known table instead. Missing tables are reported inline.
pub async fn tables(store: &dyn Store) -> TablesReport {
    match store.rpc(TABLE_LIST_FUNCTION, &json!({})).await {
        Ok(listed) => {
            println!("Tables in database: {listed}");
            return TablesReport::Listed(listed);
        }
        Err(e) => println!("Could not get table names via RPC: {}", e.message()),
    }

    println!("\nChecking known tables:");
    let mut results = Vec::with_capacity(KNOWN_TABLES.len());
    for &table in KNOWN_TABLES {
        let result = store.count(table).await.map_err(|e| e.message());
        match &result {
            Ok(n) => println!("✓ {table} exists ({n} rows)"),
            Err(msg) => println!("✗ {table}: {msg}"),
        }
        results.push((table.to_string(), result));
    }
    TablesReport::Counted(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use subprobe_store::MemoryStore;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn store_with(rows: Vec<Value>) -> MemoryStore {
        MemoryStore::new().with_rows(SUBMISSIONS, rows.into_iter().map(record).collect())
    }

    #[tokio::test]
    async fn fields_reports_markers_and_checklist() {
        let store = store_with(vec![json!({
            "id": "s1",
            "seo_content": "Researched with Perplexity",
            "seo_title": "Title",
            "h2_tags": [],
            "product_name": "Keytruda Plus"
        })]);
        let summary = fields(&store, "s1").await.unwrap().unwrap();
        assert_eq!(summary.marker_hits, vec!["seo_content"]);
        assert_eq!(summary.populated, vec!["seo_content", "seo_title"]);
    }

    #[tokio::test]
    async fn fields_missing_submission() {
        let store = MemoryStore::new().with_table(SUBMISSIONS);
        assert!(fields(&store, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_pending_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(vec![json!({"id": "s1", "ai_processing_status": "pending"})]);
        let report = status(&store, "s1", dir.path()).await.unwrap();
        assert_eq!(report, StatusReport::Pending);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn status_generated_dumps_ai_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(vec![json!({
            "id": "s1",
            "compliance_id": "TEST-AI-1",
            "ai_processing_status": "completed",
            "ai_generated_content": "copy",
            "seo_title": "Title"
        })]);
        let report = status(&store, "s1", dir.path()).await.unwrap();
        let StatusReport::Generated { dump } = report else {
            panic!("expected Generated");
        };
        assert!(dump.ends_with("submission_s1.json"));

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(dump).unwrap()).unwrap();
        assert_eq!(saved["compliance_id"], "TEST-AI-1");
        assert_eq!(saved["ai_fields"]["seo_title"], "Title");
        assert!(saved["ai_fields"]["h1_tag"].is_null());
        assert_eq!(saved["full_submission"]["id"], "s1");
    }

    #[tokio::test]
    async fn status_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new().with_table(SUBMISSIONS);
        assert_eq!(
            status(&store, "nope", dir.path()).await.unwrap(),
            StatusReport::NotFound
        );
    }

    #[tokio::test]
    async fn detail_always_dumps_row() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(vec![json!({
            "id": "s1",
            "ai_generated_content": "{\"title\": \"T\"}",
            "seo_content": "x".repeat(300)
        })]);
        let path = detail(&store, "s1", dir.path()).await.unwrap().unwrap();
        assert!(path.ends_with("detailed_submission_s1.json"));
        let saved: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(saved["id"], "s1");
    }

    #[tokio::test]
    async fn logs_sections_are_independent() {
        // No log tables registered: the first two sections fail, the third still runs.
        let store = store_with(vec![
            json!({"id": "a", "ai_processing_status": "pending", "created_at": "2026-01-01"}),
            json!({"id": "b", "ai_processing_status": "error", "ai_error": "timeout", "created_at": "2026-01-02"}),
        ]);
        let summary = logs(&store).await;
        assert_eq!(
            summary,
            LogsSummary {
                webhook_executions: None,
                audit_logs: None,
                processed_submissions: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn logs_counts_rows() {
        let store = MemoryStore::new()
            .with_rows(
                WEBHOOK_EXECUTIONS,
                vec![record(json!({"submission_id": "a", "status": "sent", "created_at": "2026-01-01"}))],
            )
            .with_rows(
                AUDIT_LOGS,
                (0..7)
                    .map(|i| record(json!({"action": "update", "created_at": format!("2026-01-0{i}")})))
                    .collect(),
            )
            .with_table(SUBMISSIONS);
        let summary = logs(&store).await;
        assert_eq!(summary.webhook_executions, Some(1));
        assert_eq!(summary.audit_logs, Some(7));
        assert_eq!(summary.processed_submissions, Some(0));
    }

    #[tokio::test]
    async fn recent_counts_ai_output() {
        let store = store_with(vec![
            json!({"compliance_id": "TEST-1", "created_at": "2026-01-01", "meta_title": "M"}),
            json!({"compliance_id": "TEST-2", "created_at": "2026-01-02", "seo_keywords": null}),
            json!({"compliance_id": "TEST-3", "created_at": "2026-01-03", "seo_keywords": ["k"]}),
        ]);
        let summary = recent(&store).await.unwrap();
        assert_eq!(summary, RecentSummary { total: 3, with_ai: 2 });
    }

    #[tokio::test]
    async fn tables_report_missing_ones() {
        let store = MemoryStore::new().with_table(SUBMISSIONS).with_table(AUDIT_LOGS);
        let TablesReport::Counted(results) = tables(&store).await else {
            panic!("expected per-table counts");
        };
        assert_eq!(results.len(), KNOWN_TABLES.len());
        assert_eq!(results[0], (SUBMISSIONS.to_string(), Ok(0)));
        assert!(results[1].1.is_err());
        assert_eq!(results[5], (AUDIT_LOGS.to_string(), Ok(0)));
    }

    #[tokio::test]
    async fn tables_listed_by_database_skip_counting() {
        let store = MemoryStore::new()
            .with_function(TABLE_LIST_FUNCTION, json!(["submissions", "audit_logs"]));
        assert_eq!(
            tables(&store).await,
            TablesReport::Listed(json!(["submissions", "audit_logs"]))
        );
    }

    #[tokio::test]
    async fn failing_table_listing_falls_back_to_counts() {
        let store = MemoryStore::new()
            .with_rows(SUBMISSIONS, vec![record(json!({"id": "a"}))])
            .with_failing_function(TABLE_LIST_FUNCTION, "permission denied for schema information_schema");
        let TablesReport::Counted(results) = tables(&store).await else {
            panic!("expected per-table counts");
        };
        assert_eq!(results[0], (SUBMISSIONS.to_string(), Ok(1)));
        assert!(results[2].1.as_ref().is_err_and(|msg| msg.contains("does not exist")));
    }
}
