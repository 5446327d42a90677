//! End-to-end flows: create a test submission, trigger the workflow, watch for output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use subprobe_core::{
    AiProcessingStatus, NewSubmission, Record, SUBMISSIONS, field_populated, project, text,
};
use subprobe_store::{Query, Store, fetch_by_id, insert_one, update_by_id};
use subprobe_sync::{
    AI_CONTENT_FIELD, PollConfig, PollOutcome, WebhookClient, WebhookPayload, WebhookResponse,
    poll_for_field,
};
use tracing::warn;

use crate::display::{self, FAIL, OK, WARN};
use crate::dump;

/// Submission re-triggered by `trigger` when no ID is given.
pub const DEFAULT_TRIGGER_ID: &str = "63ebebb8-fe90-447e-8f4c-14d79fbf2fdb";

/// Label baked into compliance IDs of submissions made by `create`.
pub const TEST_LABEL: &str = "final";

/// Fields collected into `seo_data` when populated.
pub const SEO_RESULT_FIELDS: &[&str] = &[
    "seo_title",
    "meta_description",
    "meta_title",
    "seo_keywords",
    "primary_keywords",
    "secondary_keywords",
    "h1_tag",
    "h2_tags",
    "geo_event_tags",
];

/// Columns read back after the SEO automation procedure runs.
const SEO_REPORT_COLUMNS: &str = "id, compliance_id, product_name, workflow_stage, langchain_status, \
     seo_title, meta_description, seo_keywords, long_tail_keywords, \
     h2_tags, geo_event_tags, geo_optimization_score";

const SEO_PROCEDURE: &str = "run_seo_automation";
const AI_KEYS_SHOWN: usize = 5;

// ── create ──

/// Procedure that creates a submission server-side from `p_`-prefixed arguments.
pub const CREATE_PROCEDURE: &str = "create_submission";

/// Submission fields passed to [`CREATE_PROCEDURE`].
const PROCEDURE_FIELDS: &[&str] = &[
    "compliance_id",
    "product_name",
    "generic_name",
    "indication",
    "therapeutic_area",
    "submitter_email",
    "submitter_name",
    "seo_reviewer_name",
    "seo_reviewer_email",
    "workflow_stage",
    "priority_level",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedVia {
    Procedure,
    Insert,
}

/// Create a fresh pending test submission and return the stored row.
///
/// With `via_procedure` the create procedure is tried first; any failure, or
/// an answer without an ID, falls back to a direct insert.
pub async fn create_test_submission(
    store: &dyn Store,
    now: DateTime<Utc>,
    via_procedure: bool,
) -> anyhow::Result<(Record, CreatedVia)> {
    let submission = NewSubmission::sample(TEST_LABEL, now);
    println!(
        "Creating submission with compliance ID: {}",
        submission.compliance_id
    );

    if via_procedure {
        match create_via_procedure(store, &submission).await {
            Ok(row) => {
                println!(
                    "{OK} Submission created via function: {}",
                    display::plain(row.get("id"))
                );
                return Ok((row, CreatedVia::Procedure));
            }
            Err(e) => {
                warn!(procedure = CREATE_PROCEDURE, error = %e, "procedure create failed");
                println!("Function call failed: {e:#}");
                println!("Falling back to direct insert...");
            }
        }
    }

    let row = insert_one(store, SUBMISSIONS, &submission.to_record()?)
        .await
        .context("inserting test submission")?;
    Ok((row, CreatedVia::Insert))
}

/// `p_<field>` arguments for the create procedure.
pub fn procedure_args(submission: &NewSubmission) -> anyhow::Result<Value> {
    let record = submission.to_record()?;
    let args: Record = PROCEDURE_FIELDS
        .iter()
        .filter_map(|&f| record.get(f).map(|v| (format!("p_{f}"), v.clone())))
        .collect();
    Ok(Value::Object(args))
}

async fn create_via_procedure(
    store: &dyn Store,
    submission: &NewSubmission,
) -> anyhow::Result<Record> {
    let returned = store
        .rpc(CREATE_PROCEDURE, &procedure_args(submission)?)
        .await?;
    let id = returned_id(&returned).context("no data returned from function")?;
    fetch_by_id(store, SUBMISSIONS, &id)
        .await?
        .with_context(|| format!("created submission {id} not found"))
}

/// Submission ID in a procedure answer: a bare string, an object with `id`,
/// or the first element of a list of either.
fn returned_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => text(map, "id").map(str::to_string),
        Value::Array(items) => items.first().and_then(returned_id),
        _ => None,
    }
}

/// Flag the row as processing. Failure is printed and swallowed.
pub async fn mark_processing(store: &dyn Store, id: &str) -> bool {
    let mut patch = Record::new();
    patch.insert(
        "ai_processing_status".into(),
        Value::String(AiProcessingStatus::Processing.as_str().into()),
    );
    match update_by_id(store, SUBMISSIONS, id, &patch).await {
        Ok(_) => true,
        Err(e) => {
            warn!(id, error = %e, "status update failed");
            println!("{WARN}Warning: Could not update submission status: {e}");
            false
        }
    }
}

/// Populated SEO fields of a row, keyed by name.
pub fn seo_data(record: &Record) -> Record {
    project(record, SEO_RESULT_FIELDS)
        .into_iter()
        .filter(|(name, _)| field_populated(record, name))
        .collect()
}

/// The saved `test_results_<id>.json` document.
pub fn results_document(id: &str, compliance_id: &str, record: &Record) -> Value {
    let seo = seo_data(record);
    json!({
        "submission_id": id,
        "compliance_id": compliance_id,
        "ai_content_generated": field_populated(record, AI_CONTENT_FIELD),
        "seo_fields_populated": !seo.is_empty(),
        "seo_data": seo,
        "full_submission": record,
    })
}

#[derive(Debug)]
pub struct CreateReport {
    pub submission_id: String,
    pub created_via: CreatedVia,
    pub ai_content_generated: bool,
    pub seo_fields_populated: bool,
    pub dump: Option<PathBuf>,
}

/// Create, trigger, mark processing, poll, report, and save results.
pub async fn create(
    store: &dyn Store,
    webhook: &WebhookClient,
    poll: &PollConfig,
    via_procedure: bool,
    out_dir: &Path,
) -> anyhow::Result<CreateReport> {
    let (row, via) = create_test_submission(store, Utc::now(), via_procedure).await?;
    let id = submission_id(&row)?;
    let compliance_id = display::plain(row.get("compliance_id"));
    if via == CreatedVia::Insert {
        println!("{OK} Submission created: {id}");
    }

    fire_webhook(webhook, &row).await?;
    mark_processing(store, &id).await;

    wait_for_content(store, &id, poll).await;

    println!("\n\nFinal submission check...");
    let Some(record) = fetch_by_id(store, SUBMISSIONS, &id).await? else {
        println!("{FAIL} Could not retrieve submission {id}");
        return Ok(CreateReport {
            submission_id: id,
            created_via: via,
            ai_content_generated: false,
            seo_fields_populated: false,
            dump: None,
        });
    };

    println!("\n📊 FINAL RESULTS:");
    println!("Submission ID: {id}");
    println!("Compliance ID: {compliance_id}");
    display::kv("Workflow Stage", &record, "workflow_stage");
    display::kv("AI Processing Status", &record, "ai_processing_status");

    let ai_generated = field_populated(&record, AI_CONTENT_FIELD);
    if let Some(content) = record.get(AI_CONTENT_FIELD)
        && ai_generated
    {
        println!("\n{OK} AI CONTENT GENERATED SUCCESSFULLY!");
        print_ai_content(content);
    }

    let seo = seo_data(&record);
    print_seo_data(&seo);

    let document = results_document(&id, &compliance_id, &record);
    let path = dump::write_report(out_dir, "test_results", &id, &document)?;
    println!("\n📄 Full results saved to: {}", path.display());

    println!();
    display::rule();
    println!("SUMMARY:");
    println!("- Submission created: {OK}");
    println!("- AI content generated: {}", glyph(ai_generated));
    println!("- SEO fields populated: {}", glyph(!seo.is_empty()));
    display::rule();

    Ok(CreateReport {
        submission_id: id,
        created_via: via,
        ai_content_generated: ai_generated,
        seo_fields_populated: !seo.is_empty(),
        dump: Some(path),
    })
}

// ── trigger ──

/// Re-send an existing submission to the workflow and wait for its output.
pub async fn trigger(
    store: &dyn Store,
    webhook: &WebhookClient,
    id: &str,
    poll: &PollConfig,
) -> anyhow::Result<Option<PollOutcome>> {
    println!("Triggering workflow for submission: {id}\n");
    let Some(row) = fetch_by_id(store, SUBMISSIONS, id).await? else {
        println!("{FAIL} Submission not found: {id}");
        return Ok(None);
    };
    display::kv("Compliance ID", &row, "compliance_id");
    display::kv("Product", &row, "product_name");
    display::kv("AI Processing Status", &row, "ai_processing_status");

    fire_webhook(webhook, &row).await?;
    let outcome = wait_for_content(store, id, poll).await;

    if let PollOutcome::Found { record, .. } = &outcome {
        display::print_generated_preview(record);
    }
    Ok(Some(outcome))
}

// ── seo ──

/// Newest submission whose compliance ID starts with `TEST`.
pub async fn latest_test_submission(store: &dyn Store) -> anyhow::Result<Option<Record>> {
    let rows = store
        .select(
            &Query::table(SUBMISSIONS)
                .select("id, compliance_id, product_name")
                .like("compliance_id", "TEST%")
                .order_desc("created_at")
                .limit(1),
        )
        .await?;
    Ok(rows.into_iter().next())
}

#[derive(Debug, PartialEq)]
pub struct SeoReport {
    pub submission_id: String,
    pub seo_generated: bool,
}

/// Run the SEO procedure for a submission, wait `settle`, then show its SEO fields.
///
/// Without an ID the newest `TEST%` submission is used; having none is an error.
pub async fn seo(
    store: &dyn Store,
    id: Option<&str>,
    settle: Duration,
) -> anyhow::Result<Option<SeoReport>> {
    let id = match id {
        Some(id) => id.to_string(),
        None => {
            let Some(row) = latest_test_submission(store).await? else {
                bail!("no test submissions found");
            };
            println!(
                "Using most recent test submission: {} - {}",
                display::plain(row.get("compliance_id")),
                display::plain(row.get("product_name"))
            );
            submission_id(&row)?
        }
    };

    println!("\nTriggering SEO automation for submission: {id}");
    store
        .rpc(SEO_PROCEDURE, &json!({ "submission_id": id }))
        .await
        .with_context(|| format!("triggering SEO automation for {id}"))?;
    println!("{OK} SEO automation triggered successfully!");

    println!("\nWaiting {} seconds for processing...", settle.as_secs());
    tokio::time::sleep(settle).await;

    println!("\nChecking results...");
    let rows = store
        .select(
            &Query::table(SUBMISSIONS)
                .select(SEO_REPORT_COLUMNS)
                .eq("id", &id),
        )
        .await?;
    let Some(record) = rows.into_iter().next() else {
        println!("{FAIL} Could not retrieve submission");
        return Ok(None);
    };

    println!("\n📊 Submission Status:");
    display::kv("- Compliance ID", &record, "compliance_id");
    display::kv("- Product", &record, "product_name");
    display::kv("- Workflow Stage", &record, "workflow_stage");
    display::kv("- Langchain Status", &record, "langchain_status");

    let seo_generated = field_populated(&record, "seo_title");
    if seo_generated {
        println!("\n{OK} SEO content generated!");
        for (label, field) in [
            ("SEO Title", "seo_title"),
            ("Meta Description", "meta_description"),
            ("SEO Keywords", "seo_keywords"),
            ("Long Tail Keywords", "long_tail_keywords"),
            ("H2 Tags", "h2_tags"),
            ("GEO Event Tags", "geo_event_tags"),
            ("GEO Optimization Score", "geo_optimization_score"),
        ] {
            println!("- {label}: {}", display::plain(record.get(field)));
        }
    } else {
        println!("\n{WARN}SEO content generation may still be in progress or failed");
    }

    Ok(Some(SeoReport {
        submission_id: id,
        seo_generated,
    }))
}

// ── shared steps ──

fn submission_id(row: &Record) -> anyhow::Result<String> {
    row.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .context("submission row has no id")
}

async fn fire_webhook(webhook: &WebhookClient, row: &Record) -> anyhow::Result<WebhookResponse> {
    println!("\nTriggering webhook...");
    let response = webhook
        .trigger(&WebhookPayload::from_record(row))
        .await
        .with_context(|| format!("posting to {}", webhook.url()))?;
    for line in webhook_lines(&response) {
        println!("{line}");
    }
    Ok(response)
}

/// Console lines for a webhook answer: status, body preview when present,
/// and a warning for non-2xx.
fn webhook_lines(response: &WebhookResponse) -> Vec<String> {
    let mut lines = vec![format!("Webhook response status: {}", response.status)];
    if !response.body_preview.is_empty() {
        lines.push(format!("Response body: {}", response.body_preview));
    }
    if !response.is_success() {
        lines.push(format!("{WARN}Webhook answered {}", response.status));
    }
    lines
}

async fn wait_for_content(store: &dyn Store, id: &str, poll: &PollConfig) -> PollOutcome {
    println!(
        "\nWaiting up to {} seconds for AI processing...",
        poll.total_wait().as_secs()
    );
    let outcome = poll_for_field(store, SUBMISSIONS, id, AI_CONTENT_FIELD, poll, |n, row| {
        let status = row
            .and_then(AiProcessingStatus::of)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".into());
        println!("  Check {n}/{}: status {status}", poll.max_attempts);
    })
    .await;

    match &outcome {
        PollOutcome::Found { attempt, .. } if *attempt < poll.max_attempts => {
            println!("\n🎉 AI content detected early!")
        }
        PollOutcome::Found { .. } => println!("\n{OK} AI content detected"),
        PollOutcome::Exhausted { attempts, .. } => {
            println!("\n{FAIL} No AI content after {attempts} checks");
        }
    }
    outcome
}

fn print_ai_content(content: &Value) {
    println!("\nAI Generated Content Preview:");
    match content {
        Value::Object(map) => {
            for (key, value) in map.iter().take(AI_KEYS_SHOWN) {
                println!("- {key}: {}", display::preview(value));
            }
        }
        other => {
            let text = display::plain(Some(other));
            println!("- Content: {}...", text.chars().take(200).collect::<String>());
        }
    }
}

fn print_seo_data(seo: &Record) {
    if seo.is_empty() {
        println!("\n{FAIL} No SEO fields were populated");
        return;
    }
    println!("\n{OK} SEO FIELDS POPULATED:");
    for (field, value) in seo {
        println!("- {field}: {}", display::preview(value));
    }
}

fn glyph(ok: bool) -> &'static str {
    if ok { OK } else { FAIL }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subprobe_store::MemoryStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-21T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn inserted_submission_is_pending_test_row() {
        let store = MemoryStore::new();
        let (row, via) = create_test_submission(&store, fixed_now(), false).await.unwrap();
        assert_eq!(via, CreatedVia::Insert);
        assert_eq!(row["compliance_id"], "TEST-FINAL-1771668000");
        assert_eq!(row["ai_processing_status"], "pending");

        let id = submission_id(&row).unwrap();
        let fetched = fetch_by_id(&store, SUBMISSIONS, &id).await.unwrap().unwrap();
        assert_eq!(fetched["id"], row["id"]);
    }

    #[tokio::test]
    async fn silent_insert_is_an_error() {
        let store = MemoryStore::new().with_silent_inserts();
        assert!(create_test_submission(&store, Utc::now(), false).await.is_err());
    }

    #[tokio::test]
    async fn procedure_create_uses_returned_id() {
        let store = MemoryStore::new()
            .with_rows(
                SUBMISSIONS,
                vec![record(json!({"id": "rpc-1", "compliance_id": "TEST-FINAL-1771668000"}))],
            )
            .with_function(CREATE_PROCEDURE, json!("rpc-1"));
        let (row, via) = create_test_submission(&store, fixed_now(), true).await.unwrap();
        assert_eq!(via, CreatedVia::Procedure);
        assert_eq!(row["id"], "rpc-1");
        assert_eq!(store.count(SUBMISSIONS).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failing_procedure_falls_back_to_insert() {
        let store = MemoryStore::new()
            .with_table(SUBMISSIONS)
            .with_failing_function(CREATE_PROCEDURE, "null value in column \"stage\"");
        let (row, via) = create_test_submission(&store, fixed_now(), true).await.unwrap();
        assert_eq!(via, CreatedVia::Insert);
        assert_eq!(row["compliance_id"], "TEST-FINAL-1771668000");
        assert_eq!(store.count(SUBMISSIONS).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_procedure_answer_falls_back_to_insert() {
        let store = MemoryStore::new().with_function(CREATE_PROCEDURE, Value::Null);
        let (_, via) = create_test_submission(&store, fixed_now(), true).await.unwrap();
        assert_eq!(via, CreatedVia::Insert);
    }

    #[tokio::test]
    async fn procedure_id_without_row_falls_back_to_insert() {
        let store = MemoryStore::new()
            .with_table(SUBMISSIONS)
            .with_function(CREATE_PROCEDURE, json!({"id": "ghost"}));
        let (row, via) = create_test_submission(&store, fixed_now(), true).await.unwrap();
        assert_eq!(via, CreatedVia::Insert);
        assert_ne!(row["id"], "ghost");
    }

    #[tokio::test]
    async fn procedure_not_tried_unless_asked() {
        let store = MemoryStore::new()
            .with_table(SUBMISSIONS)
            .with_function(CREATE_PROCEDURE, json!("rpc-1"));
        let (_, via) = create_test_submission(&store, fixed_now(), false).await.unwrap();
        assert_eq!(via, CreatedVia::Insert);
    }

    #[test]
    fn procedure_args_are_prefixed() {
        let args = procedure_args(&NewSubmission::sample(TEST_LABEL, fixed_now())).unwrap();
        let args = args.as_object().unwrap();
        assert_eq!(args.len(), PROCEDURE_FIELDS.len());
        assert_eq!(args["p_compliance_id"], "TEST-FINAL-1771668000");
        assert_eq!(args["p_product_name"], "Opdivo Plus");
        assert!(args.get("p_ai_processing_status").is_none());
        assert!(args.get("compliance_id").is_none());
    }

    #[test]
    fn returned_id_shapes() {
        assert_eq!(returned_id(&json!("abc")), Some("abc".into()));
        assert_eq!(returned_id(&json!({"id": "abc"})), Some("abc".into()));
        assert_eq!(returned_id(&json!([{"id": "abc"}])), Some("abc".into()));
        assert_eq!(returned_id(&json!("")), None);
        assert_eq!(returned_id(&json!([])), None);
        assert_eq!(returned_id(&Value::Null), None);
    }

    #[test]
    fn webhook_lines_show_body_on_success() {
        let lines = webhook_lines(&WebhookResponse {
            status: 200,
            body_preview: "Workflow was started".into(),
        });
        assert_eq!(
            lines,
            vec!["Webhook response status: 200", "Response body: Workflow was started"]
        );
    }

    #[test]
    fn webhook_lines_warn_on_failure() {
        let lines = webhook_lines(&WebhookResponse {
            status: 404,
            body_preview: String::new(),
        });
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("Webhook answered 404"));
    }

    #[tokio::test]
    async fn fire_webhook_returns_reply_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-length: 20\r\nconnection: close\r\n\r\nWorkflow was started",
                )
                .await
                .unwrap();
            // Drain until the client hangs up.
            let _ = tokio::io::copy(&mut socket, &mut tokio::io::sink()).await;
        });

        let webhook = WebhookClient::new(format!("http://{addr}/webhook/test"));
        let row = record(json!({"id": "s1", "compliance_id": "TEST-FINAL-1"}));
        let response = fire_webhook(&webhook, &row).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body_preview, "Workflow was started");
    }

    #[tokio::test]
    async fn mark_processing_updates_status() {
        let store = MemoryStore::new()
            .with_rows(SUBMISSIONS, vec![record(json!({"id": "s1", "ai_processing_status": "pending"}))]);
        assert!(mark_processing(&store, "s1").await);
        let row = fetch_by_id(&store, SUBMISSIONS, "s1").await.unwrap().unwrap();
        assert_eq!(row["ai_processing_status"], "processing");
    }

    #[tokio::test]
    async fn mark_processing_failure_is_swallowed() {
        let store = MemoryStore::new().with_table(SUBMISSIONS);
        assert!(!mark_processing(&store, "missing").await);
    }

    #[test]
    fn results_document_summarises_row() {
        let row = record(json!({
            "id": "s1",
            "ai_generated_content": {"headline": "H"},
            "seo_title": "Title",
            "meta_description": "",
            "h2_tags": ["a", "b"],
            "product_name": "Opdivo Plus"
        }));
        let doc = results_document("s1", "TEST-FINAL-1", &row);
        assert_eq!(doc["ai_content_generated"], true);
        assert_eq!(doc["seo_fields_populated"], true);
        assert_eq!(doc["seo_data"], json!({"seo_title": "Title", "h2_tags": ["a", "b"]}));
        assert_eq!(doc["full_submission"]["product_name"], "Opdivo Plus");
    }

    #[test]
    fn results_document_without_output() {
        let row = record(json!({"id": "s1", "ai_generated_content": null}));
        let doc = results_document("s1", "TEST-FINAL-1", &row);
        assert_eq!(doc["ai_content_generated"], false);
        assert_eq!(doc["seo_fields_populated"], false);
        assert_eq!(doc["seo_data"], json!({}));
    }

    #[tokio::test]
    async fn latest_test_submission_picks_newest_test_row() {
        let store = MemoryStore::new().with_rows(
            SUBMISSIONS,
            vec![
                record(json!({"id": "a", "compliance_id": "TEST-PHARMA-1", "created_at": "2026-01-01"})),
                record(json!({"id": "b", "compliance_id": "PROD-7", "created_at": "2026-03-01"})),
                record(json!({"id": "c", "compliance_id": "TEST-FINAL-2", "created_at": "2026-02-01"})),
            ],
        );
        let row = latest_test_submission(&store).await.unwrap().unwrap();
        assert_eq!(row["id"], "c");
    }

    #[tokio::test]
    async fn seo_without_test_rows_fails() {
        let store = MemoryStore::new()
            .with_rows(SUBMISSIONS, vec![record(json!({"id": "b", "compliance_id": "PROD-7"}))])
            .with_function(SEO_PROCEDURE, Value::Null);
        assert!(seo(&store, None, Duration::ZERO).await.is_err());
    }

    #[tokio::test]
    async fn seo_reports_generated_title() {
        let store = MemoryStore::new()
            .with_rows(
                SUBMISSIONS,
                vec![record(json!({
                    "id": "s1",
                    "compliance_id": "TEST-FINAL-1",
                    "created_at": "2026-01-01",
                    "seo_title": "Opdivo Plus for mesothelioma"
                }))],
            )
            .with_function(SEO_PROCEDURE, Value::Null);
        let report = seo(&store, None, Duration::ZERO).await.unwrap().unwrap();
        assert_eq!(
            report,
            SeoReport {
                submission_id: "s1".into(),
                seo_generated: true
            }
        );
    }

    #[tokio::test]
    async fn seo_procedure_missing_is_an_error() {
        let store = MemoryStore::new()
            .with_rows(SUBMISSIONS, vec![record(json!({"id": "s1"}))]);
        assert!(seo(&store, Some("s1"), Duration::ZERO).await.is_err());
    }
}
