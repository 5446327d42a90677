//! Console rendering for submission rows and log tables.
//!
//! Everything here prints to stdout; diagnostics go through `tracing` to stderr.

use serde_json::Value;
use subprobe_core::FieldCategory;
use subprobe_core::{
    AuditLog, Record, WebhookExecution, field_populated, group_fields, render_value,
};

pub const OK: &str = "✅";
pub const FAIL: &str = "❌";
pub const PENDING: &str = "⏳";
pub const WARN: &str = "⚠️ ";

const RULE_WIDTH: usize = 50;

// ── Headers ──

pub fn banner(title: &str) {
    println!("=== {title} ===");
    println!();
}

pub fn rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

// ── Field buckets ──

/// Print every field of `record` under its AI / SEO / other heading.
pub fn print_field_groups(record: &Record) {
    let groups = group_fields(record);
    for (i, category) in [FieldCategory::Ai, FieldCategory::Seo, FieldCategory::Other]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            println!();
        }
        println!("{}:", category.label());
        for (name, value) in groups.get(category) {
            println!("  {name}: {}", render_value(value));
        }
    }
}

pub fn print_marker_scan(hits: &[String]) {
    println!("\n=== CHECKING FOR AI PROVIDER CONTENT ===");
    if hits.is_empty() {
        println!("No Perplexity or AI-generated content found in any fields.");
        return;
    }
    for field in hits {
        println!("Found potential AI content in {field}!");
    }
}

pub fn print_presence(presence: &[(&str, bool)]) {
    println!("\n=== ADDITIONAL SEO FIELD CHECK ===");
    for (field, present) in presence {
        if *present {
            println!("✓ {field}: HAS CONTENT");
        } else {
            println!("✗ {field}: EMPTY");
        }
    }
}

// ── Single values ──

/// `label: value`, with `None` when the field is absent or null.
pub fn kv(label: &str, record: &Record, field: &str) {
    println!("{label}: {}", plain(record.get(field)));
}

/// `field: YES|NO` depending on whether it is populated.
pub fn yes_no(record: &Record, field: &str) {
    let flag = if field_populated(record, field) { "YES" } else { "NO" };
    println!("{field}: {flag}");
}

/// Untruncated rendering; strings without quotes, null as `None`.
pub fn plain(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Short preview of a populated value for summary lines.
pub fn preview(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let head: Vec<String> = items.iter().take(3).map(|v| plain(Some(v))).collect();
            format!("{}...", head.join(", "))
        }
        other => format!("{}...", head(&plain(Some(other)), 100)),
    }
}

// ── AI output ──

/// Generated-content preview lines shown once AI processing has produced output.
pub fn print_generated_preview(record: &Record) {
    println!("\nGenerated content preview:");
    println!("- SEO Title: {}", plain(record.get("seo_title")));
    match record.get("meta_description").and_then(Value::as_str) {
        Some(desc) if !desc.is_empty() => {
            println!("- Meta Description: {}...", head(desc, 100))
        }
        _ => println!("- Meta Description: Not generated"),
    }
    println!("- Primary Keywords: {}", plain(record.get("primary_keywords")));
    println!("- H1 Tag: {}", plain(record.get("h1_tag")));
    println!("- H2 Tags: {}", plain(record.get("h2_tags")));
    println!("- GEO Event Tags: {}", plain(record.get("geo_event_tags")));
}

/// Shape of `ai_generated_content`: structured JSON or free text.
#[derive(Debug, PartialEq)]
pub enum ContentShape {
    Json(serde_json::Map<String, Value>),
    Text(String),
}

/// Objects, and strings holding a JSON object, are `Json`; anything else is text.
pub fn content_shape(value: &Value) -> ContentShape {
    match value {
        Value::Object(map) => ContentShape::Json(map.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => ContentShape::Json(map),
            _ => ContentShape::Text(s.clone()),
        },
        other => ContentShape::Text(other.to_string()),
    }
}

pub fn print_content_details(value: &Value) {
    match content_shape(value) {
        ContentShape::Json(map) => {
            println!("Content is JSON format:");
            for (key, v) in &map {
                println!("  {key}: {}...", head(&plain(Some(v)), 100));
            }
        }
        ContentShape::Text(text) => {
            println!("Content is text format ({} characters)", text.chars().count());
            println!("Preview: {}...", head(&text, 500));
        }
    }
}

// ── Log tables ──

pub fn print_webhook_execution(log: &WebhookExecution) {
    println!("\n- Submission ID: {}", opt(&log.submission_id));
    println!("  Status: {}", opt(&log.status));
    println!("  Created: {}", opt(&log.created_at));
    match &log.response_data {
        Some(v) if !v.is_null() => println!("  Response: {}", render_value(v)),
        _ => println!("  Response: No response data"),
    }
    println!(
        "  Error: {}",
        log.error_message.as_deref().unwrap_or("No error")
    );
}

pub fn print_audit_log(log: &AuditLog) {
    println!("\n- Action: {}", opt(&log.action));
    println!("  Entity: {} - {}", opt(&log.entity_type), opt(&log.entity_id));
    println!("  User: {}", opt(&log.user_email));
    println!("  Created: {}", opt(&log.created_at));
}

/// First `n` characters, no marker.
fn head(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}
