//! Field categorisation and value previews for submission reports.
//!
//! Categorisation is display-only: it decides which section of a report a
//! field is printed under, based purely on the field name.

use serde_json::Value;

use crate::record::{Record, is_populated};

/// Strings longer than this are cut down for display.
pub const PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Marker printed for null values.
pub const NULL_MARKER: &str = "NULL";

// ── Name rules ──

const AI_PATTERNS: &[&str] = &["ai_"];
const AI_EXACT: &[&str] = &["seo_content"];
const SEO_PATTERNS: &[&str] = &["seo_", "meta_", "keyword", "_tag"];

/// Fields omitted from the "other" bucket.
pub const HIDDEN_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Marker substrings that suggest content came from an AI provider.
pub const PROVENANCE_MARKERS: &[&str] = &["perplexity", "ai-generated"];

/// SEO/content fields checked for presence after AI processing.
pub const SEO_CHECKLIST: &[&str] = &[
    "seo_content",
    "seo_title",
    "meta_title",
    "meta_description",
    "seo_keywords",
    "primary_keywords",
    "secondary_keywords",
    "h1_tag",
    "h2_tags",
    "geo_event_tags",
    "seo_strategy_outline",
    "competitive_analysis",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Ai,
    Seo,
    Other,
}

impl FieldCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ai => "AI RELATED FIELDS",
            Self::Seo => "SEO RELATED FIELDS",
            Self::Other => "OTHER FIELDS",
        }
    }
}

/// Assign a field to exactly one bucket by name. AI rules win over SEO rules.
pub fn categorize(name: &str) -> FieldCategory {
    if AI_EXACT.contains(&name) || AI_PATTERNS.iter().any(|p| name.contains(p)) {
        FieldCategory::Ai
    } else if SEO_PATTERNS.iter().any(|p| name.contains(p)) {
        FieldCategory::Seo
    } else {
        FieldCategory::Other
    }
}

/// A record's fields split into display buckets, each sorted by name.
#[derive(Debug, Default)]
pub struct FieldGroups<'a> {
    pub ai: Vec<(&'a str, &'a Value)>,
    pub seo: Vec<(&'a str, &'a Value)>,
    pub other: Vec<(&'a str, &'a Value)>,
}

impl<'a> FieldGroups<'a> {
    pub fn get(&self, category: FieldCategory) -> &[(&'a str, &'a Value)] {
        match category {
            FieldCategory::Ai => &self.ai,
            FieldCategory::Seo => &self.seo,
            FieldCategory::Other => &self.other,
        }
    }
}

/// Bucket every field of `record`.
///
/// The other bucket skips [`HIDDEN_FIELDS`] and nulls; AI and SEO buckets keep
/// nulls so that missing output is visible.
pub fn group_fields(record: &Record) -> FieldGroups<'_> {
    let mut groups = FieldGroups::default();
    for (name, value) in record {
        match categorize(name) {
            FieldCategory::Ai => groups.ai.push((name.as_str(), value)),
            FieldCategory::Seo => groups.seo.push((name.as_str(), value)),
            FieldCategory::Other => {
                if !value.is_null() && !HIDDEN_FIELDS.contains(&name.as_str()) {
                    groups.other.push((name.as_str(), value));
                }
            }
        }
    }
    groups.ai.sort_by(|a, b| a.0.cmp(b.0));
    groups.seo.sort_by(|a, b| a.0.cmp(b.0));
    groups.other.sort_by(|a, b| a.0.cmp(b.0));
    groups
}

/// Cut `s` to [`PREVIEW_CHARS`] characters plus an ellipsis when longer.
pub fn truncate(s: &str) -> String {
    truncate_to(s, PREVIEW_CHARS)
}

/// Cut `s` to `max` characters plus an ellipsis when longer.
pub fn truncate_to(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// Render a value for a report line. Strings are truncated, nulls use [`NULL_MARKER`].
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::String(s) => truncate(s),
        other => other.to_string(),
    }
}

/// Names of string fields whose value contains any marker, case-insensitively.
pub fn scan_markers(record: &Record, markers: &[&str]) -> Vec<String> {
    let markers: Vec<String> = markers.iter().map(|m| m.to_lowercase()).collect();
    let mut hits: Vec<String> = record
        .iter()
        .filter_map(|(name, value)| {
            let s = value.as_str()?;
            let lower = s.to_lowercase();
            markers
                .iter()
                .any(|m| lower.contains(m.as_str()))
                .then(|| name.clone())
        })
        .collect();
    hits.sort();
    hits
}

/// Presence of each named field, in the order given.
pub fn field_presence<'a>(record: &Record, names: &[&'a str]) -> Vec<(&'a str, bool)> {
    names
        .iter()
        .map(|&name| (name, record.get(name).is_some_and(is_populated)))
        .collect()
}
