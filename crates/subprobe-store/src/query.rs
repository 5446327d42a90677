//! Row selection: table, columns, filters, ordering, limit.
//!
//! A [`Query`] is rendered to REST gateway query parameters by
//! [`Query::to_params`] and evaluated directly by the in-memory store.

use serde_json::Value;
use subprobe_core::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    /// SQL `LIKE` with `%` as the wildcard.
    Like,
}

impl FilterOp {
    fn keyword(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Like => "like",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    /// Evaluate the filter against a row.
    ///
    /// Null or missing columns never match, for `neq` as well, like SQL comparisons.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(&self.column).and_then(scalar_text) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => actual == self.value,
            FilterOp::Neq => actual != self.value,
            FilterOp::Like => like_match(&self.value, &actual),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// Select all columns from `table`.
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the returned columns, e.g. `"id, compliance_id"`.
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(self, column: &str, value: &str) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn neq(self, column: &str, value: &str) -> Self {
        self.filter(column, FilterOp::Neq, value)
    }

    pub fn like(self, column: &str, pattern: &str) -> Self {
        self.filter(column, FilterOp::Like, pattern)
    }

    fn filter(mut self, column: &str, op: FilterOp, value: &str) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: false,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Column names requested, or `None` for `*`.
    pub fn column_list(&self) -> Option<Vec<&str>> {
        if self.columns.trim() == "*" {
            return None;
        }
        Some(
            self.columns
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    /// Render as REST gateway query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let columns = match self.column_list() {
            Some(cols) => cols.join(","),
            None => "*".to_string(),
        };
        let mut params = vec![("select".to_string(), columns)];
        for f in &self.filters {
            let value = match f.op {
                FilterOp::Like => f.value.replace('%', "*"),
                _ => f.value.clone(),
            };
            params.push((f.column.clone(), format!("{}.{}", f.op.keyword(), value)));
        }
        if let Some(order) = &self.order {
            let dir = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{dir}", order.column)));
        }
        if let Some(n) = self.limit {
            params.push(("limit".to_string(), n.to_string()));
        }
        params
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `%` matches any run of characters; everything else matches literally.
fn like_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return pattern == text;
    }
    let (first, rest) = (parts[0], &parts[1..]);
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return true,
    };
    for part in middle {
        match remaining.find(part) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}
