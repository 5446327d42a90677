use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{operation} on {table} returned {rows} rows, expected 1")]
    UnexpectedRowCount {
        operation: &'static str,
        table: String,
        rows: usize,
    },

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Server-side message for API errors, the display text otherwise.
    pub fn message(&self) -> String {
        match self {
            StoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
