//! REST gateway client for the hosted database.
//!
//! Tables live under `{endpoint}/rest/v1/{table}` and procedures under
//! `{endpoint}/rest/v1/rpc/{function}`. Every request carries the API key both
//! as `apikey` and as a bearer token.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_RANGE, HeaderMap, HeaderValue};
use serde_json::Value;
use subprobe_core::{Credentials, Record};
use tracing::info;

use crate::{Query, Store, StoreError};

const REST_PATH: &str = "rest/v1";

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

impl RestStore {
    /// Create a client for the given gateway endpoint.
    ///
    /// `endpoint` should be like `https://xyz.supabase.co` (a trailing slash is ignored).
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: credentials.endpoint.trim_end_matches('/').to_string(),
            key: credentials.key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PATH}/{table}", self.base_url)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/{REST_PATH}/rpc/{function}", self.base_url)
    }

    fn auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let resp = self.auth(builder).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(resp)
    }

    async fn rows(resp: reqwest::Response) -> Result<Vec<Record>, StoreError> {
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(&query.table);
        info!(url = %url, filters = query.filters.len(), "selecting rows");
        let resp = self
            .send(self.client.get(&url).query(&query.to_params()))
            .await?;
        let rows = Self::rows(resp).await?;
        info!(count = rows.len(), "selected rows");
        Ok(rows)
    }

    async fn insert(&self, table: &str, record: &Record) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table);
        info!(url = %url, "inserting row");
        let resp = self
            .send(
                self.client
                    .post(&url)
                    .header("Prefer", "return=representation")
                    .json(record),
            )
            .await?;
        Self::rows(resp).await
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        patch: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table);
        info!(url = %url, id, "updating row");
        let resp = self
            .send(
                self.client
                    .patch(&url)
                    .query(&[("id", format!("eq.{id}"))])
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?;
        Self::rows(resp).await
    }

    async fn rpc(&self, function: &str, args: &Value) -> Result<Value, StoreError> {
        let url = self.rpc_url(function);
        info!(url = %url, "calling procedure");
        let resp = self.send(self.client.post(&url).json(args)).await?;
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn count(&self, table: &str) -> Result<u64, StoreError> {
        let url = self.table_url(table);
        info!(url = %url, "counting rows");
        let resp = self
            .send(
                self.client
                    .head(&url)
                    .query(&[("select", "*")])
                    .header("Prefer", "count=exact"),
            )
            .await?;
        parse_content_range(resp.headers()).ok_or_else(|| {
            StoreError::Other(format!("no row count in Content-Range for {table}"))
        })
    }
}

/// Error for a non-2xx answer. Bodiless answers (HEAD, bare 404s) fall back to
/// the status reason so the message is never empty.
fn api_error(status: StatusCode, body: &str) -> StoreError {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string())
    } else {
        error_message(body)
    };
    StoreError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Pull the human-readable message out of a gateway error body.
///
/// Error bodies look like `{"code": "...", "message": "...", "details": ..., "hint": ...}`;
/// anything else is returned as-is.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Total from a `Content-Range: 0-9/123` or `*/0` header.
fn parse_content_range(headers: &HeaderMap<HeaderValue>) -> Option<u64> {
    let range = headers.get(CONTENT_RANGE)?.to_str().ok()?;
    let (_, total) = range.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn store(endpoint: &str) -> RestStore {
        RestStore::new(&Credentials {
            endpoint: endpoint.into(),
            key: "anon".into(),
        })
    }

    #[test]
    fn rest_store_trims_trailing_slash() {
        let s = store("https://db.example.co/");
        assert_eq!(s.base_url, "https://db.example.co");
    }

    #[test]
    fn urls_for_tables_and_procedures() {
        let s = store("https://db.example.co");
        assert_eq!(
            s.table_url("submissions"),
            "https://db.example.co/rest/v1/submissions"
        );
        assert_eq!(
            s.rpc_url("run_seo_automation"),
            "https://db.example.co/rest/v1/rpc/run_seo_automation"
        );
    }

    #[test]
    fn error_message_from_gateway_json() {
        let body = r#"{"code":"PGRST202","details":null,"hint":null,"message":"Could not find the function public.nope without parameters in the schema cache"}"#;
        assert_eq!(
            error_message(body),
            "Could not find the function public.nope without parameters in the schema cache"
        );
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
    }

    #[test]
    fn empty_error_body_uses_status_reason() {
        let err = api_error(StatusCode::NOT_FOUND, "");
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.to_string(), "server returned 404: Not Found");

        let err = api_error(StatusCode::BAD_REQUEST, r#"{"message":"bad filter"}"#);
        assert_eq!(err.message(), "bad filter");
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            // Drain until the client hangs up.
            let _ = tokio::io::copy(&mut socket, &mut tokio::io::sink()).await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn count_of_missing_table_names_the_status() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let err = store(&base).count("automation_logs").await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 404, .. }));
        assert_eq!(err.message(), "Not Found");
    }

    #[tokio::test]
    async fn count_reads_content_range() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-range: */42\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        assert_eq!(store(&base).count("submissions").await.unwrap(), 42);
    }

    #[test]
    fn content_range_total() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_RANGE, HeaderValue::from_static("0-9/123"));
        assert_eq!(parse_content_range(&headers), Some(123));

        headers.insert(CONTENT_RANGE, HeaderValue::from_static("*/0"));
        assert_eq!(parse_content_range(&headers), Some(0));

        headers.insert(CONTENT_RANGE, HeaderValue::from_static("0-9/*"));
        assert_eq!(parse_content_range(&headers), None);

        assert_eq!(parse_content_range(&HeaderMap::new()), None);
    }
}
