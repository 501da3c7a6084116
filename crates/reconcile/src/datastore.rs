//! Ownership-row access to the relational system of record.
//!
//! The hosted datastore exposes a PostgREST dialect, so the production
//! client speaks HTTP rather than SQL: counts come from the
//! `Content-Range` header under `Prefer: count=exact`, and bulk updates are
//! `PATCH` requests filtered on the ownership column.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rv_domain::config::DatastoreConfig;
use rv_domain::error::{Error, Result};
use rv_domain::trace::TraceEvent;
use uuid::Uuid;

/// Tables carrying a rewritable ownership column.
pub const OWNERSHIP_TABLES: [&str; 2] = ["applications", "user_subscriptions"];

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Row-count and bulk-reassignment operations on ownership tables.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Number of rows in `table` owned by `user_id`.
    async fn count_rows(&self, table: &str, user_id: &str) -> Result<u64>;

    /// Rewrite the ownership column from `old_id` to `new_id`; returns the
    /// number of rows updated. Re-applying the same rewrite is harmless.
    async fn reassign(&self, table: &str, old_id: &str, new_id: &str) -> Result<u64>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REST client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// REST client for the datastore.
///
/// The underlying HTTP client enforces a fixed request timeout (30 seconds
/// by default). No retry — reconciliation is administrative; operators
/// re-run on failure.
#[derive(Debug, Clone)]
pub struct RestOwnershipStore {
    http: Client,
    base_url: String,
    service_key: String,
    owner_column: String,
}

impl RestOwnershipStore {
    /// Build a client from the shared [`DatastoreConfig`]. The service key
    /// is read from the environment variable named in config.
    pub fn new(cfg: &DatastoreConfig) -> Result<Self> {
        let service_key = std::env::var(&cfg.service_key_env).map_err(|_| {
            Error::Config(format!(
                "datastore service key env {} is not set",
                cfg.service_key_env
            ))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            service_key,
            owner_column: cfg.owner_column.clone(),
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();
                TraceEvent::DatastoreCall {
                    endpoint: endpoint.to_owned(),
                    status,
                    duration_ms,
                }
                .emit();

                if !resp.status().is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(Error::Datastore(format!(
                        "{endpoint} returned {status}: {body}"
                    )));
                }
                Ok(resp)
            }
            Err(e) => {
                TraceEvent::DatastoreCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();

                if e.is_timeout() {
                    Err(Error::Timeout(e.to_string()))
                } else {
                    Err(Error::Http(e.to_string()))
                }
            }
        }
    }
}

#[async_trait]
impl OwnershipStore for RestOwnershipStore {
    async fn count_rows(&self, table: &str, user_id: &str) -> Result<u64> {
        let url = self.url(table);
        let endpoint = format!("GET /rest/v1/{table}");
        let resp = self
            .execute(
                &endpoint,
                self.http
                    .get(&url)
                    .query(&[
                        (self.owner_column.clone(), format!("eq.{user_id}")),
                        ("select".to_owned(), self.owner_column.clone()),
                    ])
                    .header("Prefer", "count=exact")
                    .header("Range-Unit", "items")
                    .header("Range", "0-0"),
            )
            .await?;

        let header = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok());
        parse_content_range(header).ok_or_else(|| {
            Error::Datastore(format!(
                "{endpoint}: missing or malformed content-range header"
            ))
        })
    }

    async fn reassign(&self, table: &str, old_id: &str, new_id: &str) -> Result<u64> {
        let url = self.url(table);
        let endpoint = format!("PATCH /rest/v1/{table}");

        let mut body = serde_json::Map::new();
        body.insert(
            self.owner_column.clone(),
            serde_json::Value::String(new_id.to_owned()),
        );

        let resp = self
            .execute(
                &endpoint,
                self.http
                    .patch(&url)
                    .query(&[(self.owner_column.clone(), format!("eq.{old_id}"))])
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;

        let text = resp
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| Error::Datastore(format!("{endpoint}: unparseable response: {e}")))?;
        Ok(rows.len() as u64)
    }
}

/// Parse the total from a `Content-Range` header (`0-0/42` or `*/0`).
fn parse_content_range(header: Option<&str>) -> Option<u64> {
    header?.rsplit('/').next()?.trim().parse().ok()
}
