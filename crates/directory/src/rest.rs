//! REST implementation of [`DirectoryProvider`].
//!
//! `RestDirectoryClient` wraps a `reqwest::Client` and translates every
//! trait method into the corresponding HTTP call against the hosted
//! directory API, with automatic retry + exponential back-off on transient
//! (5xx / timeout) failures.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rv_domain::config::DirectoryConfig;
use rv_domain::error::{Error, Result};
use rv_domain::trace::TraceEvent;
use uuid::Uuid;

use crate::provider::DirectoryProvider;
use crate::types::{CreateUserRequest, DirectoryUser};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST-based client for the hosted directory.
///
/// Created once and reused for the lifetime of the process. The underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestDirectoryClient {
    http: Client,
    base_url: String,
    secret_key: String,
    max_retries: u32,
}

impl RestDirectoryClient {
    /// Build a new client from the shared [`DirectoryConfig`].
    ///
    /// The secret key is read from the environment variable named by
    /// `secret_key_env`; construction fails fast when it is unset so a
    /// misconfigured deployment cannot silently run unauthenticated.
    pub fn new(cfg: &DirectoryConfig) -> Result<Self> {
        let secret_key = std::env::var(&cfg.secret_key_env).map_err(|_| {
            Error::Config(format!(
                "directory secret key env {} is not set",
                cfg.secret_key_env
            ))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            secret_key,
            max_retries: cfg.max_retries,
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with auth and trace headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("Authorization", format!("Bearer {}", self.secret_key))
            .header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    /// Build the full URL for a path like `/v1/users`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── retry engine ─────────────────────────────────────────────────

    /// Execute a request with retry + exponential back-off on transient
    /// errors.
    ///
    /// * Retries on 5xx status codes and on timeouts.
    /// * Does **not** retry on 4xx. 401/403 map to [`Error::Auth`]; 404 is
    ///   returned as a normal response so callers can turn it into a miss.
    /// * Emits a `TraceEvent::DirectoryCall` after every attempt.
    async fn execute_with_retry(
        &self,
        endpoint: &str,
        build_request: impl Fn() -> RequestBuilder,
    ) -> Result<Response> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            let start = Instant::now();
            let rb = self.decorate(build_request());
            let result = rb.send().await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    TraceEvent::DirectoryCall {
                        endpoint: endpoint.to_owned(),
                        status,
                        duration_ms,
                    }
                    .emit();

                    if resp.status().is_server_error() {
                        // 5xx — transient, retry
                        let body = resp.text().await.unwrap_or_default();
                        last_err = Some(Error::Directory(format!(
                            "{endpoint} returned {status}: {body}"
                        )));
                        continue;
                    }

                    if resp.status().is_client_error() && resp.status() != StatusCode::NOT_FOUND {
                        // 4xx — permanent, do NOT retry
                        let resp_status = resp.status();
                        let body = resp.text().await.unwrap_or_default();
                        if resp_status == StatusCode::UNAUTHORIZED
                            || resp_status == StatusCode::FORBIDDEN
                        {
                            return Err(Error::Auth(format!(
                                "{endpoint} auth failed ({status}): {body}"
                            )));
                        }
                        return Err(Error::Directory(format!(
                            "{endpoint} returned {status}: {body}"
                        )));
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    let status = e.status().map(|s| s.as_u16()).unwrap_or(0);

                    TraceEvent::DirectoryCall {
                        endpoint: endpoint.to_owned(),
                        status,
                        duration_ms,
                    }
                    .emit();

                    last_err = Some(from_reqwest(e));
                    // Timeouts and connection errors are transient — retry
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| Error::Directory(format!("{endpoint}: all retries exhausted"))))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl DirectoryProvider for RestDirectoryClient {
    async fn fetch_user(&self, id: &str) -> Result<Option<DirectoryUser>> {
        let url = self.url(&format!("/v1/users/{id}"));
        let resp = self
            .execute_with_retry("GET /v1/users/{id}", || self.http.get(&url))
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = resp.text().await.map_err(from_reqwest)?;
        let user = serde_json::from_str(&body).map_err(|e| {
            Error::Directory(format!("failed to parse user response: {e}: {body}"))
        })?;
        Ok(Some(user))
    }

    async fn list_users_by_email(&self, email: &str, limit: u32) -> Result<Vec<DirectoryUser>> {
        let url = self.url("/v1/users");
        let email = email.to_owned();
        let resp = self
            .execute_with_retry("GET /v1/users", || {
                self.http.get(&url).query(&[
                    ("email_address", email.clone()),
                    ("limit", limit.to_string()),
                ])
            })
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Directory(format!("failed to parse user list response: {e}: {body}"))
        })
    }

    async fn create_user(&self, req: CreateUserRequest) -> Result<DirectoryUser> {
        let url = self.url("/v1/users");
        let resp = self
            .execute_with_retry("POST /v1/users", || self.http.post(&url).json(&req))
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::Directory("POST /v1/users returned 404".into()));
        }

        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Directory(format!("failed to parse created user response: {e}: {body}"))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
