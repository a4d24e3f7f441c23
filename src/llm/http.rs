//! Minimal HTTP layer for provider calls.
//!
//! Turns transport and status failures into a small signal vocabulary that
//! the client classifies exactly once. Two POST variants: one with a hard
//! wall-clock deadline, one unbounded for calls whose deadline is owned by
//! the caller.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Low-level HTTP failure signals.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The wall-clock deadline elapsed before the provider answered.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// DNS, connect, TLS or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// A client with no built-in timeout; deadlines are applied per call.
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// POST a JSON body and parse the JSON response. Unbounded: the caller
    /// owns the deadline.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<serde_json::Value, HttpError> {
        let mut request = self.inner.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            return Err(HttpError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        response
            .json()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))
    }

    /// POST with a hard wall-clock deadline.
    ///
    /// The deadline is a per-call future: hitting it aborts the in-flight
    /// request, and leaving on any path (success, status error, elapsed)
    /// drops the timer. Nothing survives the call.
    pub async fn post_json_timeout(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &impl Serialize,
        timeout: Duration,
    ) -> Result<serde_json::Value, HttpError> {
        match tokio::time::timeout(timeout, self.post_json(url, headers, body)).await {
            Ok(result) => result,
            Err(_) => Err(HttpError::Timeout(timeout)),
        }
    }
}
