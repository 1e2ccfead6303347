//! HTTP transport seam.
//!
//! The prober talks to the gateway through the [`ProbeTransport`] trait so tests
//! can substitute a mock and count calls. The production implementation is
//! [`HttpTransport`], a thin wrapper over a shared `reqwest` client.
//!
//! Transport errors are returned as [`ProbeError::Transport`] with a coarse cause
//! label only. The raw `reqwest` error text can embed the request URL, which may
//! carry a sensitive host, so it is never propagated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{ProbeError, ProbeResult};

/// One HTTP exchange as the prober sees it.
///
/// Status 0 is reserved by the prober for transport-level failure; a real server
/// can never produce it.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

/// Request-response transport used by the prober.
///
/// Implementations must be thread-safe. Each call is a single bounded exchange;
/// no retries happen at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Issues a GET with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] on DNS, TLS, connect, or timeout failure.
    async fn get(&self, url: &str, timeout: Duration) -> ProbeResult<ProbeResponse>;

    /// Issues a POST with a JSON body and the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] on DNS, TLS, connect, or timeout failure.
    async fn post_json(
        &self,
        url: &str,
        body: Value,
        timeout: Duration,
    ) -> ProbeResult<ProbeResponse>;
}

/// Production transport backed by `reqwest` with rustls TLS.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the underlying client.
    ///
    /// `insecure_tls` disables certificate verification. This mirrors the
    /// proof-of-concept behavior for gateways presenting self-signed certificates
    /// on a private overlay network; it is opt-in, never the default.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] if the TLS backend cannot be initialized.
    pub fn new(insecure_tls: bool) -> ProbeResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|_| ProbeError::Transport("failed to build HTTP client".into()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> ProbeResult<ProbeResponse> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(sanitize_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(sanitize_error)?;

        Ok(ProbeResponse { status, body })
    }

    async fn post_json(
        &self,
        url: &str,
        body: Value,
        timeout: Duration,
    ) -> ProbeResult<ProbeResponse> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(sanitize_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(sanitize_error)?;

        Ok(ProbeResponse { status, body })
    }
}

/// Maps a `reqwest` error to a cause label that cannot leak the request URL.
fn sanitize_error(e: reqwest::Error) -> ProbeError {
    let cause = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else if e.is_body() || e.is_decode() {
        "body"
    } else {
        "other"
    };
    ProbeError::Transport(cause.into())
}
