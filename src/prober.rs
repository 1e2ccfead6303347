//! Remote readiness prober.
//!
//! Two strictly ordered checks against one gateway endpoint:
//!
//! 1. **Health** — `GET /health`, passes only on status 200.
//! 2. **Completion** — `POST /v1/chat/completions`, passes only when the response
//!    body carries a top-level `choices` field.
//!
//! The sequence is a two-state machine, `HealthPending → CompletionPending → Done`,
//! with a short-circuit edge to `Done(failed)` when health fails. No retries: a
//! single failed attempt is the final answer, and any re-run policy belongs to the
//! surrounding orchestration.
//!
//! Network-layer failures never escape [`Prober::run`]; they collapse into the
//! boolean [`Outcome`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use crate::error::{ProbeError, ProbeResult};
use crate::target::Target;
use crate::transport::{ProbeResponse, ProbeTransport};

/// Reason string reported when the health check fails.
pub const HEALTH_FAILED_REASON: &str = "health check failed";

/// Upper bound on response-body text carried into diagnostics.
const BODY_DIAG_LIMIT: usize = 200;

/// Tunable knobs for one prober instance.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Model identifier named in the completion request.
    pub model: String,
    /// User-role message sent to the completion endpoint.
    pub prompt: String,
    /// Output size bound keeping the probe cheap.
    pub max_tokens: u32,
    pub health_timeout: Duration,
    pub completion_timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            prompt: "Say hello in one short sentence.".to_string(),
            max_tokens: 16,
            health_timeout: Duration::from_secs(10),
            completion_timeout: Duration::from_secs(30),
        }
    }
}

/// Aggregate result of one probe run. The only unit handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub health_ok: bool,
    pub completion_ok: bool,
    pub failure_reason: Option<String>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.health_ok && self.completion_ok
    }
}

/// States of one probe run. No state is revisited; `Done` is terminal.
enum ProbeState {
    HealthPending,
    CompletionPending,
    Done(Outcome),
}

/// Probes one endpoint for reachability and function.
///
/// Generic over [`ProbeTransport`] so tests can substitute a mock and observe
/// the exact requests issued.
pub struct Prober<T: ProbeTransport> {
    transport: Arc<T>,
    settings: ProbeSettings,
}

impl<T: ProbeTransport> Prober<T> {
    pub fn new(transport: Arc<T>, settings: ProbeSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// GETs `/health` with a bounded timeout.
    ///
    /// Transport failure degrades uniformly to a status-0 response rather than an
    /// error: the caller only needs pass/fail, not the failure cause.
    pub async fn check_health(&self, target: &Target) -> ProbeResponse {
        let url = target.url("/health");

        match self
            .transport
            .get(&url, self.settings.health_timeout)
            .await
        {
            Ok(response) => {
                tracing::debug!(status = response.status, "health probe completed");
                response
            }
            Err(e) => {
                tracing::debug!(cause = %e, "health probe transport failure");
                ProbeResponse {
                    status: 0,
                    body: e.to_string(),
                }
            }
        }
    }

    /// POSTs a minimal chat completion request with a bounded timeout.
    ///
    /// Same transport-failure-degrades-to-status-0 policy as the health check.
    pub async fn check_completion(&self, target: &Target, prompt: &str) -> ProbeResponse {
        let url = target.url("/v1/chat/completions");
        let body = completion_request(&self.settings.model, prompt, self.settings.max_tokens);

        match self
            .transport
            .post_json(&url, body, self.settings.completion_timeout)
            .await
        {
            Ok(response) => {
                tracing::debug!(status = response.status, "completion probe completed");
                response
            }
            Err(e) => {
                tracing::debug!(cause = %e, "completion probe transport failure");
                ProbeResponse {
                    status: 0,
                    body: e.to_string(),
                }
            }
        }
    }

    /// Runs the full check sequence and returns the aggregate [`Outcome`].
    ///
    /// Health failure short-circuits: the completion check is never attempted and
    /// `failure_reason` is exactly [`HEALTH_FAILED_REASON`]. This function never
    /// returns an error; validation happens at [`Target`] construction.
    pub async fn run(&self, target: &Target) -> Outcome {
        let mut state = ProbeState::HealthPending;

        loop {
            state = match state {
                ProbeState::HealthPending => {
                    let response = self.check_health(target).await;
                    match evaluate_health(&response) {
                        Ok(()) => ProbeState::CompletionPending,
                        Err(e) => {
                            tracing::warn!(
                                endpoint = %target,
                                cause = %e,
                                "health check failed"
                            );
                            ProbeState::Done(Outcome {
                                health_ok: false,
                                completion_ok: false,
                                failure_reason: Some(HEALTH_FAILED_REASON.to_string()),
                            })
                        }
                    }
                }
                ProbeState::CompletionPending => {
                    let response = self.check_completion(target, &self.settings.prompt).await;
                    match evaluate_completion(&response) {
                        Ok(()) => ProbeState::Done(Outcome {
                            health_ok: true,
                            completion_ok: true,
                            failure_reason: None,
                        }),
                        Err(e) => {
                            tracing::warn!(
                                endpoint = %target,
                                cause = %e,
                                "completion check failed"
                            );
                            ProbeState::Done(Outcome {
                                health_ok: true,
                                completion_ok: false,
                                failure_reason: Some(completion_failure_reason(&e, &response)),
                            })
                        }
                    }
                }
                ProbeState::Done(outcome) => return outcome,
            };
        }
    }
}

/// Builds the exact JSON body POSTed to the completion endpoint.
pub fn completion_request(model: &str, prompt: &str, max_tokens: u32) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "max_tokens": max_tokens,
    })
}

/// Health passes only on exactly 200. Status 0 is transport failure.
fn evaluate_health(response: &ProbeResponse) -> ProbeResult<()> {
    match response.status {
        200 => Ok(()),
        0 => Err(ProbeError::Transport(response.body.clone())),
        status => Err(ProbeError::UnexpectedStatus(status)),
    }
}

/// Weak schema presence check on the completion response.
///
/// Deliberately loose: only the presence of a top-level `choices` field is
/// required, mirroring the contract real gateways are observed to keep. Tightening
/// this to full schema validation would falsely fail on vendor-specific response
/// variations.
fn has_completion_choices(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .map(|v| v.get("choices").is_some())
        .unwrap_or(false)
}

fn evaluate_completion(response: &ProbeResponse) -> ProbeResult<()> {
    if response.status == 0 {
        return Err(ProbeError::Transport(response.body.clone()));
    }
    if has_completion_choices(&response.body) {
        Ok(())
    } else {
        Err(ProbeError::MalformedResponse)
    }
}

/// Failure reason carrying only the status code and a truncated body.
fn completion_failure_reason(error: &ProbeError, response: &ProbeResponse) -> String {
    format!(
        "completion check failed ({}; status {}): {}",
        error,
        response.status,
        truncate_body(&response.body, BODY_DIAG_LIMIT)
    )
}

/// Truncates diagnostic body text on a char boundary.
fn truncate_body(body: &str, limit: usize) -> String {
    if body.chars().count() <= limit {
        body.to_string()
    } else {
        let truncated: String = body.chars().take(limit).collect();
        format!("{truncated}…")
    }
}
