//! Error taxonomy for the prober.
//!
//! Only [`ProbeError::Config`] is fatal before any I/O. Network-layer failures are
//! absorbed into the boolean [`Outcome`](crate::prober::Outcome) rather than
//! propagated, since the purpose of the probe is to report reachability, not to
//! distinguish causes for the caller.

use thiserror::Error;

/// Errors produced while constructing or running a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// DNS, TLS, connect, or timeout failure. Collapsed into a status-0
    /// [`ProbeResponse`](crate::transport::ProbeResponse) inside the prober;
    /// never escapes `run`.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Health endpoint replied with something other than 200.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// Completion response body did not carry the expected `choices` field.
    #[error("malformed completion response")]
    MalformedResponse,

    /// Missing or invalid host, port, or bounds. Fails the run before any
    /// network call is made.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for prober operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
