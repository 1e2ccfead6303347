//! # Gateway Probe
//!
//! A readiness prober for LLM gateway endpoints reachable over a private overlay
//! network (a tailnet or similar). Performs two strictly ordered checks against
//! one HTTPS endpoint:
//!
//! 1. **Health** — `GET /health` must return 200.
//! 2. **Completion** — `POST /v1/chat/completions` must return a body carrying a
//!    top-level `choices` field.
//!
//! and reports a single pass/fail [`prober::Outcome`]. Establishing the overlay
//! network, egress auditing, and secret storage are external collaborators: the
//! prober receives an already-resolved host and port and performs no ambient
//! environment lookup of its own.
//!
//! ## Layers
//!
//! - [`target`] - the endpoint entity and its redaction rules
//! - [`transport`] - the HTTP seam ([`transport::ProbeTransport`]) and its
//!   `reqwest` implementation
//! - [`prober`] - the two-state check sequence
//! - [`report`] - per-check lines and the machine `key=value` summary
//! - [`config`] - environment configuration merged with CLI overrides
//!
//! ## Quick Start
//!
//! ```bash
//! export PROBE_HOST="gateway.example.ts.net"
//! export PROBE_PORT="8443"
//!
//! cargo run -- --prompt "Say hello in one short sentence."
//! ```
//!
//! Exit codes: 0 on full success, 2 when the health check fails, 3 when the
//! completion check fails, 1 on configuration or usage errors.

pub mod config;
pub mod error;
pub mod prober;
pub mod report;
pub mod target;
pub mod transport;

pub use error::ProbeError;
pub use prober::{Outcome, Prober};

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::ProbeError;
    pub use crate::prober::{Outcome, ProbeSettings, Prober};
    pub use crate::target::Target;
    pub use crate::transport::{HttpTransport, ProbeResponse, ProbeTransport};
}
