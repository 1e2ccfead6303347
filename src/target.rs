//! Endpoint target entity.
//!
//! A [`Target`] is constructed once per run and never mutated. The scheme is fixed
//! to HTTPS: the gateway is only ever reached over a private overlay network where
//! plaintext is not part of the contract.

use std::fmt;

use crate::error::{ProbeError, ProbeResult};

/// Placeholder rendered wherever a sensitive host would otherwise appear.
pub const REDACTED: &str = "[redacted]";

/// One remote endpoint to probe.
///
/// `sensitive` marks the host as a secret-bearing value (overlay hostnames often
/// are). When set, [`Target`]'s `Display` impl and every diagnostic string produced
/// by the prober render [`REDACTED`] in place of the host.
#[derive(Debug, Clone)]
pub struct Target {
    host: String,
    port: u16,
    sensitive: bool,
}

impl Target {
    /// Builds a target, validating host and port before any I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] if the host is empty or the port is 0.
    pub fn new(host: impl Into<String>, port: u16, sensitive: bool) -> ProbeResult<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ProbeError::Config("host must not be empty".into()));
        }
        if port == 0 {
            return Err(ProbeError::Config("port must be between 1 and 65535".into()));
        }
        Ok(Self {
            host,
            port,
            sensitive,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Full URL for a path on this target. Not for logging: contains the raw host.
    pub fn url(&self, path: &str) -> String {
        format!("https://{}:{}{}", self.host, self.port, path)
    }

    /// Host as it may appear in logs and summaries.
    pub fn display_host(&self) -> &str {
        if self.sensitive { REDACTED } else { &self.host }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.display_host(), self.port)
    }
}
