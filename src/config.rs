//! Probe configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any network call.
//! CLI flags override environment values; the prober itself never reads the
//! environment — everything is threaded in explicitly at construction time.
//! Numeric variables that are set but malformed fail the run immediately rather
//! than falling back to their defaults.
//!
//! ## Variables
//!
//! - `PROBE_HOST` (required unless passed on the CLI) - gateway hostname on the
//!   private overlay network
//! - `PROBE_PORT` - gateway port (default: `8443`)
//! - `PROBE_MODEL` - model named in the completion request (default: `gpt-4`)
//! - `PROBE_PROMPT` - completion prompt (default: `Say hello in one short sentence.`)
//! - `PROBE_MAX_TOKENS` - completion output bound (default: `16`)
//! - `PROBE_HEALTH_TIMEOUT` - health check timeout in seconds (default: `10`)
//! - `PROBE_COMPLETION_TIMEOUT` - completion check timeout in seconds (default: `30`)
//! - `PROBE_INSECURE_TLS` - accept invalid TLS certificates (default: `false`)
//! - `PROBE_SENSITIVE_HOST` - treat the host as a secret and redact it from all
//!   output (default: `false`)
//! - `RUST_LOG` - log level (default: `info`)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

use crate::prober::ProbeSettings;
use crate::target::{REDACTED, Target};

/// Prober configuration merged from environment variables and CLI overrides.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    /// Health check timeout in seconds.
    pub health_timeout: u64,
    /// Completion check timeout in seconds.
    pub completion_timeout: u64,
    /// Accept invalid TLS certificates. Off by default; only for gateways
    /// presenting self-signed certificates inside the overlay network.
    pub insecure_tls: bool,
    /// Redact the host from every log line, summary, and diagnostic.
    pub sensitive_host: bool,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Missing values fall back to defaults; an absent `PROBE_HOST` is caught by
    /// [`Config::validate`] so that CLI overrides get a chance to supply it first.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but malformed or out of
    /// range. A typo must not silently retarget the probe at a default value.
    pub fn from_env() -> Result<Self> {
        let host = env::var("PROBE_HOST").unwrap_or_default();

        let port = env_parse("PROBE_PORT", 8443)?;

        let model = env::var("PROBE_MODEL").unwrap_or_else(|_| "gpt-4".to_string());

        let prompt = env::var("PROBE_PROMPT")
            .unwrap_or_else(|_| "Say hello in one short sentence.".to_string());

        let max_tokens = env_parse("PROBE_MAX_TOKENS", 16)?;

        let health_timeout = env_parse("PROBE_HEALTH_TIMEOUT", 10)?;

        let completion_timeout = env_parse("PROBE_COMPLETION_TIMEOUT", 30)?;

        let insecure_tls = env_flag("PROBE_INSECURE_TLS");
        let sensitive_host = env_flag("PROBE_SENSITIVE_HOST");

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            model,
            prompt,
            max_tokens,
            health_timeout,
            completion_timeout,
            insecure_tls,
            sensitive_host,
            log_level,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `host` is empty
    /// - `port` is 0
    /// - either timeout is 0
    /// - `max_tokens` is 0
    /// - `model` is empty
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("PROBE_HOST must be set (or pass --host)");
        }

        if self.port == 0 {
            anyhow::bail!("PROBE_PORT must be between 1 and 65535");
        }

        if self.health_timeout == 0 {
            anyhow::bail!("PROBE_HEALTH_TIMEOUT must be greater than 0");
        }

        if self.completion_timeout == 0 {
            anyhow::bail!("PROBE_COMPLETION_TIMEOUT must be greater than 0");
        }

        if self.max_tokens == 0 {
            anyhow::bail!("PROBE_MAX_TOKENS must be greater than 0");
        }

        if self.model.trim().is_empty() {
            anyhow::bail!("PROBE_MODEL must not be empty");
        }

        Ok(())
    }

    /// Builds the probe target from the configured host and port.
    pub fn target(&self) -> Result<Target> {
        Ok(Target::new(self.host.clone(), self.port, self.sensitive_host)?)
    }

    /// Builds the prober settings from the configured knobs.
    pub fn settings(&self) -> ProbeSettings {
        ProbeSettings {
            model: self.model.clone(),
            prompt: self.prompt.clone(),
            max_tokens: self.max_tokens,
            health_timeout: Duration::from_secs(self.health_timeout),
            completion_timeout: Duration::from_secs(self.completion_timeout),
        }
    }

    /// Host as it may appear in logs.
    pub fn display_host(&self) -> &str {
        if self.sensitive_host {
            REDACTED
        } else {
            &self.host
        }
    }

    /// Logs the effective configuration (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Target: {}:{}", self.display_host(), self.port);
        tracing::info!("  Model: {}", self.model);
        tracing::info!("  Max tokens: {}", self.max_tokens);
        tracing::info!(
            "  Timeouts: health {}s, completion {}s",
            self.health_timeout,
            self.completion_timeout
        );

        if self.insecure_tls {
            tracing::warn!("  TLS certificate verification DISABLED");
        }
    }
}

/// Parses a numeric environment variable, failing fast when the value is set
/// but malformed or out of range.
///
/// The raw value is never echoed into the error message; the surrounding
/// environment may mark these values as sensitive.
fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} must be a valid number in range")),
        Err(_) => Ok(default),
    }
}

/// Parses a boolean environment flag (`true`/`1`).
fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn base_config() -> Config {
        Config {
            host: "example.ts.net".to_string(),
            port: 8443,
            model: "gpt-4".to_string(),
            prompt: "Say hello in one short sentence.".to_string(),
            max_tokens: 16,
            health_timeout: 10,
            completion_timeout: 30,
            insecure_tls: false,
            sensitive_host: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = base_config();
        assert!(config.validate().is_ok());

        // Empty host
        config.host = "".to_string();
        assert!(config.validate().is_err());
        config.host = "example.ts.net".to_string();

        // Port zero
        config.port = 0;
        assert!(config.validate().is_err());
        config.port = 8443;

        // Zero timeouts
        config.health_timeout = 0;
        assert!(config.validate().is_err());
        config.health_timeout = 10;

        config.completion_timeout = 0;
        assert!(config.validate().is_err());
        config.completion_timeout = 30;

        // Zero max_tokens
        config.max_tokens = 0;
        assert!(config.validate().is_err());
        config.max_tokens = 16;

        // Empty model
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_host_redaction() {
        let mut config = base_config();
        assert_eq!(config.display_host(), "example.ts.net");

        config.sensitive_host = true;
        assert_eq!(config.display_host(), "[redacted]");
    }

    #[test]
    fn test_settings_conversion() {
        let config = base_config();
        let settings = config.settings();

        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.max_tokens, 16);
        assert_eq!(settings.health_timeout, Duration::from_secs(10));
        assert_eq!(settings.completion_timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("PROBE_HOST");
            env::remove_var("PROBE_PORT");
            env::remove_var("PROBE_MODEL");
            env::remove_var("PROBE_MAX_TOKENS");
            env::remove_var("PROBE_HEALTH_TIMEOUT");
            env::remove_var("PROBE_COMPLETION_TIMEOUT");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.host, "");
        assert_eq!(config.port, 8443);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.prompt, "Say hello in one short sentence.");
        assert_eq!(config.max_tokens, 16);
        assert_eq!(config.health_timeout, 10);
        assert_eq!(config.completion_timeout, 30);
        assert!(!config.insecure_tls);
        assert!(!config.sensitive_host);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("PROBE_HOST", "gw.ts.net");
            env::set_var("PROBE_PORT", "9443");
            env::set_var("PROBE_INSECURE_TLS", "1");
            env::set_var("PROBE_SENSITIVE_HOST", "true");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.host, "gw.ts.net");
        assert_eq!(config.port, 9443);
        assert!(config.insecure_tls);
        assert!(config.sensitive_host);

        // Cleanup
        unsafe {
            env::remove_var("PROBE_HOST");
            env::remove_var("PROBE_PORT");
            env::remove_var("PROBE_INSECURE_TLS");
            env::remove_var("PROBE_SENSITIVE_HOST");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_malformed_numbers() {
        // A port out of u16 range must fail fast, not fall back to the default.
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("PROBE_PORT", "99999");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("PROBE_PORT"));
        assert!(!err.to_string().contains("99999"));

        unsafe {
            env::set_var("PROBE_PORT", "abc");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("PROBE_PORT");
            env::set_var("PROBE_MAX_TOKENS", "lots");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("PROBE_MAX_TOKENS");
            env::set_var("PROBE_HEALTH_TIMEOUT", "soon");
        }
        assert!(Config::from_env().is_err());

        // Cleanup
        unsafe {
            env::remove_var("PROBE_HEALTH_TIMEOUT");
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_requires_host() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("PROBE_HOST");
        }

        assert!(load_from_env().is_err());
    }
}
