//! CLI wrapper around the readiness prober.
//!
//! Thin by design: parses flags, merges them over environment configuration,
//! runs one probe, prints the report, and maps the outcome to an exit code.
//!
//! # Exit Codes
//!
//! - `0` - both checks passed
//! - `1` - configuration or usage error (no network call made)
//! - `2` - health check failed (completion never attempted)
//! - `3` - completion check failed

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gateway_probe::config::Config;
use gateway_probe::prober::Prober;
use gateway_probe::report;
use gateway_probe::transport::HttpTransport;

/// Probe an LLM gateway endpoint for readiness.
#[derive(Debug, Parser)]
#[command(name = "gateway-probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway hostname on the private overlay network
    #[arg(long)]
    host: Option<String>,

    /// Gateway port
    #[arg(short, long)]
    port: Option<u16>,

    /// Prompt sent to the completion endpoint
    #[arg(long)]
    prompt: Option<String>,

    /// Model identifier named in the completion request
    #[arg(long)]
    model: Option<String>,

    /// Completion output bound
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Health check timeout in seconds
    #[arg(long)]
    health_timeout: Option<u64>,

    /// Completion check timeout in seconds
    #[arg(long)]
    completion_timeout: Option<u64>,

    /// Accept invalid TLS certificates (self-signed gateways only)
    #[arg(long)]
    insecure_tls: bool,

    /// Treat the host as a secret and redact it from all output
    #[arg(long)]
    sensitive_host: bool,
}

impl Cli {
    /// Overlays CLI flags onto environment configuration. Flags win.
    fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(prompt) = self.prompt {
            config.prompt = prompt;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(secs) = self.health_timeout {
            config.health_timeout = secs;
        }
        if let Some(secs) = self.completion_timeout {
            config.completion_timeout = secs;
        }
        if self.insecure_tls {
            config.insecure_tls = true;
        }
        if self.sensitive_host {
            config.sensitive_host = true;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    // try_parse instead of parse: clap's default usage-error exit code is 2,
    // which would collide with the health-failure code.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            return Ok(ExitCode::from(usage_exit_code(&e)));
        }
    };

    let config = cli.apply(Config::from_env()?);
    config.validate()?;
    config.print_summary();

    let target = config.target()?;
    let transport = Arc::new(HttpTransport::new(config.insecure_tls)?);
    let prober = Prober::new(transport, config.settings());

    let outcome = prober.run(&target).await;
    report::print_report(&outcome);

    Ok(ExitCode::from(exit_code(&outcome)))
}

/// Help and version renderings exit 0; real usage errors share the
/// configuration-error code so the orchestration can tell them apart from
/// probe failures.
fn usage_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() { 1 } else { 0 }
}

/// Distinct codes so the orchestration can tell the two failure modes apart.
fn exit_code(outcome: &gateway_probe::Outcome) -> u8 {
    if !outcome.health_ok {
        2
    } else if !outcome.completion_ok {
        3
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_probe::prober::Outcome;

    fn outcome(health_ok: bool, completion_ok: bool) -> Outcome {
        Outcome {
            health_ok,
            completion_ok,
            failure_reason: None,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&outcome(true, true)), 0);
        assert_eq!(exit_code(&outcome(false, false)), 2);
        assert_eq!(exit_code(&outcome(true, false)), 3);
    }

    #[test]
    fn test_usage_error_maps_to_config_exit_code() {
        // Unknown flag: a usage error, never code 2 (reserved for health failure).
        let err = Cli::try_parse_from(["gateway-probe", "--no-such-flag"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);

        // Help is not an error from the caller's point of view.
        let help = Cli::try_parse_from(["gateway-probe", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);
    }

    #[test]
    fn test_cli_overrides_env_config() {
        let cli = Cli {
            host: Some("cli-host.ts.net".to_string()),
            port: Some(9443),
            prompt: None,
            model: None,
            max_tokens: Some(8),
            health_timeout: None,
            completion_timeout: None,
            insecure_tls: true,
            sensitive_host: false,
        };

        let base = Config {
            host: "env-host.ts.net".to_string(),
            port: 8443,
            model: "gpt-4".to_string(),
            prompt: "Say hello in one short sentence.".to_string(),
            max_tokens: 16,
            health_timeout: 10,
            completion_timeout: 30,
            insecure_tls: false,
            sensitive_host: false,
            log_level: "info".to_string(),
        };

        let merged = cli.apply(base);

        assert_eq!(merged.host, "cli-host.ts.net");
        assert_eq!(merged.port, 9443);
        assert_eq!(merged.max_tokens, 8);
        assert_eq!(merged.prompt, "Say hello in one short sentence.");
        assert!(merged.insecure_tls);
    }
}
