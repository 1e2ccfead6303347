//! Human-readable and machine-readable run summaries.
//!
//! One line per check plus a final `key=value` summary line for machine
//! consumption by the surrounding orchestration. Summary text only ever carries
//! booleans and the failure reason, never the target host.

use colored::*;

use crate::prober::Outcome;

/// Plain (uncolored) status line for one check.
pub fn check_line(name: &str, ok: bool) -> String {
    if ok {
        format!("{name}: ok")
    } else {
        format!("{name}: FAILED")
    }
}

/// Final `key=value` summary line.
///
/// `failure_reason` is included only on failure, quoted so downstream parsers can
/// split on whitespace.
pub fn machine_summary(outcome: &Outcome) -> String {
    let mut line = format!(
        "health_ok={} completion_ok={}",
        outcome.health_ok, outcome.completion_ok
    );
    if let Some(reason) = &outcome.failure_reason {
        line.push_str(&format!(" failure_reason={:?}", reason));
    }
    line
}

/// Prints the full report to stdout: colored per-check lines, then the machine
/// summary line.
pub fn print_report(outcome: &Outcome) {
    print_check("health check", outcome.health_ok);

    if outcome.health_ok {
        print_check("completion check", outcome.completion_ok);
    } else {
        println!("{}", "completion check: skipped".yellow());
    }

    if let Some(reason) = &outcome.failure_reason {
        println!("{} {}", "reason:".bright_white(), reason.red());
    }

    println!();
    if outcome.is_success() {
        println!("{}", "✅ Endpoint ready".green().bold());
    } else {
        println!("{}", "❌ Endpoint not ready".red().bold());
    }

    println!("{}", machine_summary(outcome));
}

fn print_check(name: &str, ok: bool) {
    let line = check_line(name, ok);
    if ok {
        println!("{}", line.green());
    } else {
        println!("{}", line.red().bold());
    }
}
