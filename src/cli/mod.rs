//! CLI command implementations for the spamguard dashboard.
//!
//! Provides subcommand handlers for:
//! - `spamguard scan [FILE]` — submit email text, print the verdict
//! - `spamguard history` — render the stored audit log
//! - `spamguard analytics` — render the verdict distribution
//! - `spamguard dash` — interactive three-view session
//! - `spamguard health` — check config and service reachability
//!
//! Each handler builds a fresh [`DashboardController`] and drives it
//! against the configured HTTP service; rendering always goes through
//! view-model snapshots.

use std::io::{BufRead, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::HttpScanService;
use crate::config::{self, ServiceConfig};
use crate::controller::{DashboardController, SubmitOutcome, View};
use crate::render;

/// Output format for one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

fn connect() -> HttpScanService {
    HttpScanService::from_config(&ServiceConfig::load())
}

// ---------------------------------------------------------------------------
// spamguard scan
// ---------------------------------------------------------------------------

/// Scan email text from a file (or stdin) and print the verdict.
pub fn run_scan(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let text = read_email_text(file)?;
    let service = connect();
    let mut controller = DashboardController::new();

    // A fresh controller can only answer Accepted or EmptyInput here.
    if controller.submit(&service, &text) == SubmitOutcome::EmptyInput {
        println!("{}", "No email content provided. Nothing to scan.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_scan_json(&controller)?,
        OutputFormat::Table => render::render_analyzer(&controller.snapshot()),
    }

    Ok(())
}

fn print_scan_json(controller: &DashboardController) -> Result<()> {
    let value = match (controller.result(), controller.notice()) {
        (_, Some(notice)) => serde_json::json!({ "error": notice }),
        (Some(result), None) => serde_json::json!({
            "label": result.label,
            "confidence_pct": result.confidence_pct,
            "keywords": result.keywords,
        }),
        (None, None) => serde_json::json!({}),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Read the raw email content from a file, or stdin when no file is
/// given.
fn read_email_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed reading email text from stdin")?;
            Ok(buf)
        }
    }
}

// ---------------------------------------------------------------------------
// spamguard history / analytics
// ---------------------------------------------------------------------------

/// Show the scan audit log.
pub fn run_history(format: OutputFormat) -> Result<()> {
    let service = connect();
    let mut controller = DashboardController::new();
    controller.activate(&service, View::History);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(controller.history())?);
        }
        OutputFormat::Table => render::render_history(controller.history()),
    }

    Ok(())
}

/// Show the verdict distribution.
pub fn run_analytics(format: OutputFormat) -> Result<()> {
    let service = connect();
    let mut controller = DashboardController::new();
    controller.activate(&service, View::Analytics);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(controller.analytics())?);
        }
        OutputFormat::Table => render::render_analytics(controller.analytics()),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// spamguard dash
// ---------------------------------------------------------------------------

/// Interactive dashboard session.
///
/// The controller's listener re-renders the active view after every
/// transition, so in-flight and post-fetch states each get a redraw,
/// the same way the reactive original behaved.
pub fn run_dash() -> Result<()> {
    let service = connect();
    let mut controller = DashboardController::new();
    controller.set_listener(Box::new(|vm| render::render_view(vm)));

    println!("{}", "SpamGuard Dashboard".bold().cyan());
    println!(
        "{}",
        "Commands: analyzer | history | analytics | scan <text> | help | quit".dimmed()
    );
    println!();
    render::render_view(&controller.snapshot());

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("failed reading command")?;
        if bytes == 0 {
            break; // EOF
        }

        let line = line.trim();
        match line {
            "" => {}
            "quit" | "q" | "exit" => break,
            "help" => {
                println!("  analyzer | history | analytics  switch view");
                println!("  scan <text>                     submit email text for a scan");
                println!("  quit                            leave the dashboard");
            }
            "analyzer" => controller.activate(&service, View::Analyzer),
            "history" => controller.activate(&service, View::History),
            "analytics" => controller.activate(&service, View::Analytics),
            _ => {
                if let Some(text) = line.strip_prefix("scan ") {
                    if controller.submit(&service, text) == SubmitOutcome::EmptyInput {
                        println!("{}", "Nothing to scan.".yellow());
                    }
                } else {
                    println!(
                        "{}",
                        format!("Unknown command: {line} (try `help`)").yellow()
                    );
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// spamguard health
// ---------------------------------------------------------------------------

/// Check config and service reachability.
pub fn run_health() -> Result<()> {
    println!("{}", "SpamGuard Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let config_exists = config::config_file_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Config file",
        config_exists,
        if config_exists {
            "~/.spamguard/config.toml found"
        } else {
            "not found (defaults in effect)"
        },
    );

    let cfg = ServiceConfig::load();
    let service = HttpScanService::from_config(&cfg);
    print_health_item("Endpoint", true, service.endpoint());
    print_health_item("Timeout", true, &format!("{} ms", cfg.timeout_ms));

    let reachable = service.is_healthy();
    print_health_item(
        "Service",
        reachable,
        if reachable {
            "reachable"
        } else {
            "not reachable — is the classification service running?"
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<12} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
