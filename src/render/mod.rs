//! Terminal presentation for dashboard view models.
//!
//! Renders whatever view a [`ViewModel`] says is active: the analyzer
//! verdict card, the history audit table, or the analytics distribution.
//! Each view is composed as a string and printed in one piece, so the
//! exact output is testable. Rendering is read-only over the snapshot;
//! all decision logic lives in the controller.

use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use colored::Colorize;

use crate::client::{AnalyticsBucket, HistoryEntry};
use crate::controller::{SubmissionState, View, ViewModel};
use crate::verdict::{self, VerdictLabel};

/// Width of the analytics distribution bars, in characters.
const BAR_WIDTH: usize = 28;

// ---------------------------------------------------------------------------
// View dispatch
// ---------------------------------------------------------------------------

/// Render the active view of a snapshot.
pub fn render_view(vm: &ViewModel) {
    match vm.active_view {
        View::Analyzer => render_analyzer(vm),
        View::History => render_history(&vm.history),
        View::Analytics => render_analytics(&vm.analytics),
    }
    println!();
}

/// Render the analyzer view: in-flight line, failure notice, and the
/// latest verdict card.
pub fn render_analyzer(vm: &ViewModel) {
    print!("{}", analyzer_view(vm));
}

/// Render the audit-log table.
pub fn render_history(entries: &[HistoryEntry]) {
    print!("{}", history_view(entries));
}

/// Render the verdict distribution.
pub fn render_analytics(buckets: &[AnalyticsBucket]) {
    print!("{}", analytics_view(buckets));
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

fn analyzer_view(vm: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Email Intelligence".bold().cyan());
    let _ = writeln!(out, "{}", "=".repeat(60));

    if vm.submission == SubmissionState::Submitting {
        let _ = writeln!(out, "  {}", "Analyzing...".yellow());
        return out;
    }

    if let Some(notice) = &vm.notice {
        let _ = writeln!(out, "  {}", notice.red().bold());
    }

    match &vm.result {
        Some(result) => {
            let banner = match result.label {
                VerdictLabel::Spam => "SPAM DETECTED".red().bold(),
                VerdictLabel::Ham => "SECURE / HAM".green().bold(),
            };
            let _ = writeln!(out, "  {} {}", "Final Verdict:".bold(), banner);
            let _ = writeln!(
                out,
                "  {} {:.1}%",
                "ML Confidence:".bold(),
                result.confidence_pct
            );
            if !result.keywords.is_empty() {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    "Keywords:     ".bold(),
                    result.keywords.join(", ").dimmed()
                );
            }
        }
        None => {
            let _ = writeln!(
                out,
                "  {}",
                "No scan yet. Paste email content and run a scan.".dimmed()
            );
        }
    }

    out
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// An empty log renders a single "No history found." line instead of a
/// bare table.
fn history_view(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Scan Audit Log".bold().cyan());
    let _ = writeln!(out, "{}", "=".repeat(74));

    if entries.is_empty() {
        let _ = writeln!(out, "  {}", "No history found.".yellow());
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<19} {:<32} {:<8} {:>10}",
        "Timestamp", "Snippet", "Result", "Confidence"
    );
    let _ = writeln!(out, "  {}", "-".repeat(72));

    for entry in entries {
        // Pad before coloring; escape codes would throw off the width.
        let badge = format!("{:<8}", truncate(&entry.label, 8));
        let badge = if verdict::is_spam_label(&entry.label) {
            badge.red()
        } else {
            badge.green()
        };

        let _ = writeln!(
            out,
            "  {:<19} {:<32} {} {:>9.1}%",
            format_local_timestamp(&entry.timestamp),
            truncate(&flatten(&entry.text), 32),
            badge,
            verdict::confidence_pct(entry.score),
        );
    }

    out
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Proportional bars, red for spam categories and green for ham, in the
/// order the service returned them.
fn analytics_view(buckets: &[AnalyticsBucket]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Detection Distribution".bold().cyan());
    let _ = writeln!(out, "{}", "=".repeat(60));

    if buckets.is_empty() {
        let _ = writeln!(out, "  {}", "No analytics data.".yellow());
        return out;
    }

    let total: u64 = buckets.iter().map(|b| b.value).sum();

    for bucket in buckets {
        let bar = format!(
            "{:<width$}",
            bar(bucket.value, total, BAR_WIDTH),
            width = BAR_WIDTH
        );
        let bar = if verdict::is_spam_label(&bucket.name) {
            bar.red()
        } else {
            bar.green()
        };

        let _ = writeln!(
            out,
            "  {:<14} {:>6}  {} {:>5.1}%",
            truncate(&bucket.name, 14),
            bucket.value,
            bar,
            share_pct(bucket.value, total),
        );
    }

    out
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render an ISO-8601 service timestamp in the viewer's local time.
///
/// Some service builds emit naive timestamps with no offset; those are
/// treated as UTC. Unparseable values are shown as received.
pub fn format_local_timestamp(raw: &str) -> String {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return instant
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Utc
            .from_utc_datetime(&naive)
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }

    raw.to_string()
}

/// Collapse newlines so a multi-line email body stays on one table row.
fn flatten(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Truncate to `max` characters, ellipsized.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Proportional bar of `width` characters. A non-zero value always gets
/// at least one character so small categories stay visible.
fn bar(value: u64, total: u64, width: usize) -> String {
    if total == 0 || value == 0 {
        return String::new();
    }
    let exact = (value as f64 / total as f64) * width as f64;
    let chars = (exact.round() as usize).clamp(1, width);
    "█".repeat(chars)
}

fn share_pct(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64) * 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
