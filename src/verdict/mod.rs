//! Verdict normalization for raw classifier responses.
//!
//! The classification service has shipped two label conventions over time
//! (`"Spam"` and compound values like `"Spam/Negative"`) and does not fix
//! the sign or range of its score. This module collapses both into a
//! single display contract: a binary [`VerdictLabel`] plus a confidence
//! percentage rounded to one decimal place. Normalization is pure and
//! total; it never fails.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire and display types
// ---------------------------------------------------------------------------

/// Raw response body from `POST /api/analyze`, exactly as the service
/// sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVerdict {
    pub label: String,
    pub score: f64,
    /// Significant tokens the classifier reported for this text. Older
    /// service builds omit the field entirely.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Binary classification outcome shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerdictLabel {
    Spam,
    Ham,
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spam => write!(f, "Spam"),
            Self::Ham => write!(f, "Ham"),
        }
    }
}

/// Normalized outcome of one completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub label: VerdictLabel,
    /// Confidence percentage, one decimal of precision.
    pub confidence_pct: f64,
    /// Classifier-reported keywords, passed through untouched.
    pub keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Decide whether a raw label string denotes spam.
///
/// Pinned rule: the label's first token — everything before the first
/// `/` or whitespace, leading whitespace ignored — must equal `"spam"`
/// case-insensitively. This accepts both upstream conventions (`"Spam"`,
/// `"Spam/Negative"`) while rejecting negated forms such as
/// `"Not Spam"`, which must read as ham.
pub fn is_spam_label(label: &str) -> bool {
    let first = label
        .trim_start()
        .split(['/', ' ', '\t'])
        .next()
        .unwrap_or("");
    first.eq_ignore_ascii_case("spam")
}

/// Derive the display confidence percentage from a raw score.
///
/// The score's sign is not trusted: the service has emitted signed
/// values from at least one code path, so display confidence is
/// `|score| * 100`, rounded to one decimal.
pub fn confidence_pct(score: f64) -> f64 {
    round_one_decimal(score.abs() * 100.0)
}

/// Map a raw classifier response into a [`ScanResult`].
pub fn normalize(raw: RawVerdict) -> ScanResult {
    let label = if is_spam_label(&raw.label) {
        VerdictLabel::Spam
    } else {
        VerdictLabel::Ham
    };

    ScanResult {
        label,
        confidence_pct: confidence_pct(raw.score),
        keywords: raw.keywords,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
