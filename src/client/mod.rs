/// HTTP client for the remote classification service.
///
/// Communicates with the REST API (default `http://127.0.0.1:5000`)
/// using the synchronous `ureq` HTTP client. Three endpoints:
///
/// - **Classify**: `POST /api/analyze` with the raw email text.
/// - **History**: `GET /api/history`, the stored audit log.
/// - **Analytics**: `GET /api/analytics`, aggregate verdict counts.
///
/// The [`ScanService`] trait is the seam the controller depends on, so
/// tests can drive it with scripted outcomes instead of a live service.
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::verdict::RawVerdict;

// ---------------------------------------------------------------------------
// Request / response types for the service API
// ---------------------------------------------------------------------------

/// Request body for `POST /api/analyze`.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// A single audit-log record from `GET /api/history`.
///
/// `score` is the raw classifier score; the renderer derives the display
/// percentage with the same transform used for live scans. `timestamp`
/// is an ISO-8601 string, rendered in the viewer's local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: String,
    pub text: String,
    pub label: String,
    pub score: f64,
}

/// One aggregate slice from `GET /api/analytics`.
///
/// `name` carries the verdict category (spam vs ham) and drives color
/// selection in the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsBucket {
    pub name: String,
    pub value: u64,
}

// ---------------------------------------------------------------------------
// Service seam
// ---------------------------------------------------------------------------

/// The three collaborator operations the dashboard depends on.
pub trait ScanService {
    /// Submit email text for classification.
    fn classify(&self, text: &str) -> Result<RawVerdict>;

    /// Fetch the full audit log, newest first (ordering is owned by the
    /// service; callers must not re-sort).
    fn fetch_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Fetch the aggregate verdict distribution.
    fn fetch_analytics(&self) -> Result<Vec<AnalyticsBucket>>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Synchronous HTTP client for the classification service.
///
/// Created from a [`ServiceConfig`] and reused for the lifetime of a
/// single invocation. No retries: a transport failure is terminal for
/// that attempt.
#[derive(Debug, Clone)]
pub struct HttpScanService {
    base_url: String,
    timeout: Duration,
}

impl HttpScanService {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Check whether the service is reachable and answering.
    ///
    /// The service exposes no dedicated health endpoint; the analytics
    /// read is the cheapest call it answers.
    pub fn is_healthy(&self) -> bool {
        self.fetch_analytics().is_ok()
    }

    /// The configured endpoint, for display.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let url = format!("{}{}", self.base_url, path);
        // "localhost" may resolve to ::1 first on some hosts while the
        // service only binds IPv4. Use 127.0.0.1 directly.
        url.replace("://localhost", "://127.0.0.1")
    }
}

impl ScanService for HttpScanService {
    fn classify(&self, text: &str) -> Result<RawVerdict> {
        let resp = ureq::post(&self.url("/api/analyze"))
            .timeout(self.timeout)
            .send_json(&AnalyzeRequest { text })
            .context("classify request failed")?;

        resp.into_json()
            .context("failed to parse classify response")
    }

    fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        let resp = ureq::get(&self.url("/api/history"))
            .timeout(self.timeout)
            .call()
            .context("history request failed")?;

        resp.into_json().context("failed to parse history response")
    }

    fn fetch_analytics(&self) -> Result<Vec<AnalyticsBucket>> {
        let resp = ureq::get(&self.url("/api/analytics"))
            .timeout(self.timeout)
            .call()
            .context("analytics request failed")?;

        resp.into_json()
            .context("failed to parse analytics response")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
