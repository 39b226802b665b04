//! View-state orchestration for the dashboard.
//!
//! One [`DashboardController`] instance owns everything the presentation
//! layer may render: the active view, the scan submission lifecycle, the
//! latest scan outcome, and the per-view collections. Drivers mutate it
//! through a small set of transitions; after every transition the
//! controller hands an immutable [`ViewModel`] snapshot to its listener,
//! and the presentation redraws from snapshots only.
//!
//! # Transitions
//!
//! - [`switch_to`](DashboardController::switch_to) changes the active
//!   view and, for History/Analytics, issues a [`FetchTicket`] for the
//!   refresh the driver must perform.
//! - [`begin_submit`](DashboardController::begin_submit) /
//!   [`finish_submit`](DashboardController::finish_submit) bracket one
//!   classify request. At most one scan is in flight; a second submit
//!   while `Submitting` is rejected at this boundary.
//! - [`apply_history`](DashboardController::apply_history) /
//!   [`apply_analytics`](DashboardController::apply_analytics) accept a
//!   fetch outcome. Outcomes carrying a superseded ticket are discarded
//!   (last writer wins), and fetch failures are silently ignored: the
//!   auxiliary views are best-effort by design.
//!
//! For synchronous drivers the composed forms
//! [`submit`](DashboardController::submit) and
//! [`activate`](DashboardController::activate) run a full cycle against
//! a [`ScanService`] in one call.

use std::fmt;

use anyhow::Result;

use crate::client::{AnalyticsBucket, HistoryEntry, ScanService};
use crate::verdict::{self, RawVerdict, ScanResult};

/// Blocking notice raised when a classify call fails.
pub const SERVICE_UNAVAILABLE_NOTICE: &str = "service unavailable — scan not completed";

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One of the three mutually exclusive display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Analyzer,
    History,
    Analytics,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyzer => write!(f, "analyzer"),
            Self::History => write!(f, "history"),
            Self::Analytics => write!(f, "analytics"),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of the current classify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Result of asking the controller to start a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request may be issued; the controller is now `Submitting`.
    Accepted,
    /// Input was empty after trimming. No request, no state change.
    EmptyInput,
    /// A scan is already in flight. No second request.
    AlreadySubmitting,
}

// ---------------------------------------------------------------------------
// Fetch identity
// ---------------------------------------------------------------------------

/// Request identity for an auxiliary view fetch.
///
/// Issued by [`DashboardController::switch_to`]. Each new fetch for a
/// view supersedes the previous one; an outcome applied with a stale
/// ticket is discarded, so a slow response can never overwrite a newer
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    view: View,
    seq: u64,
}

impl FetchTicket {
    /// The view this fetch populates.
    pub fn view(&self) -> View {
        self.view
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Immutable render input, emitted after every transition.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub active_view: View,
    pub submission: SubmissionState,
    /// Outcome of the most recent completed scan, if any.
    pub result: Option<ScanResult>,
    /// Blocking failure notice from the last classify attempt, if any.
    pub notice: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub analytics: Vec<AnalyticsBucket>,
}

impl ViewModel {
    /// The submit control is enabled only when no scan is in flight.
    pub fn can_submit(&self) -> bool {
        self.submission == SubmissionState::Idle
    }
}

/// Presentation callback invoked with a fresh snapshot after each
/// transition.
pub type Listener = Box<dyn FnMut(&ViewModel)>;

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The dashboard's single point of state and decision logic.
///
/// All fields are private; no shared mutable state leaks outside the
/// instance.
pub struct DashboardController {
    active_view: View,
    submission: SubmissionState,
    result: Option<ScanResult>,
    notice: Option<String>,
    history: Vec<HistoryEntry>,
    analytics: Vec<AnalyticsBucket>,
    history_seq: u64,
    analytics_seq: u64,
    listener: Option<Listener>,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardController {
    /// A fresh controller: Analyzer view, idle, nothing loaded.
    pub fn new() -> Self {
        Self {
            active_view: View::Analyzer,
            submission: SubmissionState::Idle,
            result: None,
            notice: None,
            history: Vec::new(),
            analytics: Vec::new(),
            history_seq: 0,
            analytics_seq: 0,
            listener: None,
        }
    }

    /// Install the presentation listener. It is called with a snapshot
    /// after every transition from then on.
    pub fn set_listener(&mut self, listener: Listener) {
        self.listener = Some(listener);
    }

    /// Produce an immutable snapshot of the current state.
    pub fn snapshot(&self) -> ViewModel {
        ViewModel {
            active_view: self.active_view,
            submission: self.submission,
            result: self.result.clone(),
            notice: self.notice.clone(),
            history: self.history.clone(),
            analytics: self.analytics.clone(),
        }
    }

    fn notify(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            let snapshot = self.snapshot();
            listener(&snapshot);
            self.listener = Some(listener);
        }
    }

    // -----------------------------------------------------------------------
    // View selector
    // -----------------------------------------------------------------------

    /// Switch the active view.
    ///
    /// Always sets the view. Switching to History or Analytics starts a
    /// fresh fetch and returns its ticket; the driver performs the read
    /// and hands the outcome back through the matching `apply_*` call.
    /// Re-selecting the already-active view is idempotent: no ticket, no
    /// request. Analyzer has no load side effect; its last result stays
    /// visible.
    pub fn switch_to(&mut self, view: View) -> Option<FetchTicket> {
        let already_active = self.active_view == view;
        self.active_view = view;

        let ticket = if already_active {
            None
        } else {
            match view {
                View::Analyzer => None,
                View::History => {
                    self.history_seq += 1;
                    Some(FetchTicket {
                        view,
                        seq: self.history_seq,
                    })
                }
                View::Analytics => {
                    self.analytics_seq += 1;
                    Some(FetchTicket {
                        view,
                        seq: self.analytics_seq,
                    })
                }
            }
        };

        self.notify();
        ticket
    }

    /// Apply a history fetch outcome.
    ///
    /// Discards the outcome if its ticket has been superseded by a newer
    /// fetch. On success the collection is replaced in full; on failure
    /// it keeps its previous value and no error is surfaced.
    pub fn apply_history(&mut self, ticket: FetchTicket, outcome: Result<Vec<HistoryEntry>>) {
        if ticket.view != View::History || ticket.seq != self.history_seq {
            return;
        }
        if let Ok(entries) = outcome {
            self.history = entries;
            self.notify();
        }
    }

    /// Apply an analytics fetch outcome. Same ticket and failure policy
    /// as [`apply_history`](Self::apply_history).
    pub fn apply_analytics(&mut self, ticket: FetchTicket, outcome: Result<Vec<AnalyticsBucket>>) {
        if ticket.view != View::Analytics || ticket.seq != self.analytics_seq {
            return;
        }
        if let Ok(buckets) = outcome {
            self.analytics = buckets;
            self.notify();
        }
    }

    /// Composed switch-and-load for synchronous drivers: switch the
    /// view and, if a fetch was started, run it against `service` and
    /// apply the outcome.
    pub fn activate<S: ScanService>(&mut self, service: &S, view: View) {
        let Some(ticket) = self.switch_to(view) else {
            return;
        };

        match ticket.view {
            View::History => {
                let outcome = service.fetch_history();
                self.apply_history(ticket, outcome);
            }
            View::Analytics => {
                let outcome = service.fetch_analytics();
                self.apply_analytics(ticket, outcome);
            }
            View::Analyzer => {}
        }
    }

    // -----------------------------------------------------------------------
    // Analysis submission flow
    // -----------------------------------------------------------------------

    /// Start a scan for the given text.
    ///
    /// Rejects empty input (after trimming) and concurrent submission;
    /// neither rejection mutates state or issues a request. On
    /// `Accepted` the controller is `Submitting` and exactly one
    /// classify request must follow, resolved via
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::EmptyInput;
        }
        if self.submission == SubmissionState::Submitting {
            return SubmitOutcome::AlreadySubmitting;
        }

        self.submission = SubmissionState::Submitting;
        self.notice = None;
        self.notify();
        SubmitOutcome::Accepted
    }

    /// Resolve the in-flight scan with the transport outcome.
    ///
    /// Success stores the normalized result, replacing any previous one
    /// wholesale. Failure raises the blocking notice and leaves the
    /// previous result untouched. Either way the flow returns to idle;
    /// a failure is terminal for that attempt (no retry).
    pub fn finish_submit(&mut self, outcome: Result<RawVerdict>) {
        if self.submission != SubmissionState::Submitting {
            return;
        }

        self.submission = SubmissionState::Idle;
        match outcome {
            Ok(raw) => {
                self.result = Some(verdict::normalize(raw));
            }
            Err(_) => {
                self.notice = Some(SERVICE_UNAVAILABLE_NOTICE.to_string());
            }
        }
        self.notify();
    }

    /// Composed submit for synchronous drivers: guard, classify via
    /// `service`, and resolve, in one call.
    pub fn submit<S: ScanService>(&mut self, service: &S, text: &str) -> SubmitOutcome {
        let outcome = self.begin_submit(text);
        if outcome == SubmitOutcome::Accepted {
            let response = service.classify(text);
            self.finish_submit(response);
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn result(&self) -> Option<&ScanResult> {
        self.result.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn analytics(&self) -> &[AnalyticsBucket] {
        &self.analytics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
