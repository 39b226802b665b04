/// Integration tests for the dashboard controller.
///
/// Unit tests for individual transitions live in each module's
/// `#[cfg(test)]` block. These tests exercise composed flows against a
/// scripted in-memory service, verifying the request-issuing properties
/// the split-phase unit tests cannot see:
///
/// - exactly one classify request per accepted submit
/// - no request for rejected submits (empty input, already in flight)
/// - no refetch when re-selecting the active view
/// - best-effort auxiliary fetches (failures switch the view anyway)
use std::cell::{Cell, RefCell};

use anyhow::Result;

use spamguard::client::{AnalyticsBucket, HistoryEntry, ScanService};
use spamguard::controller::{
    DashboardController, SubmissionState, SubmitOutcome, View, SERVICE_UNAVAILABLE_NOTICE,
};
use spamguard::verdict::{RawVerdict, VerdictLabel};

// ---------------------------------------------------------------------------
// Scripted service
// ---------------------------------------------------------------------------

/// In-memory [`ScanService`] with request counters and a failure switch.
#[derive(Default)]
struct ScriptedService {
    classify_calls: Cell<usize>,
    history_calls: Cell<usize>,
    analytics_calls: Cell<usize>,
    /// When set, every call fails until cleared.
    failing: Cell<bool>,
    label: RefCell<String>,
    score: Cell<f64>,
    history: RefCell<Vec<HistoryEntry>>,
    analytics: RefCell<Vec<AnalyticsBucket>>,
}

impl ScriptedService {
    fn answering(label: &str, score: f64) -> Self {
        let service = Self::default();
        *service.label.borrow_mut() = label.to_string();
        service.score.set(score);
        service
    }

    fn with_history(self, entries: Vec<HistoryEntry>) -> Self {
        *self.history.borrow_mut() = entries;
        self
    }

    fn with_analytics(self, buckets: Vec<AnalyticsBucket>) -> Self {
        *self.analytics.borrow_mut() = buckets;
        self
    }
}

impl ScanService for ScriptedService {
    fn classify(&self, _text: &str) -> Result<RawVerdict> {
        self.classify_calls.set(self.classify_calls.get() + 1);
        if self.failing.get() {
            anyhow::bail!("connection refused");
        }
        Ok(RawVerdict {
            label: self.label.borrow().clone(),
            score: self.score.get(),
            keywords: Vec::new(),
        })
    }

    fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        self.history_calls.set(self.history_calls.get() + 1);
        if self.failing.get() {
            anyhow::bail!("connection refused");
        }
        Ok(self.history.borrow().clone())
    }

    fn fetch_analytics(&self) -> Result<Vec<AnalyticsBucket>> {
        self.analytics_calls.set(self.analytics_calls.get() + 1);
        if self.failing.get() {
            anyhow::bail!("connection refused");
        }
        Ok(self.analytics.borrow().clone())
    }
}

fn entry(id: i64, text: &str) -> HistoryEntry {
    HistoryEntry {
        id,
        timestamp: "2026-08-08T09:30:00Z".to_string(),
        text: text.to_string(),
        label: "Spam".to_string(),
        score: 0.9,
    }
}

fn bucket(name: &str, value: u64) -> AnalyticsBucket {
    AnalyticsBucket {
        name: name.to_string(),
        value,
    }
}

// ---------------------------------------------------------------------------
// Submission flow
// ---------------------------------------------------------------------------

#[test]
fn accepted_submit_issues_exactly_one_request() {
    let service = ScriptedService::answering("Spam", 0.92);
    let mut controller = DashboardController::new();

    let outcome = controller.submit(&service, "WIN A FREE PRIZE");

    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(service.classify_calls.get(), 1);
    let result = controller.result().unwrap();
    assert_eq!(result.label, VerdictLabel::Spam);
    assert_eq!(result.confidence_pct, 92.0);
}

#[test]
fn empty_input_never_touches_the_service() {
    let service = ScriptedService::answering("Spam", 0.92);
    let mut controller = DashboardController::new();

    assert_eq!(controller.submit(&service, ""), SubmitOutcome::EmptyInput);
    assert_eq!(controller.submit(&service, "   "), SubmitOutcome::EmptyInput);

    assert_eq!(service.classify_calls.get(), 0);
    assert!(controller.result().is_none());
}

#[test]
fn in_flight_guard_blocks_a_second_request() {
    let service = ScriptedService::answering("Spam", 0.92);
    let mut controller = DashboardController::new();

    assert_eq!(controller.begin_submit("first"), SubmitOutcome::Accepted);
    assert_eq!(
        controller.begin_submit("second"),
        SubmitOutcome::AlreadySubmitting
    );

    // Only the accepted submit is allowed to reach the service.
    let response = service.classify("first");
    controller.finish_submit(response);

    assert_eq!(service.classify_calls.get(), 1);
    assert_eq!(controller.submission(), SubmissionState::Idle);
}

#[test]
fn failed_scan_preserves_prior_result_and_reenables_submit() {
    let service = ScriptedService::answering("Ham/Positive", 0.95);
    let mut controller = DashboardController::new();

    controller.submit(&service, "regular newsletter");
    assert_eq!(controller.result().unwrap().label, VerdictLabel::Ham);

    service.failing.set(true);
    let outcome = controller.submit(&service, "second email");

    assert_eq!(outcome, SubmitOutcome::Accepted, "guard admits the attempt");
    assert_eq!(service.classify_calls.get(), 2);
    assert_eq!(controller.notice(), Some(SERVICE_UNAVAILABLE_NOTICE));
    assert_eq!(
        controller.result().unwrap().confidence_pct,
        95.0,
        "prior result still displayed"
    );
    assert!(controller.snapshot().can_submit(), "control back to idle");
}

#[test]
fn listener_sees_submitting_then_idle_across_composed_submit() {
    use std::rc::Rc;

    let service = ScriptedService::answering("Spam", 0.5);
    let seen: Rc<RefCell<Vec<(SubmissionState, bool)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut controller = DashboardController::new();
    controller.set_listener(Box::new(move |vm| {
        sink.borrow_mut().push((vm.submission, vm.result.is_some()));
    }));

    controller.submit(&service, "text");

    assert_eq!(
        *seen.borrow(),
        vec![
            (SubmissionState::Submitting, false),
            (SubmissionState::Idle, true),
        ]
    );
}

// ---------------------------------------------------------------------------
// View selector
// ---------------------------------------------------------------------------

#[test]
fn activate_history_fetches_and_replaces_the_collection() {
    let service =
        ScriptedService::answering("Spam", 0.9).with_history(vec![entry(1, "a"), entry(2, "b")]);
    let mut controller = DashboardController::new();

    controller.activate(&service, View::History);

    assert_eq!(controller.active_view(), View::History);
    assert_eq!(service.history_calls.get(), 1);
    assert_eq!(controller.history().len(), 2);
}

#[test]
fn reactivating_the_current_view_does_not_refetch() {
    let service = ScriptedService::answering("Spam", 0.9).with_history(vec![entry(1, "a")]);
    let mut controller = DashboardController::new();

    controller.activate(&service, View::History);
    controller.activate(&service, View::History);

    assert_eq!(service.history_calls.get(), 1, "idempotent switch");
}

#[test]
fn each_entry_into_a_view_fetches_fresh_data() {
    let service = ScriptedService::answering("Spam", 0.9)
        .with_analytics(vec![bucket("Spam", 4), bucket("Ham", 9)]);
    let mut controller = DashboardController::new();

    controller.activate(&service, View::Analytics);
    controller.activate(&service, View::Analyzer);
    controller.activate(&service, View::Analytics);

    assert_eq!(service.analytics_calls.get(), 2, "no caching across visits");
    assert_eq!(controller.analytics().len(), 2);
}

#[test]
fn activating_analyzer_never_issues_a_request() {
    let service = ScriptedService::answering("Spam", 0.9);
    let mut controller = DashboardController::new();

    controller.activate(&service, View::History);
    controller.activate(&service, View::Analyzer);

    assert_eq!(service.classify_calls.get(), 0);
    assert_eq!(service.history_calls.get(), 1);
    assert_eq!(service.analytics_calls.get(), 0);
}

#[test]
fn failed_auxiliary_fetch_still_switches_and_stays_silent() {
    let service = ScriptedService::answering("Spam", 0.9).with_history(vec![entry(1, "a")]);
    let mut controller = DashboardController::new();

    controller.activate(&service, View::History);
    assert_eq!(controller.history().len(), 1);

    service.failing.set(true);
    controller.activate(&service, View::Analyzer);
    controller.activate(&service, View::History);

    assert_eq!(controller.active_view(), View::History, "view switched");
    assert_eq!(controller.history().len(), 1, "previous data kept");
    assert!(controller.notice().is_none(), "no user-visible error");
}

#[test]
fn scan_result_survives_a_tour_of_all_views() {
    let service = ScriptedService::answering("Spam/Negative", -0.87)
        .with_history(vec![entry(1, "a")])
        .with_analytics(vec![bucket("Spam", 1)]);
    let mut controller = DashboardController::new();

    controller.submit(&service, "click here to claim");
    controller.activate(&service, View::History);
    controller.activate(&service, View::Analytics);
    controller.activate(&service, View::Analyzer);

    let result = controller.result().unwrap();
    assert_eq!(result.label, VerdictLabel::Spam);
    assert_eq!(result.confidence_pct, 87.0);
}
