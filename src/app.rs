//! Polling cycle and supervisor loop
//!
//! One cycle walks `AcquiringSession -> Extracting -> Diffing -> Notifying ->
//! Persisting`. Only a missing or corrupt session aborts a cycle; every other
//! failure degrades it. The supervisor sleeps between cycles and never exits.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::browser::{Extraction, GradeSource, SessionStore};
use crate::core::{HistoryStore, Thresholds, detect_new};
use crate::error::CycleError;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CycleState {
    Idle,
    AcquiringSession,
    Extracting,
    Diffing,
    Notifying,
    Persisting,
    Sleeping,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "idle",
            CycleState::AcquiringSession => "acquiring session",
            CycleState::Extracting => "extracting",
            CycleState::Diffing => "diffing",
            CycleState::Notifying => "notifying",
            CycleState::Persisting => "persisting",
            CycleState::Sleeping => "sleeping",
        };
        f.write_str(name)
    }
}

/// Outcome of a cycle that ran to completion
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CycleReport {
    pub(crate) extracted: usize,
    pub(crate) new_grades: usize,
    pub(crate) failed_notifications: usize,
    /// True only if history was written successfully this cycle
    pub(crate) persisted: bool,
}

pub(crate) struct Watcher<'a> {
    sessions: SessionStore,
    history: HistoryStore,
    source: &'a dyn GradeSource,
    notifier: &'a dyn Notifier,
    thresholds: Thresholds,
}

fn enter(state: CycleState) {
    log::debug!("cycle: {state}");
}

impl<'a> Watcher<'a> {
    pub(crate) fn new(
        sessions: SessionStore,
        history: HistoryStore,
        source: &'a dyn GradeSource,
        notifier: &'a dyn Notifier,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            sessions,
            history,
            source,
            notifier,
            thresholds,
        }
    }

    pub(crate) fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        enter(CycleState::AcquiringSession);
        let session = self.sessions.acquire()?;

        enter(CycleState::Extracting);
        let extraction = match self.source.extract(&session) {
            Ok(extraction) => extraction,
            Err(e) => {
                log::warn!("Extraction degraded, continuing with no grades: {e}");
                Extraction::default()
            }
        };

        enter(CycleState::Diffing);
        let mut history = self.history.load();
        let new_grades = detect_new(&extraction.records, &history);

        let mut report = CycleReport {
            extracted: extraction.records.len(),
            new_grades: new_grades.len(),
            ..CycleReport::default()
        };
        if new_grades.is_empty() {
            log::info!("No new grades");
            enter(CycleState::Idle);
            return Ok(report);
        }

        enter(CycleState::Notifying);
        for grade in new_grades {
            let severity = self.thresholds.classify(&grade.grade);
            log::info!(
                "New grade: {} ({}, {})",
                grade.subject,
                grade.grade,
                severity.label()
            );
            if let Err(e) = self.notifier.notify(&grade, severity) {
                log::warn!(
                    "Notification for {} ({}) not delivered: {e}",
                    grade.subject,
                    grade.grade
                );
                report.failed_notifications += 1;
            }
            history.push(grade);
        }

        enter(CycleState::Persisting);
        match self.history.save(&history) {
            Ok(()) => report.persisted = true,
            Err(e) => log::error!("Failed to persist history: {e}"),
        }
        log::info!(
            "{} new grades, {} notifications sent",
            report.new_grades,
            report.new_grades - report.failed_notifications
        );

        enter(CycleState::Idle);
        Ok(report)
    }

    /// Run one cycle, turning errors and panics into a logged outcome.
    pub(crate) fn supervised_cycle(&self) -> Result<CycleReport, CycleError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_cycle()))
            .unwrap_or_else(|payload| Err(CycleError::Panicked(panic_message(payload.as_ref()))));
        if let Err(e) = &outcome {
            log::error!("Cycle aborted: {e}");
        }
        outcome
    }

    pub(crate) fn run_forever(&self, interval: Duration) -> ! {
        loop {
            let _ = self.supervised_cycle();
            enter(CycleState::Sleeping);
            log::info!("Sleeping for {} seconds", interval.as_secs());
            std::thread::sleep(interval);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
