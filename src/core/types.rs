//! Grade data model
//!
//! A grade record is one (subject, date, grade) observation from the widget.
//! All three fields are kept as rendered text: the portal's date and grade
//! formats are inconsistent, so nothing is parsed here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GradeRecord {
    pub(crate) subject: String,
    pub(crate) date: String,
    pub(crate) grade: String,
}

impl GradeRecord {
    pub(crate) fn new(
        subject: impl Into<String>,
        date: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            date: date.into(),
            grade: grade.into(),
        }
    }

    /// Identity used for deduplication: each field trimmed, nothing else normalized.
    pub(crate) fn identity(&self) -> (&str, &str, &str) {
        (self.subject.trim(), self.date.trim(), self.grade.trim())
    }

    pub(crate) fn same_grade(&self, other: &GradeRecord) -> bool {
        self.identity() == other.identity()
    }
}

/// Notification styling level. Derived at notification time, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Pass,
    Borderline,
    Fail,
}

impl Severity {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Severity::Pass => "pass",
            Severity::Borderline => "borderline",
            Severity::Fail => "fail",
        }
    }
}
