//! Grade severity classification
//!
//! Grades are normalized to a 20-point scale before comparison. Fractions such
//! as "14/20" or "7,5/10" are rescaled; bare numbers are taken as already on
//! the 20-point scale.

use crate::core::types::Severity;

/// Lower bounds (inclusive) on the 20-point scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Thresholds {
    pub(crate) pass: f64,
    pub(crate) borderline: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pass: 10.0,
            borderline: 8.0,
        }
    }
}

impl Thresholds {
    /// Unparseable grade text ("Abs", "N.Not", ...) classifies as `Pass`.
    /// Known quirk kept for compatibility with existing notifications.
    pub(crate) fn classify(&self, grade: &str) -> Severity {
        match normalize_score(grade) {
            Some(value) => self.classify_value(value),
            None => Severity::Pass,
        }
    }

    pub(crate) fn classify_value(&self, value: f64) -> Severity {
        if value >= self.pass {
            Severity::Pass
        } else if value >= self.borderline {
            Severity::Borderline
        } else {
            Severity::Fail
        }
    }
}

/// Classify with the default 10 / 8 thresholds.
#[cfg(test)]
pub(crate) fn classify(grade: &str) -> Severity {
    Thresholds::default().classify(grade)
}

/// Parse grade text into a value on the 20-point scale.
///
/// Returns `None` for non-numeric text or a zero denominator.
pub(crate) fn normalize_score(grade: &str) -> Option<f64> {
    let text = grade.replace(',', ".");

    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().ok()?;
            let denominator: f64 = denominator.trim().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            Some(numerator / denominator * 20.0)
        }
        None => text.trim().parse().ok(),
    }
}
