//! Core module - grade model, novelty detection, severity and history

mod dedup;
mod history;
mod severity;
mod types;

pub(crate) use dedup::detect_new;
pub(crate) use history::HistoryStore;
pub(crate) use severity::Thresholds;
pub(crate) use types::{GradeRecord, Severity};
