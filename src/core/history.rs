//! Persisted grade history
//!
//! A flat JSON array of grade records, oldest first. The in-memory sequence is
//! the source of truth and is rewritten whole on every save.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::core::types::GradeRecord;
use crate::error::PersistError;

pub(crate) struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the persisted history. Missing or unparseable files load as empty.
    pub(crate) fn load(&self) -> Vec<GradeRecord> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "History file {} is unreadable ({e}), starting from empty history",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    pub(crate) fn save(&self, records: &[GradeRecord]) -> Result<(), PersistError> {
        let io_err = |source| PersistError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut ser)?;
        fs::write(&self.path, buf).map_err(io_err)
    }
}
