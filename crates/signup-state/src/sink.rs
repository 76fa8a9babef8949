//! # Submission Sinks
//!
//! Where an accepted sign-up goes. The orchestrator hands the exact
//! [`FormValues`] it validated to a [`SubmissionSink`]; what the sink does
//! with it is the sink's business.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use signup_core::FormValues;
use thiserror::Error;
use uuid::Uuid;

/// Errors from persisting a submission.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receives complete, schema-valid form records.
pub trait SubmissionSink: Send + Sync {
    fn submit(&self, values: &FormValues) -> Result<(), SinkError>;
}

/// A persisted sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSignup {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub values: FormValues,
}

/// Appends submissions to a JSON array on disk.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records stored so far. A missing or empty file holds none.
    pub fn records(&self) -> Result<Vec<StoredSignup>, SinkError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SinkError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl SubmissionSink for JsonFileSink {
    fn submit(&self, values: &FormValues) -> Result<(), SinkError> {
        let _guard = self.write_lock.lock();
        let mut records = self.records()?;
        let record = StoredSignup {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            values: values.clone(),
        };
        tracing::debug!(id = %record.id, path = %self.path.display(), "storing signup");
        records.push(record);
        let json = serde_json::to_vec_pretty(&records)?;
        std::fs::write(&self.path, json).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(first: &str) -> FormValues {
        FormValues {
            first_name: first.into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            ..FormValues::default()
        }
    }

    #[test]
    fn missing_file_has_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("users.json"));
        assert!(sink.records().unwrap().is_empty());
    }

    #[test]
    fn submissions_are_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("users.json"));
        sink.submit(&values("Grace")).unwrap();
        sink.submit(&values("Ada")).unwrap();

        let records = sink.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values, values("Grace"));
        assert_eq!(records[1].values.first_name, "Ada");
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn stored_values_use_form_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("users.json"));
        sink.submit(&values("Grace")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(sink.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["values"]["firstName"], "Grace");
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();
        let sink = JsonFileSink::new(&path);
        assert!(matches!(
            sink.submit(&values("Grace")),
            Err(SinkError::Serialization(_))
        ));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("missing-dir").join("users.json"));
        assert!(matches!(sink.submit(&values("Grace")), Err(SinkError::Io { .. })));
    }
}
