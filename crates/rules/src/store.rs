//! JSON-file observation store.
//!
//! Holds `variable -> (value, recorded_at)` across evaluation cycles. Every
//! [`set`](ObservationStore::set) re-reads the file, merges the new key and
//! rewrites the whole document, so values written by another process between
//! cycles are kept.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::snapshot::Timestamp;

/// A captured value and the instant it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedValue {
    /// Milli-units.
    pub value: i64,
    pub recorded_at: Timestamp,
}

type Document = BTreeMap<String, ObservedValue>;

/// Failures reading or persisting the observation file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read observations from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse observations in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to persist observations to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode observations for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Observation store backed by a single JSON file.
#[derive(Debug)]
pub struct ObservationStore {
    path: PathBuf,
    values: Mutex<HashMap<String, ObservedValue>>,
}

impl ObservationStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store, and missing parent directories
    /// are created. An unreadable or corrupt file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let values = match read_document(&path)? {
            Some(doc) => {
                info!(path = %path.display(), count = doc.len(), "loaded observations");
                doc.into_iter().collect()
            }
            None => {
                debug!(path = %path.display(), "no observation file yet; starting empty");
                HashMap::new()
            }
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<ObservedValue> {
        self.lock().get(name).copied()
    }

    /// Record `value` under `name` and persist the whole document.
    ///
    /// The in-memory map is only replaced once the file write succeeds.
    pub fn set(&self, name: &str, value: ObservedValue) -> Result<(), StoreError> {
        let mut values = self.lock();

        let mut doc: Document = match read_document(&self.path)? {
            Some(doc) => doc,
            None => values.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        };
        doc.insert(name.to_string(), value);

        let encoded = serde_json::to_string_pretty(&doc).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, encoded).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(variable = name, value = value.value, "observation persisted");
        *values = doc.into_iter().collect();
        Ok(())
    }

    /// Current `variable -> value` map, as used for `Snapshot::vars`.
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.lock()
            .iter()
            .map(|(name, observed)| (name.clone(), observed.value))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ObservedValue>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `Ok(None)` when the file does not exist.
fn read_document(path: &Path) -> Result<Option<Document>, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if raw.trim().is_empty() {
        return Ok(Some(Document::new()));
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
