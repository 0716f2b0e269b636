//! Single-slot persistence for the submitted record, plus the outbound
//! notification boundary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::domain::RegistrationRecord;

/// Fixed storage key addressing the one persisted record.
pub const STORAGE_KEY: &str = "formData";

/// Storage abstraction shared by the pipeline and the views. There is one
/// slot and one writer path; last writer wins with no merge.
pub trait FormStore: Send + Sync {
    /// Re-read the durable copy, refreshing the in-memory one. Called once
    /// at process start.
    fn load(&self) -> Result<Option<RegistrationRecord>, StoreError>;
    /// Overwrite the stored record durably.
    fn save(&self, record: &RegistrationRecord) -> Result<(), StoreError>;
    /// Synchronous snapshot of the in-memory copy.
    fn current(&self) -> Option<RegistrationRecord>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failure: {0}")]
    Io(#[from] io::Error),
    #[error("stored record is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// File-backed store keeping one JSON document under the fixed storage key.
pub struct JsonFileStore {
    path: PathBuf,
    current: Mutex<Option<RegistrationRecord>>,
}

impl JsonFileStore {
    /// Open the store rooted at `data_dir`, reading any previously saved
    /// record into memory.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)?;
        let store = Self {
            path: dir.join(format!("{STORAGE_KEY}.json")),
            current: Mutex::new(None),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FormStore for JsonFileStore {
    fn load(&self) -> Result<Option<RegistrationRecord>, StoreError> {
        let record = match fs::read(&self.path) {
            Ok(bytes) => Some(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => return Err(error.into()),
        };
        let mut guard = self.current.lock().expect("store mutex poisoned");
        guard.clone_from(&record);
        Ok(record)
    }

    fn save(&self, record: &RegistrationRecord) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(record)?;
        fs::write(&self.path, json)?;
        let mut guard = self.current.lock().expect("store mutex poisoned");
        *guard = Some(record.clone());
        Ok(())
    }

    fn current(&self) -> Option<RegistrationRecord> {
        self.current.lock().expect("store mutex poisoned").clone()
    }
}

/// Success notification emitted once persistence completes. Styling knobs
/// are fixed; failure notifications are not modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub duration_ms: u64,
    pub position: NotificationPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationPosition {
    TopCenter,
}

impl Notification {
    pub fn submission_success() -> Self {
        Self {
            message: "Registration submitted successfully!".to_string(),
            duration_ms: 3000,
            position: NotificationPosition::TopCenter,
        }
    }
}

/// Outbound notification hook (toast presenter, log line, test capture).
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification channel unavailable: {0}")]
    Channel(String),
}
