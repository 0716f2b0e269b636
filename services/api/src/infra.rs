use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

use regform::registration::{
    FormStore, Notification, NotificationSink, NotifyError, RegistrationRecord, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Volatile store for demos; the served process uses the file-backed store.
#[derive(Default)]
pub(crate) struct MemoryFormStore {
    record: Mutex<Option<RegistrationRecord>>,
}

impl FormStore for MemoryFormStore {
    fn load(&self) -> Result<Option<RegistrationRecord>, StoreError> {
        Ok(self.record.lock().expect("store mutex poisoned").clone())
    }

    fn save(&self, record: &RegistrationRecord) -> Result<(), StoreError> {
        let mut guard = self.record.lock().expect("store mutex poisoned");
        *guard = Some(record.clone());
        Ok(())
    }

    fn current(&self) -> Option<RegistrationRecord> {
        self.record.lock().expect("store mutex poisoned").clone()
    }
}

/// Notification sink for the served process: the toast boundary becomes a
/// structured log line.
#[derive(Default, Clone, Copy)]
pub(crate) struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            message = %notification.message,
            duration_ms = notification.duration_ms,
            "success notification emitted"
        );
        Ok(())
    }
}

/// Capturing sink so the demo can print what was emitted.
#[derive(Default, Clone)]
pub(crate) struct MemoryNotificationSink {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotificationSink {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}
