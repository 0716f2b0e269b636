//! Submission pipeline: validation, the photo transform, and simulated
//! persistence, serialized by a single-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::domain::{RegistrationDraft, RegistrationRecord, Route};
use super::photo::{EncodeError, PhotoEncoder};
use super::schema::{self, ValidationErrors};
use super::store::{FormStore, Notification, NotificationSink, NotifyError, StoreError};

/// Phases a submission moves through. Validation failures return the form to
/// its editable state; `Failed` is reachable only from the transform (fail
/// policy) and persist steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Transforming,
    Persisting,
    Done,
    Failed,
}

/// Fixed delays for the simulated persistence round-trip and the pause that
/// lets the success notification become visible before navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTiming {
    pub persist_latency: Duration,
    pub navigate_delay: Duration,
}

impl Default for SubmissionTiming {
    fn default() -> Self {
        Self {
            persist_latency: Duration::from_millis(1500),
            navigate_delay: Duration::from_millis(500),
        }
    }
}

impl SubmissionTiming {
    /// Zero delays for tests and demos.
    pub const fn instant() -> Self {
        Self {
            persist_latency: Duration::ZERO,
            navigate_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("a submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("photo encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl SubmissionError {
    /// Phase the pipeline was in when the error surfaced.
    pub const fn phase(&self) -> SubmissionPhase {
        match self {
            SubmissionError::InFlight => SubmissionPhase::Idle,
            SubmissionError::Validation(_) => SubmissionPhase::Validating,
            SubmissionError::Encode(_) => SubmissionPhase::Transforming,
            SubmissionError::Store(_) | SubmissionError::Notify(_) => SubmissionPhase::Persisting,
        }
    }
}

/// Outcome of a completed submission: the record as persisted and the view
/// the client should navigate to next.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub record: RegistrationRecord,
    pub phase: SubmissionPhase,
    pub next: Route,
}

/// Orchestrates the submission phases. Generic over the store and the
/// notification sink so the pipeline can be exercised fully in memory.
pub struct SubmissionPipeline<S, N> {
    store: Arc<S>,
    notifications: Arc<N>,
    encoder: PhotoEncoder,
    timing: SubmissionTiming,
    in_flight: AtomicBool,
}

impl<S, N> SubmissionPipeline<S, N>
where
    S: FormStore + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(store: Arc<S>, notifications: Arc<N>, encoder: PhotoEncoder) -> Self {
        Self::with_timing(store, notifications, encoder, SubmissionTiming::default())
    }

    pub fn with_timing(
        store: Arc<S>,
        notifications: Arc<N>,
        encoder: PhotoEncoder,
        timing: SubmissionTiming,
    ) -> Self {
        Self {
            store,
            notifications,
            encoder,
            timing,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a submission currently holds the single-flight guard; the
    /// submit control stays disabled while this is true.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run a draft through Validating -> Transforming -> Persisting -> Done.
    /// At most one submission is in flight at a time; a concurrent call
    /// returns `InFlight` without touching the store.
    pub async fn submit(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(SubmissionError::InFlight);
        }
        let outcome = self.run(draft).await;
        self.in_flight.store(false, Ordering::Release);
        outcome
    }

    async fn run(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        // Validating. A failure leaves the form editable and nothing persisted.
        let mut record = schema::validate(draft)?;

        // Transforming. The raw reference becomes the encoded shape; the
        // degrade policy resolves failures inside the encoder.
        if let Some(upload) = draft.profile_photo.first() {
            record.profile_photo = self.encoder.encode(upload)?;
        }

        // Persisting. Storage failures are fatal and surfaced, never swallowed.
        tokio::time::sleep(self.timing.persist_latency).await;
        self.store.save(&record)?;

        self.notifications.publish(Notification::submission_success())?;
        info!("registration persisted");

        // Let the notification become visible before navigating away.
        tokio::time::sleep(self.timing.navigate_delay).await;

        Ok(SubmissionReceipt {
            record,
            phase: SubmissionPhase::Done,
            next: Route::Summary,
        })
    }
}
