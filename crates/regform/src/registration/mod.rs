//! Registration intake: draft validation, the submission pipeline,
//! single-slot persistence, and the grouped summary views.

pub mod domain;
pub mod form;
pub mod photo;
pub mod pipeline;
pub mod router;
pub mod schema;
pub mod store;
pub mod summary;

pub use domain::{
    Gender, PhotoUpload, ProfilePhoto, RegistrationDraft, RegistrationRecord, Route,
};
pub use form::{ControlKind, FieldValue, FormModel, FormView, FORM_SECTIONS};
pub use photo::{EncodeError, EncodePolicy, PhotoEncoder};
pub use pipeline::{
    SubmissionError, SubmissionPhase, SubmissionPipeline, SubmissionReceipt, SubmissionTiming,
};
pub use router::registration_router;
pub use schema::{validate, Field, ValidationErrors};
pub use store::{
    FormStore, JsonFileStore, Notification, NotificationSink, NotifyError, StoreError,
    STORAGE_KEY,
};
pub use summary::{render, SummarySection, SummaryValue, SummaryView};
