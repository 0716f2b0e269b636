//! Core pipeline for the registration intake service: schema validation,
//! the submission state machine, single-slot persistence, and the grouped
//! summary views, together with the HTTP router exposing them.

pub mod config;
pub mod error;
pub mod registration;
pub mod telemetry;
