//! HTTP endpoints exposing the form, submission, and summary views.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::RegistrationDraft;
use super::form::FormModel;
use super::pipeline::{SubmissionError, SubmissionPhase, SubmissionPipeline};
use super::store::{FormStore, NotificationSink};
use super::summary;

/// Router builder for the registration endpoints.
pub fn registration_router<S, N>(pipeline: Arc<SubmissionPipeline<S, N>>) -> Router
where
    S: FormStore + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/registration/form", get(form_view_handler::<S, N>))
        .route("/api/v1/registration", post(submit_handler::<S, N>))
        .route(
            "/api/v1/registration/summary",
            get(summary_handler::<S, N>),
        )
        .with_state(pipeline)
}

pub(crate) async fn form_view_handler<S, N>(
    State(pipeline): State<Arc<SubmissionPipeline<S, N>>>,
) -> Response
where
    S: FormStore + 'static,
    N: NotificationSink + 'static,
{
    let model = match pipeline.store().current() {
        Some(record) => FormModel::prefilled(&record),
        None => FormModel::new(),
    };
    (StatusCode::OK, Json(model.view())).into_response()
}

pub(crate) async fn submit_handler<S, N>(
    State(pipeline): State<Arc<SubmissionPipeline<S, N>>>,
    Json(draft): Json<RegistrationDraft>,
) -> Response
where
    S: FormStore + 'static,
    N: NotificationSink + 'static,
{
    match pipeline.submit(&draft).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(SubmissionError::Validation(errors)) => {
            let payload = json!({
                "phase": SubmissionPhase::Validating,
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(error @ SubmissionError::InFlight) => {
            let payload = json!({ "phase": error.phase(), "error": error.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(error @ SubmissionError::Encode(_)) => {
            let payload = json!({ "phase": error.phase(), "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "phase": other.phase(), "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn summary_handler<S, N>(
    State(pipeline): State<Arc<SubmissionPipeline<S, N>>>,
) -> Response
where
    S: FormStore + 'static,
    N: NotificationSink + 'static,
{
    let current = pipeline.store().current();
    (StatusCode::OK, Json(summary::render(current.as_ref()))).into_response()
}
