//! Integration specifications for the registration submission workflow.
//!
//! Scenarios drive the public pipeline facade and the HTTP router end to end
//! so validation, the photo transform, persistence, and the summary views
//! are exercised without reaching into private modules.

mod common {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use regform::registration::{
        EncodePolicy, FormStore, Notification, NotificationSink, NotifyError, PhotoEncoder,
        PhotoUpload, RegistrationDraft, RegistrationRecord, StoreError, SubmissionPipeline,
        SubmissionTiming,
    };

    pub(super) const PNG_PAYLOAD: &str = "aGVsbG8=";

    pub(super) fn photo_upload() -> PhotoUpload {
        PhotoUpload {
            file_name: "avatar.png".to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 6,
            content_base64: PNG_PAYLOAD.to_string(),
        }
    }

    pub(super) fn draft() -> RegistrationDraft {
        RegistrationDraft {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            gender: "female".to_string(),
            birth_date: "2000-01-01".to_string(),
            profile_photo: vec![photo_upload()],
            years_of_experience: "7".to_string(),
            skills: vec!["Rust".to_string(), "Go".to_string()],
            bio: "Analytical engines and flyers".to_string(),
            agree_to_terms: true,
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryStore {
        record: Mutex<Option<RegistrationRecord>>,
        saves: AtomicUsize,
    }

    impl MemoryStore {
        pub(super) fn saves(&self) -> usize {
            self.saves.load(Ordering::Relaxed)
        }
    }

    impl FormStore for MemoryStore {
        fn load(&self) -> Result<Option<RegistrationRecord>, StoreError> {
            Ok(self.record.lock().expect("lock").clone())
        }

        fn save(&self, record: &RegistrationRecord) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::Relaxed);
            *self.record.lock().expect("lock") = Some(record.clone());
            Ok(())
        }

        fn current(&self) -> Option<RegistrationRecord> {
            self.record.lock().expect("lock").clone()
        }
    }

    /// Store whose writes always fail, standing in for exhausted storage.
    #[derive(Default)]
    pub(super) struct BrokenStore;

    impl FormStore for BrokenStore {
        fn load(&self) -> Result<Option<RegistrationRecord>, StoreError> {
            Ok(None)
        }

        fn save(&self, _record: &RegistrationRecord) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }

        fn current(&self) -> Option<RegistrationRecord> {
            None
        }
    }

    #[derive(Default)]
    pub(super) struct MemorySink {
        events: Mutex<Vec<Notification>>,
    }

    impl MemorySink {
        pub(super) fn events(&self) -> Vec<Notification> {
            self.events.lock().expect("lock").clone()
        }
    }

    impl NotificationSink for MemorySink {
        fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
            self.events.lock().expect("lock").push(notification);
            Ok(())
        }
    }

    pub(super) fn build_pipeline() -> (
        Arc<SubmissionPipeline<MemoryStore, MemorySink>>,
        Arc<MemoryStore>,
        Arc<MemorySink>,
    ) {
        build_pipeline_with(EncodePolicy::Degrade, SubmissionTiming::instant())
    }

    pub(super) fn build_pipeline_with(
        policy: EncodePolicy,
        timing: SubmissionTiming,
    ) -> (
        Arc<SubmissionPipeline<MemoryStore, MemorySink>>,
        Arc<MemoryStore>,
        Arc<MemorySink>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let sink = Arc::new(MemorySink::default());
        let pipeline = Arc::new(SubmissionPipeline::with_timing(
            store.clone(),
            sink.clone(),
            PhotoEncoder::new(policy),
            timing,
        ));
        (pipeline, store, sink)
    }
}

mod validation {
    use super::common::*;
    use regform::registration::{validate, Field, RegistrationDraft};

    #[test]
    fn each_missing_required_field_is_reported_alone() {
        let cases: Vec<(Field, Box<dyn Fn(&mut RegistrationDraft)>)> = vec![
            (Field::FullName, Box::new(|d| d.full_name.clear())),
            (Field::Email, Box::new(|d| d.email.clear())),
            (Field::Gender, Box::new(|d| d.gender.clear())),
            (Field::BirthDate, Box::new(|d| d.birth_date.clear())),
            (Field::ProfilePhoto, Box::new(|d| d.profile_photo.clear())),
            (
                Field::YearsOfExperience,
                Box::new(|d| d.years_of_experience.clear()),
            ),
            (Field::Skills, Box::new(|d| d.skills.clear())),
            (Field::AgreeToTerms, Box::new(|d| d.agree_to_terms = false)),
        ];

        for (field, clear) in cases {
            let mut candidate = draft();
            clear(&mut candidate);
            let errors = validate(&candidate).expect_err("missing field rejected");
            assert_eq!(errors.len(), 1, "{field:?} should be the only error");
            assert!(errors.message(field).is_some(), "{field:?} reported");
        }
    }

    #[test]
    fn valid_draft_passes_whole_schema() {
        let record = validate(&draft()).expect("draft validates");
        assert_eq!(record.skills, vec!["Rust", "Go"]);
        assert_eq!(record.bio.as_deref(), Some("Analytical engines and flyers"));
    }
}

mod pipeline {
    use super::common::*;
    use regform::registration::{
        EncodePolicy, FormStore, ProfilePhoto, SubmissionError, SubmissionPhase, SubmissionTiming,
    };
    use std::time::Duration;

    #[tokio::test]
    async fn valid_submission_reaches_done_with_encoded_photo() {
        let (pipeline, store, sink) = build_pipeline();

        let receipt = pipeline.submit(&draft()).await.expect("submission succeeds");
        assert_eq!(receipt.phase, SubmissionPhase::Done);
        assert_eq!(receipt.next.path(), "/result");
        assert_eq!(
            receipt.record.profile_photo,
            ProfilePhoto::Encoded {
                data_uri: format!("data:image/png;base64,{PNG_PAYLOAD}")
            }
        );

        let stored = store.current().expect("record persisted");
        assert_eq!(stored, receipt.record);
        assert_eq!(store.saves(), 1);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Registration submitted successfully!");
        assert!(!pipeline.is_in_flight());
    }

    #[tokio::test]
    async fn validation_failure_persists_nothing() {
        let (pipeline, store, sink) = build_pipeline();
        let mut bad = draft();
        bad.agree_to_terms = false;

        match pipeline.submit(&bad).await {
            Err(SubmissionError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(store.saves(), 0);
        assert!(sink.events().is_empty());
        assert!(!pipeline.is_in_flight());
    }

    #[tokio::test]
    async fn corrupt_payload_degrades_to_attachment_by_default() {
        let (pipeline, store, _) = build_pipeline();
        let mut degraded = draft();
        degraded.profile_photo[0].content_base64 = "%%%".to_string();

        pipeline.submit(&degraded).await.expect("degrade proceeds");
        let stored = store.current().expect("record persisted");
        assert!(matches!(
            stored.profile_photo,
            ProfilePhoto::Attachment { .. }
        ));
    }

    #[tokio::test]
    async fn fail_policy_aborts_before_persisting() {
        let (pipeline, store, sink) =
            build_pipeline_with(EncodePolicy::Fail, SubmissionTiming::instant());
        let mut corrupt = draft();
        corrupt.profile_photo[0].content_base64 = "%%%".to_string();

        match pipeline.submit(&corrupt).await {
            Err(SubmissionError::Encode(_)) => {}
            other => panic!("expected encode failure, got {other:?}"),
        }
        assert_eq!(store.saves(), 0);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_fatal_and_surfaced() {
        let store = std::sync::Arc::new(BrokenStore);
        let sink = std::sync::Arc::new(MemorySink::default());
        let pipeline = regform::registration::SubmissionPipeline::with_timing(
            store,
            sink.clone(),
            regform::registration::PhotoEncoder::default(),
            SubmissionTiming::instant(),
        );

        match pipeline.submit(&draft()).await {
            Err(SubmissionError::Store(error)) => {
                assert!(error.to_string().contains("quota exceeded"));
            }
            other => panic!("expected storage failure, got {other:?}"),
        }
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn concurrent_submissions_collapse_to_one_write() {
        let (pipeline, store, sink) = build_pipeline_with(
            EncodePolicy::Degrade,
            SubmissionTiming {
                persist_latency: Duration::from_millis(50),
                navigate_delay: Duration::ZERO,
            },
        );
        let candidate = draft();

        let (first, second) =
            tokio::join!(pipeline.submit(&candidate), pipeline.submit(&candidate));

        let outcomes = [first, second];
        let completed = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        let rejected = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Err(SubmissionError::InFlight)))
            .count();

        assert_eq!(completed, 1, "exactly one submission persists");
        assert_eq!(rejected, 1, "the overlapping submission is refused");
        assert_eq!(store.saves(), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test]
    async fn resubmitting_after_completion_overwrites_the_slot() {
        let (pipeline, store, _) = build_pipeline();

        pipeline.submit(&draft()).await.expect("first submission");
        let mut updated = draft();
        updated.full_name = "Grace Hopper".to_string();
        pipeline.submit(&updated).await.expect("second submission");

        assert_eq!(store.saves(), 2);
        assert_eq!(
            store.current().map(|record| record.full_name),
            Some("Grace Hopper".to_string())
        );
    }
}

mod summary {
    use super::common::*;
    use regform::registration::{render, FormStore, SummaryView};

    #[tokio::test]
    async fn summary_shows_three_sections_after_submission() {
        let (pipeline, store, _) = build_pipeline();
        pipeline.submit(&draft()).await.expect("submission succeeds");

        let view = render(store.current().as_ref());
        let SummaryView::Ready { sections, .. } = view else {
            panic!("expected ready summary");
        };
        assert_eq!(sections.len(), 3);
    }

    #[test]
    fn summary_without_a_record_is_the_empty_state() {
        let (_, store, _) = build_pipeline();
        assert!(matches!(
            render(store.current().as_ref()),
            SummaryView::Empty { .. }
        ));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use regform::registration::registration_router;

    fn build_router() -> axum::Router {
        let (pipeline, _, _) = build_pipeline();
        registration_router(pipeline)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn post_registration_returns_receipt_with_redirect() {
        let router = build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/registration")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&draft()).expect("serialize draft"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        assert_eq!(payload["phase"], "done");
        assert_eq!(payload["next"], "/result");
        assert_eq!(payload["record"]["profilePhoto"]["kind"], "encoded");
    }

    #[tokio::test]
    async fn invalid_draft_maps_to_unprocessable_entity() {
        let router = build_router();
        let mut bad = draft();
        bad.full_name = "Al".to_string();
        bad.skills.clear();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/registration")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&bad).expect("serialize")))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let payload = json_body(response).await;
        assert_eq!(
            payload["errors"]["fullName"],
            "Full name must be at least 3 characters"
        );
        assert_eq!(payload["errors"]["skills"], "Select at least one skill");
        assert!(payload["errors"].get("email").is_none());
    }

    #[tokio::test]
    async fn summary_endpoint_reports_empty_until_a_submission_lands() {
        let (pipeline, _, _) = build_pipeline();
        let router = registration_router(pipeline.clone());

        let empty = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/registration/summary")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(json_body(empty).await["state"], "empty");

        pipeline.submit(&draft()).await.expect("submission succeeds");

        let ready = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/registration/summary")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let payload = json_body(ready).await;
        assert_eq!(payload["state"], "ready");
        assert_eq!(
            payload["sections"]
                .as_array()
                .map(|sections| sections.len()),
            Some(3)
        );
    }

    #[tokio::test]
    async fn form_endpoint_prefills_from_the_stored_record() {
        let (pipeline, _, _) = build_pipeline();
        let router = registration_router(pipeline.clone());
        pipeline.submit(&draft()).await.expect("submission succeeds");

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/registration/form")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        let sections = payload["sections"].as_array().expect("sections");
        assert_eq!(sections.len(), 3);

        let personal = sections[0]["fields"].as_array().expect("fields");
        assert_eq!(personal[0]["name"], "fullName");
        assert_eq!(personal[0]["value"], "Ada Lovelace");
        // The file control cannot be refilled from storage.
        assert_eq!(personal[4]["value"], serde_json::json!([]));
    }
}
