use crate::infra::{MemoryFormStore, MemoryNotificationSink};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use regform::error::AppError;
use regform::registration::{
    render, FormModel, FormStore, JsonFileStore, PhotoEncoder, PhotoUpload, RegistrationDraft,
    SubmissionError, SubmissionPipeline, SubmissionTiming,
};

/// 1x1 transparent PNG, small enough to inline in a terminal demo.
const DEMO_PHOTO_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";
const DEMO_PHOTO_BYTES: u64 = 85;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Persist the demo submission under this directory instead of memory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Keep the production delays (1.5s persist, 0.5s navigate)
    #[arg(long)]
    pub(crate) realistic: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let timing = if args.realistic {
        SubmissionTiming::default()
    } else {
        SubmissionTiming::instant()
    };

    match args.data_dir {
        Some(dir) => {
            println!("Registration intake demo (file-backed store: {})", dir.display());
            let store = Arc::new(JsonFileStore::open(dir)?);
            drive(store, timing).await
        }
        None => {
            println!("Registration intake demo (in-memory store)");
            let store = Arc::new(MemoryFormStore::default());
            drive(store, timing).await
        }
    }
}

async fn drive<S>(store: Arc<S>, timing: SubmissionTiming) -> Result<(), AppError>
where
    S: FormStore + 'static,
{
    let notifications = Arc::new(MemoryNotificationSink::default());
    let pipeline = SubmissionPipeline::with_timing(
        store.clone(),
        notifications.clone(),
        PhotoEncoder::default(),
        timing,
    );

    if let Some(previous) = store.current() {
        println!(
            "- Prior submission found for {}; the form would prefill from it",
            previous.full_name
        );
    }

    println!("\nSubmitting an empty draft to show field-level validation");
    match pipeline.submit(&RegistrationDraft::default()).await {
        Err(SubmissionError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                println!("  - {}: {}", field.key(), message);
            }
        }
        other => println!("  Unexpected outcome: {other:?}"),
    }

    println!("\nSubmitting a complete draft");
    let receipt = pipeline.submit(&demo_draft()).await?;
    println!(
        "- Submission reached phase {:?}; client navigates to {}",
        receipt.phase,
        receipt.next.path()
    );

    for notification in notifications.events() {
        println!(
            "- Notification: {} ({}ms, {:?})",
            notification.message, notification.duration_ms, notification.position
        );
    }

    let summary = render(store.current().as_ref());
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("\nSummary view payload:\n{json}"),
        Err(err) => println!("\nSummary view unavailable: {err}"),
    }

    Ok(())
}

fn demo_draft() -> RegistrationDraft {
    let file_name = "avatar.png";
    let content_type = mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    let mut model = FormModel::new();
    model.set_full_name("Ada Lovelace");
    model.set_email("ada@example.com");
    model.set_gender("female");
    model.set_birth_date("1985-12-10");
    model.set_years_of_experience("12");
    model.set_bio("Writes compilers by hand and forms by schema.");
    model.set_agreement(true);
    for skill in ["Rust", "Docker", "AWS"] {
        model.toggle_skill(skill);
    }
    model.attach_photo(PhotoUpload {
        file_name: file_name.to_string(),
        content_type,
        size_bytes: DEMO_PHOTO_BYTES,
        content_base64: DEMO_PHOTO_BASE64.to_string(),
    });

    model.into_draft()
}
