//! Conversion of uploaded photos into persistable data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::warn;

use super::domain::{PhotoUpload, ProfilePhoto};

/// Behavior when an upload cannot be encoded. A named policy rather than an
/// implicit catch-and-continue, so the degraded path is always deliberate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodePolicy {
    /// Log the failure and fall back to the raw attachment reference.
    #[default]
    Degrade,
    /// Abort the submission.
    Fail,
}

impl EncodePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "degrade" => Some(EncodePolicy::Degrade),
            "fail" => Some(EncodePolicy::Fail),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EncodePolicy::Degrade => "degrade",
            EncodePolicy::Fail => "fail",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("upload carries no payload")]
    MissingPayload,
    #[error("payload is not valid base64: {0}")]
    Payload(#[from] base64::DecodeError),
    #[error("content type '{value}' is not a valid MIME type")]
    ContentType { value: String },
}

/// Encodes uploads into the persisted photo shape under the configured
/// failure policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder {
    policy: EncodePolicy,
}

impl PhotoEncoder {
    pub const fn new(policy: EncodePolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> EncodePolicy {
        self.policy
    }

    /// Produce the persistable representation for an upload. Under the
    /// degrade policy an encode failure keeps the raw attachment reference
    /// instead of blocking the submission.
    pub fn encode(&self, upload: &PhotoUpload) -> Result<ProfilePhoto, EncodeError> {
        match data_uri(upload) {
            Ok(data_uri) => Ok(ProfilePhoto::Encoded { data_uri }),
            Err(error) => match self.policy {
                EncodePolicy::Degrade => {
                    warn!(
                        file = %upload.file_name,
                        %error,
                        "photo encode failed, keeping raw attachment reference"
                    );
                    Ok(ProfilePhoto::attachment_from(upload))
                }
                EncodePolicy::Fail => Err(error),
            },
        }
    }
}

fn data_uri(upload: &PhotoUpload) -> Result<String, EncodeError> {
    let parsed: mime::Mime =
        upload
            .content_type
            .trim()
            .parse()
            .map_err(|_| EncodeError::ContentType {
                value: upload.content_type.clone(),
            })?;

    // Clients sometimes hand back a full data URL; keep only the payload.
    let payload = match upload.content_base64.rsplit_once(',') {
        Some((_, payload)) => payload.trim(),
        None => upload.content_base64.trim(),
    };
    if payload.is_empty() {
        return Err(EncodeError::MissingPayload);
    }

    let bytes = STANDARD.decode(payload)?;
    Ok(format!(
        "data:{};base64,{}",
        parsed.essence_str(),
        STANDARD.encode(bytes)
    ))
}

/// Preview side channel for the form: same encoding as the transform, but a
/// failure simply yields no preview.
pub(crate) fn preview_data_uri(upload: &PhotoUpload) -> Option<String> {
    data_uri(upload).ok()
}
