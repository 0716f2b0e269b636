use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gender options offered by the form's single-choice control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Wire value matching the serde representation.
    pub const fn value(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// One entry of the file-list-like upload control. Size and content type are
/// the client-declared values, which is all a browser file list exposes
/// before the payload is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Base64 payload; may be empty when the client did not inline the bytes.
    #[serde(default)]
    pub content_base64: String,
}

/// Photo representation carried by the record. The shape differs before and
/// after the encode transform: validation produces the raw `Attachment`
/// reference, a successful transform upgrades it to `Encoded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfilePhoto {
    Unset,
    Attachment {
        file_name: String,
        content_type: String,
        size_bytes: u64,
    },
    Encoded {
        data_uri: String,
    },
}

impl ProfilePhoto {
    /// Payload-free reference to an upload. Raw byte buffers never reach the
    /// store, since they are not guaranteed to survive storage and reload.
    pub fn attachment_from(upload: &PhotoUpload) -> Self {
        ProfilePhoto::Attachment {
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size_bytes: upload.size_bytes,
        }
    }
}

/// Candidate record exactly as the form controls deliver it. Scalar fields
/// stay strings so validation can report type errors per field instead of
/// failing wholesale at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub birth_date: String,
    pub profile_photo: Vec<PhotoUpload>,
    pub years_of_experience: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub agree_to_terms: bool,
}

/// Fully validated registration. Only the submission pipeline constructs and
/// persists one; every other component receives read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub full_name: String,
    pub email: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub profile_photo: ProfilePhoto,
    pub years_of_experience: u8,
    /// Display order matches selection order.
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub agree_to_terms: bool,
}

/// Addressable client views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Form,
    Summary,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Route::Form => "/",
            Route::Summary => "/result",
        }
    }
}

impl Serialize for Route {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.path())
    }
}
