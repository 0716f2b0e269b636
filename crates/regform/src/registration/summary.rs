//! Read-only grouped summary of the persisted record.

use serde::Serialize;

use super::domain::{ProfilePhoto, RegistrationRecord, Route};

/// Summary of the persisted record, or the empty state when nothing has
/// been submitted yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryView {
    Empty {
        heading: &'static str,
        message: &'static str,
        action_label: &'static str,
        action: Route,
    },
    Ready {
        heading: &'static str,
        message: &'static str,
        sections: Vec<SummarySection>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySection {
    pub title: &'static str,
    pub fields: Vec<SummaryField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryField {
    pub label: &'static str,
    pub value: SummaryValue,
}

/// Rendered value shapes. The photo renders distinctly depending on whether
/// the record carries the encoded data URI or the raw attachment reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SummaryValue {
    Text { text: String },
    List { items: Vec<String> },
    Attachment { file_name: String },
    InlineImage { data_uri: String },
}

/// Group the record into the three summary sections. Fields without a
/// present, non-empty value are omitted entirely, never rendered blank; a
/// section left with no fields is dropped the same way.
pub fn render(record: Option<&RegistrationRecord>) -> SummaryView {
    let Some(record) = record else {
        return SummaryView::Empty {
            heading: "No Data Found",
            message: "Please fill out the registration form first",
            action_label: "Go to Form",
            action: Route::Form,
        };
    };

    let mut sections = Vec::new();

    let mut personal = Vec::new();
    push_text(&mut personal, "Full Name", &record.full_name);
    push_text(&mut personal, "Email Address", &record.email);
    push_text(&mut personal, "Gender", record.gender.label());
    push_text(
        &mut personal,
        "Birth Date",
        &record.birth_date.format("%Y-%m-%d").to_string(),
    );
    if let Some(value) = photo_value(&record.profile_photo) {
        personal.push(SummaryField {
            label: "Profile Photo",
            value,
        });
    }
    push_section(&mut sections, "Personal Information", personal);

    let mut professional = Vec::new();
    push_text(
        &mut professional,
        "Years of Experience",
        &record.years_of_experience.to_string(),
    );
    if !record.skills.is_empty() {
        professional.push(SummaryField {
            label: "Skills",
            value: SummaryValue::List {
                items: record.skills.clone(),
            },
        });
    }
    push_section(&mut sections, "Professional Info", professional);

    let mut additional = Vec::new();
    if let Some(bio) = record.bio.as_deref() {
        push_text(&mut additional, "Bio", bio);
    }
    let terms = if record.agree_to_terms {
        "\u{2713} Agreed"
    } else {
        "\u{2717} Not Agreed"
    };
    push_text(&mut additional, "Agree To Terms", terms);
    push_section(&mut sections, "Additional Information", additional);

    SummaryView::Ready {
        heading: "Registration Complete",
        message: "Your information has been successfully submitted",
        sections,
    }
}

fn push_text(fields: &mut Vec<SummaryField>, label: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        fields.push(SummaryField {
            label,
            value: SummaryValue::Text {
                text: value.to_string(),
            },
        });
    }
}

fn push_section(
    sections: &mut Vec<SummarySection>,
    title: &'static str,
    fields: Vec<SummaryField>,
) {
    if !fields.is_empty() {
        sections.push(SummarySection { title, fields });
    }
}

fn photo_value(photo: &ProfilePhoto) -> Option<SummaryValue> {
    match photo {
        ProfilePhoto::Unset => None,
        ProfilePhoto::Attachment { file_name, .. } => Some(SummaryValue::Attachment {
            file_name: file_name.clone(),
        }),
        ProfilePhoto::Encoded { data_uri } => Some(SummaryValue::InlineImage {
            data_uri: data_uri.clone(),
        }),
    }
}
