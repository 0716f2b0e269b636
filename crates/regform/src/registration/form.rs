//! Binding layer between raw control values and the registration draft.
//!
//! The catalog below is static data describing every control the form
//! renders, grouped into its three sections; `FormModel` carries the
//! mutable draft, bound errors, and the photo preview side channel.

use serde::Serialize;

use super::domain::{PhotoUpload, RegistrationDraft, RegistrationRecord};
use super::photo;
use super::schema::{Field, ValidationErrors};

/// Accept filter advertised by the file control.
pub const PHOTO_ACCEPT: &str = "image/*";
/// Size hint shown beside the drop zone; must agree with the validator's
/// 5,000,000-byte limit.
pub const PHOTO_SIZE_HINT: &str = "up to 5MB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const GENDER_OPTIONS: [SelectOption; 3] = [
    SelectOption { value: "male", label: "Male" },
    SelectOption { value: "female", label: "Female" },
    SelectOption { value: "other", label: "Other" },
];

pub const SKILL_OPTIONS: [SelectOption; 12] = [
    SelectOption { value: "React", label: "React" },
    SelectOption { value: "TypeScript", label: "TypeScript" },
    SelectOption { value: "Node.js", label: "Node.js" },
    SelectOption { value: "Python", label: "Python" },
    SelectOption { value: "Java", label: "Java" },
    SelectOption { value: "Go", label: "Go" },
    SelectOption { value: "Rust", label: "Rust" },
    SelectOption { value: "Vue.js", label: "Vue.js" },
    SelectOption { value: "Angular", label: "Angular" },
    SelectOption { value: "Docker", label: "Docker" },
    SelectOption { value: "Kubernetes", label: "Kubernetes" },
    SelectOption { value: "AWS", label: "AWS" },
];

/// Control variant rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Text,
    Email,
    Number,
    Date,
    Select,
    MultiSelect,
    TextArea,
    FileDrop,
    Checkbox,
}

/// Static descriptor for one form control.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldDescriptor {
    pub field: Field,
    pub label: &'static str,
    pub control: ControlKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [SelectOption],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl FieldDescriptor {
    const fn new(field: Field, label: &'static str, control: ControlKind) -> Self {
        Self {
            field,
            label,
            control,
            required: true,
            placeholder: None,
            options: &[],
            accept: None,
            hint: None,
        }
    }

    const fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    const fn with_options(mut self, options: &'static [SelectOption]) -> Self {
        self.options = options;
        self
    }

    const fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    const fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// One titled step of the form layout.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormSection {
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
}

const PERSONAL_FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor::new(Field::FullName, "Full Name", ControlKind::Text)
        .placeholder("Enter your full name"),
    FieldDescriptor::new(Field::Email, "Email Address", ControlKind::Email)
        .placeholder("your.email@example.com"),
    FieldDescriptor::new(Field::Gender, "Gender", ControlKind::Select)
        .with_options(&GENDER_OPTIONS),
    FieldDescriptor::new(Field::BirthDate, "Birth Date", ControlKind::Date),
    FieldDescriptor::new(Field::ProfilePhoto, "Profile Photo", ControlKind::FileDrop)
        .with_accept(PHOTO_ACCEPT)
        .with_hint(PHOTO_SIZE_HINT),
];

const PROFESSIONAL_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::new(
        Field::YearsOfExperience,
        "Years of Experience",
        ControlKind::Number,
    )
    .placeholder("0"),
    FieldDescriptor::new(Field::Skills, "Skills", ControlKind::MultiSelect)
        .with_options(&SKILL_OPTIONS)
        .placeholder("Select skills..."),
];

const ADDITIONAL_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::new(Field::Bio, "Bio", ControlKind::TextArea)
        .optional()
        .placeholder("Tell us a bit about yourself..."),
    FieldDescriptor::new(
        Field::AgreeToTerms,
        "I agree to the terms and conditions",
        ControlKind::Checkbox,
    ),
];

pub const FORM_SECTIONS: [FormSection; 3] = [
    FormSection {
        title: "Personal Information",
        fields: &PERSONAL_FIELDS,
    },
    FormSection {
        title: "Professional Info",
        fields: &PROFESSIONAL_FIELDS,
    },
    FormSection {
        title: "Additional Information",
        fields: &ADDITIONAL_FIELDS,
    },
];

/// Current value bound to a control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
    Selections(Vec<String>),
    Files(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub control: ControlKind,
    pub required: bool,
    pub value: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [SelectOption],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSectionView {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

/// Renderable form state: sections of bound controls plus the photo preview.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub sections: Vec<FormSectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_preview: Option<String>,
}

/// Mutable form state: the working draft, bound errors, and the preview
/// side channel. The preview never reaches the draft or the persisted
/// record.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    draft: RegistrationDraft,
    errors: ValidationErrors,
    preview: Option<String>,
}

impl FormModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a previously persisted record. The file control cannot
    /// be refilled from storage, so the photo starts unset.
    pub fn prefilled(record: &RegistrationRecord) -> Self {
        Self {
            draft: RegistrationDraft {
                full_name: record.full_name.clone(),
                email: record.email.clone(),
                gender: record.gender.value().to_string(),
                birth_date: record.birth_date.format("%Y-%m-%d").to_string(),
                profile_photo: Vec::new(),
                years_of_experience: record.years_of_experience.to_string(),
                skills: record.skills.clone(),
                bio: record.bio.clone().unwrap_or_default(),
                agree_to_terms: record.agree_to_terms,
            },
            errors: ValidationErrors::default(),
            preview: None,
        }
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn into_draft(self) -> RegistrationDraft {
        self.draft
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn set_full_name(&mut self, value: &str) {
        self.draft.full_name = value.to_string();
    }

    pub fn set_email(&mut self, value: &str) {
        self.draft.email = value.to_string();
    }

    pub fn set_gender(&mut self, value: &str) {
        self.draft.gender = value.to_string();
    }

    pub fn set_birth_date(&mut self, value: &str) {
        self.draft.birth_date = value.to_string();
    }

    pub fn set_years_of_experience(&mut self, value: &str) {
        self.draft.years_of_experience = value.to_string();
    }

    pub fn set_bio(&mut self, value: &str) {
        self.draft.bio = value.to_string();
    }

    pub fn set_agreement(&mut self, agreed: bool) {
        self.draft.agree_to_terms = agreed;
    }

    /// Select the skill if absent, deselect it if present. The chip list is
    /// the selection vector itself, so both stay synchronized by
    /// construction.
    pub fn toggle_skill(&mut self, skill: &str) {
        if self.draft.skills.iter().any(|selected| selected == skill) {
            self.remove_skill(skill);
        } else {
            self.draft.skills.push(skill.to_string());
        }
    }

    /// Chip removal control.
    pub fn remove_skill(&mut self, skill: &str) {
        self.draft.skills.retain(|selected| selected != skill);
    }

    /// Attach an upload with single-file semantics: a new file always
    /// supersedes the previous one. Also derives the preview side channel.
    pub fn attach_photo(&mut self, upload: PhotoUpload) {
        self.preview = photo::preview_data_uri(&upload);
        self.draft.profile_photo = vec![upload];
    }

    pub fn clear_photo(&mut self) {
        self.draft.profile_photo.clear();
        self.preview = None;
    }

    /// Bind per-field errors produced by validation.
    pub fn apply_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors = ValidationErrors::default();
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Render the per-section, per-field view model.
    pub fn view(&self) -> FormView {
        let sections = FORM_SECTIONS
            .iter()
            .map(|section| FormSectionView {
                title: section.title,
                fields: section
                    .fields
                    .iter()
                    .map(|descriptor| self.field_view(descriptor))
                    .collect(),
            })
            .collect();

        FormView {
            sections,
            photo_preview: self.preview.clone(),
        }
    }

    fn field_view(&self, descriptor: &FieldDescriptor) -> FieldView {
        let value = match descriptor.field {
            Field::FullName => FieldValue::Text(self.draft.full_name.clone()),
            Field::Email => FieldValue::Text(self.draft.email.clone()),
            Field::Gender => FieldValue::Text(self.draft.gender.clone()),
            Field::BirthDate => FieldValue::Text(self.draft.birth_date.clone()),
            Field::ProfilePhoto => FieldValue::Files(
                self.draft
                    .profile_photo
                    .iter()
                    .map(|upload| upload.file_name.clone())
                    .collect(),
            ),
            Field::YearsOfExperience => {
                FieldValue::Text(self.draft.years_of_experience.clone())
            }
            Field::Skills => FieldValue::Selections(self.draft.skills.clone()),
            Field::Bio => FieldValue::Text(self.draft.bio.clone()),
            Field::AgreeToTerms => FieldValue::Toggle(self.draft.agree_to_terms),
        };

        FieldView {
            name: descriptor.field.key(),
            label: descriptor.label,
            control: descriptor.control,
            required: descriptor.required,
            value,
            error: self
                .errors
                .message(descriptor.field)
                .map(str::to_string),
            placeholder: descriptor.placeholder,
            options: descriptor.options,
            accept: descriptor.accept,
            hint: descriptor.hint,
        }
    }
}
