//! Declarative validation of registration drafts.
//!
//! Each field carries an ordered rule list (predicate plus message) evaluated
//! in shape -> required -> range -> format order; the first failing rule is
//! the only error reported for that field. `validate` is a pure function from
//! draft to typed record or per-field error map.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{Gender, ProfilePhoto, RegistrationDraft, RegistrationRecord};

pub const MAX_PHOTO_BYTES: u64 = 5_000_000;
pub const ACCEPTED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];
pub const MIN_NAME_CHARS: usize = 3;
pub const MAX_BIO_CHARS: usize = 500;
pub const MAX_EXPERIENCE_YEARS: u8 = 50;

const FULL_NAME_TOO_SHORT: &str = "Full name must be at least 3 characters";
const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_INVALID: &str = "Invalid email address";
const GENDER_REQUIRED: &str = "Gender is required";
const GENDER_INVALID: &str = "Select a valid gender";
const BIRTH_DATE_INVALID: &str = "Valid date is required";
const PHOTO_REQUIRED: &str = "Profile photo is required.";
const PHOTO_TOO_LARGE: &str = "Max file size is 5MB.";
const PHOTO_BAD_TYPE: &str = ".jpg, .jpeg, .png and .webp files are accepted.";
const EXPERIENCE_REQUIRED: &str = "Years of experience is required";
const EXPERIENCE_NOT_A_NUMBER: &str = "Years of experience must be a number";
const EXPERIENCE_OUT_OF_RANGE: &str = "Years of experience must be between 0 and 50";
const SKILLS_REQUIRED: &str = "Select at least one skill";
const BIO_TOO_LONG: &str = "Bio must be less than 500 characters";
const TERMS_REQUIRED: &str = "You must agree to the terms";

/// Form fields addressable by validation errors. Serialized names match the
/// control names on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Email,
    Gender,
    BirthDate,
    ProfilePhoto,
    YearsOfExperience,
    Skills,
    Bio,
    AgreeToTerms,
}

impl Field {
    pub const fn key(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Gender => "gender",
            Field::BirthDate => "birthDate",
            Field::ProfilePhoto => "profilePhoto",
            Field::YearsOfExperience => "yearsOfExperience",
            Field::Skills => "skills",
            Field::Bio => "bio",
            Field::AgreeToTerms => "agreeToTerms",
        }
    }
}

/// Per-field error map. At most one message per field: the first failing
/// rule wins.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error,
)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn single(field: Field, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field, message.to_string());
        Self(errors)
    }

    pub fn message(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

struct Rule {
    message: &'static str,
    check: fn(&RegistrationDraft) -> bool,
}

struct FieldRules {
    field: Field,
    rules: &'static [Rule],
}

/// The schema as data: one ordered rule list per field.
const SCHEMA: &[FieldRules] = &[
    FieldRules {
        field: Field::FullName,
        rules: &[Rule {
            message: FULL_NAME_TOO_SHORT,
            check: |draft| draft.full_name.trim().chars().count() >= MIN_NAME_CHARS,
        }],
    },
    FieldRules {
        field: Field::Email,
        rules: &[
            Rule {
                message: EMAIL_REQUIRED,
                check: |draft| !draft.email.trim().is_empty(),
            },
            Rule {
                message: EMAIL_INVALID,
                check: |draft| email_pattern().is_match(draft.email.trim()),
            },
        ],
    },
    FieldRules {
        field: Field::Gender,
        rules: &[
            Rule {
                message: GENDER_REQUIRED,
                check: |draft| !draft.gender.trim().is_empty(),
            },
            Rule {
                message: GENDER_INVALID,
                check: |draft| Gender::parse(&draft.gender).is_some(),
            },
        ],
    },
    FieldRules {
        field: Field::BirthDate,
        rules: &[Rule {
            message: BIRTH_DATE_INVALID,
            check: |draft| parse_birth_date(&draft.birth_date).is_some(),
        }],
    },
    FieldRules {
        field: Field::ProfilePhoto,
        rules: &[
            Rule {
                message: PHOTO_REQUIRED,
                check: |draft| !draft.profile_photo.is_empty(),
            },
            Rule {
                message: PHOTO_TOO_LARGE,
                check: |draft| {
                    draft
                        .profile_photo
                        .first()
                        .map(|upload| upload.size_bytes <= MAX_PHOTO_BYTES)
                        .unwrap_or(false)
                },
            },
            Rule {
                message: PHOTO_BAD_TYPE,
                check: |draft| {
                    draft
                        .profile_photo
                        .first()
                        .map(|upload| accepted_photo_type(&upload.content_type))
                        .unwrap_or(false)
                },
            },
        ],
    },
    FieldRules {
        field: Field::YearsOfExperience,
        rules: &[
            Rule {
                message: EXPERIENCE_REQUIRED,
                check: |draft| !draft.years_of_experience.trim().is_empty(),
            },
            Rule {
                message: EXPERIENCE_NOT_A_NUMBER,
                check: |draft| draft.years_of_experience.trim().parse::<i64>().is_ok(),
            },
            Rule {
                message: EXPERIENCE_OUT_OF_RANGE,
                check: |draft| parse_experience(&draft.years_of_experience).is_some(),
            },
        ],
    },
    FieldRules {
        field: Field::Skills,
        rules: &[Rule {
            message: SKILLS_REQUIRED,
            check: |draft| !draft.skills.is_empty(),
        }],
    },
    FieldRules {
        field: Field::Bio,
        rules: &[Rule {
            message: BIO_TOO_LONG,
            check: |draft| draft.bio.chars().count() <= MAX_BIO_CHARS,
        }],
    },
    FieldRules {
        field: Field::AgreeToTerms,
        rules: &[Rule {
            message: TERMS_REQUIRED,
            check: |draft| draft.agree_to_terms,
        }],
    },
];

/// Validate a candidate draft against the schema. Returns the typed record
/// when every field passes, otherwise the map of first-failing messages.
/// The photo lands as a raw `Attachment` reference; the submission pipeline
/// upgrades it to the encoded shape afterwards.
pub fn validate(draft: &RegistrationDraft) -> Result<RegistrationRecord, ValidationErrors> {
    let mut errors = BTreeMap::new();
    for entry in SCHEMA {
        if let Some(rule) = entry.rules.iter().find(|rule| !(rule.check)(draft)) {
            errors.insert(entry.field, rule.message.to_string());
        }
    }
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let gender = Gender::parse(&draft.gender)
        .ok_or_else(|| ValidationErrors::single(Field::Gender, GENDER_INVALID))?;
    let birth_date = parse_birth_date(&draft.birth_date)
        .ok_or_else(|| ValidationErrors::single(Field::BirthDate, BIRTH_DATE_INVALID))?;
    let years_of_experience = parse_experience(&draft.years_of_experience)
        .ok_or_else(|| ValidationErrors::single(Field::YearsOfExperience, EXPERIENCE_OUT_OF_RANGE))?;

    let bio = draft.bio.trim();
    Ok(RegistrationRecord {
        full_name: draft.full_name.trim().to_string(),
        email: draft.email.trim().to_string(),
        gender,
        birth_date,
        profile_photo: draft
            .profile_photo
            .first()
            .map(ProfilePhoto::attachment_from)
            .unwrap_or(ProfilePhoto::Unset),
        years_of_experience,
        skills: draft.skills.clone(),
        bio: (!bio.is_empty()).then(|| bio.to_string()),
        agree_to_terms: draft.agree_to_terms,
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
    })
}

fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_experience(raw: &str) -> Option<u8> {
    let value = raw.trim().parse::<i64>().ok()?;
    (0..=i64::from(MAX_EXPERIENCE_YEARS))
        .contains(&value)
        .then_some(value as u8)
}

fn accepted_photo_type(content_type: &str) -> bool {
    content_type
        .trim()
        .parse::<mime::Mime>()
        .map(|parsed| ACCEPTED_PHOTO_TYPES.contains(&parsed.essence_str()))
        .unwrap_or(false)
}
