use chrono::{DateTime, Datelike, NaiveDate};

use super::domain::{
    Address, ApplicantDetails, DocumentKind, PendingDocument, SubmissionForm, ValidatedSubmission,
};

/// Validation errors raised by the submission guard. Each is user-correctable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionRejection {
    #[error("{label} is required.")]
    MissingField { label: &'static str },
    #[error("Date of birth must be a valid YYYY-MM-DD date.")]
    InvalidDateOfBirth,
    #[error("User must be at least {minimum} years old.")]
    Underage { minimum: u32, age: i32 },
    #[error("Residential address fields are required.")]
    ResidentialAddressIncomplete,
    #[error("Permanent address is required if not the same as residential address.")]
    PermanentAddressIncomplete,
    #[error("Minimum two documents are required.")]
    TooFewDocuments { required: usize, found: usize },
    #[error("Invalid file type. Only image and PDF files are allowed.")]
    UnsupportedDocumentType { file_name: String, content_type: String },
}

const DEFAULT_MINIMUM_AGE: u32 = 18;
const DEFAULT_MINIMUM_DOCUMENTS: usize = 2;

/// Eligibility dials backing submission validation.
#[derive(Debug, Clone)]
pub struct SubmissionPolicy {
    minimum_age: u32,
    minimum_documents: usize,
    strict_document_types: bool,
}

impl SubmissionPolicy {
    pub fn new(strict_document_types: bool) -> Self {
        Self {
            minimum_age: DEFAULT_MINIMUM_AGE,
            minimum_documents: DEFAULT_MINIMUM_DOCUMENTS,
            strict_document_types,
        }
    }

    pub fn strict_document_types(&self) -> bool {
        self.strict_document_types
    }
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Whole years between `dob` and `today`; the birthday itself counts as reached.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years - 1
    } else {
        years
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part only).
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

/// Checkbox-style truthiness for the mirror flag.
pub fn parse_mirror_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "on" | "1" | "yes")
    )
}

/// Resolve an address from a JSON-encoded part or, failing that, from dotted sub-fields.
/// Malformed JSON yields `None`, which validation reports as missing.
pub fn parse_address(form: &SubmissionForm, prefix: &str) -> Option<Address> {
    if let Some(encoded) = form.field(prefix) {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return None;
        }
        return serde_json::from_str::<Address>(encoded).ok();
    }

    let street1 = form.field(&format!("{prefix}.street1"));
    let street2 = form.field(&format!("{prefix}.street2"));
    if street1.is_none() && street2.is_none() {
        return None;
    }

    Some(Address::new(
        street1.unwrap_or_default(),
        street2.unwrap_or_default(),
    ))
}

/// Guard turning a raw multipart submission into a validated one.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    policy: SubmissionPolicy,
}

impl SubmissionGuard {
    pub fn with_policy(policy: SubmissionPolicy) -> Self {
        Self { policy }
    }

    /// Validate `form` as of `today`. Checks run in a fixed order and the first failure wins.
    pub fn validate(
        &self,
        form: SubmissionForm,
        today: NaiveDate,
    ) -> Result<ValidatedSubmission, SubmissionRejection> {
        let first_name = required(&form, "firstName", "First name")?;
        let last_name = required(&form, "lastName", "Last name")?;
        let email = required(&form, "email", "Email")?;

        let dob = form
            .field("dob")
            .and_then(parse_date_of_birth)
            .ok_or(SubmissionRejection::InvalidDateOfBirth)?;

        let age = age_on(dob, today);
        if age < self.policy.minimum_age as i32 {
            return Err(SubmissionRejection::Underage {
                minimum: self.policy.minimum_age,
                age,
            });
        }

        let residential_address = parse_address(&form, "residentialAddress")
            .filter(Address::is_complete)
            .ok_or(SubmissionRejection::ResidentialAddressIncomplete)?;

        let same_as_residential = parse_mirror_flag(form.field("sameAsResidential"));
        let permanent_address = if same_as_residential {
            residential_address.clone()
        } else {
            parse_address(&form, "permanentAddress")
                .filter(Address::is_complete)
                .ok_or(SubmissionRejection::PermanentAddressIncomplete)?
        };

        if form.files.len() < self.policy.minimum_documents {
            return Err(SubmissionRejection::TooFewDocuments {
                required: self.policy.minimum_documents,
                found: form.files.len(),
            });
        }

        let documents = form
            .files
            .into_iter()
            .map(|file| {
                let kind = if self.policy.strict_document_types {
                    DocumentKind::classify_strict(&file.content_type).ok_or_else(|| {
                        SubmissionRejection::UnsupportedDocumentType {
                            file_name: file.file_name.clone(),
                            content_type: file.content_type.clone(),
                        }
                    })?
                } else {
                    DocumentKind::classify(&file.content_type)
                };

                Ok(PendingDocument {
                    file_name: file.file_name,
                    kind,
                    content_type: file.content_type,
                    data: file.data,
                })
            })
            .collect::<Result<Vec<_>, SubmissionRejection>>()?;

        Ok(ValidatedSubmission {
            applicant: ApplicantDetails {
                first_name,
                last_name,
                email,
                dob,
                residential_address,
                same_as_residential,
                permanent_address,
            },
            documents,
        })
    }
}

fn required(
    form: &SubmissionForm,
    name: &str,
    label: &'static str,
) -> Result<String, SubmissionRejection> {
    match form.field(name).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(SubmissionRejection::MissingField { label }),
    }
}
