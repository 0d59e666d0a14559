//! The application form: option lists, the raw submitted values, and the
//! local validation that runs before anything reaches a gateway.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gateway::{DOCX_MIME, DOC_MIME, PDF_MIME, RESUME_MAX_BYTES, RESUME_MIME_TYPES};
use crate::models::application::ApplicantDetails;

pub const PREFIXES: &[&str] = &["Mr.", "Ms.", "Mrs.", "Dr.", "Prof."];
pub const SUFFIXES: &[&str] = &["Jr.", "Sr.", "II", "III", "PhD", "MD"];
pub const COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "United Kingdom",
    "Australia",
    "Germany",
    "France",
    "Other",
];
pub const EDUCATION_LEVELS: &[&str] = &[
    "High School",
    "Associate Degree",
    "Bachelor's Degree",
    "Master's Degree",
    "Doctoral Degree",
    "Professional Degree",
];
/// (submitted value, label)
pub const REFERRAL_SOURCES: &[(&str, &str)] = &[
    ("Company Website", "Company Website"),
    ("Job Board", "Job Board"),
    ("LinkedIn", "LinkedIn"),
    ("Social Media", "Social Media"),
    ("Referral", "Referral from Employee/Friend"),
    ("University Career Center", "University Career Center"),
    ("Job Fair", "Job Fair"),
    ("Other", "Other"),
];
pub const GENDERS: &[&str] = &["Male", "Female", "Non-binary", "Other"];
pub const ETHNICITIES: &[&str] = &[
    "American Indian or Alaska Native",
    "Asian",
    "Black or African American",
    "Hispanic or Latino",
    "Native Hawaiian or Other Pacific Islander",
    "White",
    "Two or more races",
];

pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields. Missing: {0}.")]
    MissingField(&'static str),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Age must be a whole number between 16 and 100.")]
    InvalidAge,

    #[error("Please choose a valid option for {0}.")]
    UnknownOption(&'static str),

    #[error("You must confirm: {0}.")]
    AttestationRequired(&'static str),

    #[error("Please upload your resume.")]
    ResumeMissing,

    #[error("Resume must be a PDF, DOC, or DOCX file.")]
    ResumeType,

    #[error("Resume must be 10MB or smaller.")]
    ResumeTooLarge,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// An uploaded resume as received, before validation.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A resume that passed the MIME and size checks.
#[derive(Debug, Clone)]
pub struct ValidResume {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl ValidResume {
    pub fn extension(&self) -> &'static str {
        extension_for(self.content_type)
    }
}

/// Raw values of the application form. Text inputs keep whatever the
/// browser sent; checkboxes are `true` when present.
#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub prefix: String,
    pub full_name: String,
    pub suffix: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub education: String,
    pub experience: String,
    pub pitch: String,
    pub referral_source: String,
    pub gender: String,
    pub ethnicity: String,
    pub attest_qualifications: bool,
    pub attest_work_eligibility: bool,
    pub accept_terms: bool,
    pub resume: Option<ResumeUpload>,
}

impl ApplicationForm {
    /// Assigns a text field by its form name. Unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "prefix" => &mut self.prefix,
            "full_name" => &mut self.full_name,
            "suffix" => &mut self.suffix,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "age" => &mut self.age,
            "street" => &mut self.street,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "country" => &mut self.country,
            "education" => &mut self.education,
            "experience" => &mut self.experience,
            "pitch" => &mut self.pitch,
            "referral_source" => &mut self.referral_source,
            "gender" => &mut self.gender,
            "ethnicity" => &mut self.ethnicity,
            "attest_qualifications" => {
                self.attest_qualifications = is_checked(&value);
                return;
            }
            "attest_work_eligibility" => {
                self.attest_work_eligibility = is_checked(&value);
                return;
            }
            "accept_terms" => {
                self.accept_terms = is_checked(&value);
                return;
            }
            _ => return,
        };
        *slot = value;
    }

    /// Checks every field in form order and returns the first problem.
    pub fn validate(&self) -> Result<(ApplicantDetails, ValidResume), ValidationError> {
        let full_name = required(&self.full_name, "Full Name")?;
        let email = required(&self.email, "Email Address")?;
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        let phone = required(&self.phone, "Phone Number")?;
        let age = required(&self.age, "Age")?
            .parse::<i32>()
            .ok()
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or(ValidationError::InvalidAge)?;
        let street = required(&self.street, "Street Address")?;
        let city = required(&self.city, "City")?;
        let state = required(&self.state, "State")?;
        let country = required(&self.country, "Country")?;
        one_of(&country, COUNTRIES, "Country")?;
        let education = required(&self.education, "Education")?;
        one_of(&education, EDUCATION_LEVELS, "Education")?;
        let experience = required(&self.experience, "Work Experience")?;
        let pitch = required(&self.pitch, "Why do you want to join Hera?")?;
        let referral_source = required(&self.referral_source, "How did you hear about us?")?;
        if !REFERRAL_SOURCES.iter().any(|(value, _)| *value == referral_source) {
            return Err(ValidationError::UnknownOption("How did you hear about us?"));
        }

        let prefix = optional(&self.prefix);
        let suffix = optional(&self.suffix);
        let gender = optional(&self.gender);
        let ethnicity = optional(&self.ethnicity);
        if let Some(value) = &prefix {
            one_of(value, PREFIXES, "Prefix")?;
        }
        if let Some(value) = &suffix {
            one_of(value, SUFFIXES, "Suffix")?;
        }
        if let Some(value) = &gender {
            one_of(value, GENDERS, "Gender")?;
        }
        if let Some(value) = &ethnicity {
            one_of(value, ETHNICITIES, "Ethnicity")?;
        }

        if !self.attest_qualifications {
            return Err(ValidationError::AttestationRequired(
                "you meet the qualifications for this position",
            ));
        }
        if !self.attest_work_eligibility {
            return Err(ValidationError::AttestationRequired(
                "you are legally able to work in this country",
            ));
        }
        if !self.accept_terms {
            return Err(ValidationError::AttestationRequired(
                "you agree to the Terms and Conditions",
            ));
        }

        let resume = validate_resume(self.resume.as_ref())?;

        let details = ApplicantDetails {
            prefix,
            full_name,
            suffix,
            email,
            phone,
            age,
            street,
            city,
            state,
            country,
            education,
            experience,
            pitch,
            referral_source,
            gender,
            ethnicity,
            attests_qualifications: true,
            attests_work_eligibility: true,
            accepts_terms: true,
        };
        Ok((details, resume))
    }
}

fn is_checked(value: &str) -> bool {
    !matches!(value.trim(), "" | "false" | "off")
}

fn required(value: &str, label: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(label))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn one_of(value: &str, options: &[&str], label: &'static str) -> Result<(), ValidationError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::UnknownOption(label))
    }
}

/// Empty files count as missing.
pub fn validate_resume(resume: Option<&ResumeUpload>) -> Result<ValidResume, ValidationError> {
    let resume = resume
        .filter(|r| !r.bytes.is_empty())
        .ok_or(ValidationError::ResumeMissing)?;
    let content_type = RESUME_MIME_TYPES
        .into_iter()
        .find(|mime| *mime == resume.content_type.trim())
        .ok_or(ValidationError::ResumeType)?;
    if resume.bytes.len() as u64 > RESUME_MAX_BYTES {
        return Err(ValidationError::ResumeTooLarge);
    }
    Ok(ValidResume {
        file_name: resume.file_name.clone(),
        content_type,
        bytes: resume.bytes.clone(),
    })
}

pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        PDF_MIME => "pdf",
        DOC_MIME => "doc",
        DOCX_MIME => "docx",
        _ => "bin",
    }
}

/// Storage key of a resume: `<user>/<job>/<submitted millis>.<ext>`.
pub fn resume_key(user_id: Uuid, job_id: Uuid, submitted_at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "{user_id}/{job_id}/{}.{extension}",
        submitted_at.timestamp_millis()
    )
}
