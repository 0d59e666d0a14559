use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of an application. New applications start as `Submitted`;
/// only the admin review flow moves them along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Interview,
    Accepted,
    Denied,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Denied,
    ];

    /// Stored and submitted form value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Denied => "denied",
        }
    }

    /// Human label shown in the admin views.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Denied => "Denied",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown application status '{}'", self.0)
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    /// Accepts the stored value (`under_review`) as well as the label
    /// (`under review`, any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(' ', "_");
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Applicant-supplied fields of an application, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ApplicantDetails {
    pub prefix: Option<String>,
    pub full_name: String,
    pub suffix: Option<String>,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub education: String,
    pub experience: String,
    pub pitch: String,
    pub referral_source: String,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub attests_qualifications: bool,
    pub attests_work_eligibility: bool,
    pub accepts_terms: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    #[sqlx(flatten)]
    pub applicant: ApplicantDetails,
    pub resume_path: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Insert payload for a freshly submitted application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub applicant: ApplicantDetails,
    pub resume_path: String,
    pub submitted_at: DateTime<Utc>,
}
