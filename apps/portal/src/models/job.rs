use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_qualifications: String,
    pub recommended_qualifications: Option<String>,
    pub salary_range: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of a job posting, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobInput {
    pub title: String,
    pub description: String,
    pub required_qualifications: String,
    pub recommended_qualifications: Option<String>,
    pub salary_range: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
}
