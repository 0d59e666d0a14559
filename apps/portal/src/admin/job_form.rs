//! The job posting form. One form serves both create and edit; the mode is
//! carried by `editing_job_id`, empty when creating.

use askama::Template;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobInput, JobRow};
use crate::pages::SelectOption;

pub const WORK_TYPES: &[&str] = &["On-site", "Hybrid", "Remote"];

/// Submitted body of `POST /admin/jobs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub editing_job_id: String,
    pub title: String,
    pub description: String,
    pub required_qualifications: String,
    pub recommended_qualifications: String,
    pub salary_range: String,
    pub location: String,
    pub work_type: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl JobForm {
    /// The posting being edited, or `None` in create mode.
    pub fn editing(&self) -> Result<Option<Uuid>, AppError> {
        let id = self.editing_job_id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        id.parse::<Uuid>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid job id '{id}'")))
    }

    pub fn to_input(&self) -> Result<JobInput, AppError> {
        let title = self.title.trim();
        let description = self.description.trim();
        let required = self.required_qualifications.trim();
        if title.is_empty() || description.is_empty() || required.is_empty() {
            return Err(AppError::Validation(
                "Title, description and required qualifications are required.".to_string(),
            ));
        }
        let work_type = optional(&self.work_type);
        if let Some(work_type) = &work_type {
            if !WORK_TYPES.contains(&work_type.as_str()) {
                return Err(AppError::Validation(format!(
                    "Unknown work type '{work_type}'"
                )));
            }
        }
        Ok(JobInput {
            title: title.to_string(),
            description: description.to_string(),
            required_qualifications: required.to_string(),
            recommended_qualifications: optional(&self.recommended_qualifications),
            salary_range: optional(&self.salary_range),
            location: optional(&self.location),
            work_type,
        })
    }
}

/// Values shown in the form; all empty in create mode.
pub struct JobFormView {
    pub editing_job_id: String,
    pub title: String,
    pub description: String,
    pub required_qualifications: String,
    pub recommended_qualifications: String,
    pub salary_range: String,
    pub location: String,
    pub work_types: Vec<SelectOption>,
}

impl JobFormView {
    pub fn create() -> Self {
        JobFormView {
            editing_job_id: String::new(),
            title: String::new(),
            description: String::new(),
            required_qualifications: String::new(),
            recommended_qualifications: String::new(),
            salary_range: String::new(),
            location: String::new(),
            work_types: work_type_options(None),
        }
    }

    pub fn edit(job: &JobRow) -> Self {
        JobFormView {
            editing_job_id: job.id.to_string(),
            title: job.title.clone(),
            description: job.description.clone(),
            required_qualifications: job.required_qualifications.clone(),
            recommended_qualifications: job.recommended_qualifications.clone().unwrap_or_default(),
            salary_range: job.salary_range.clone().unwrap_or_default(),
            location: job.location.clone().unwrap_or_default(),
            work_types: work_type_options(job.work_type.as_deref()),
        }
    }

    pub fn editing(&self) -> bool {
        !self.editing_job_id.is_empty()
    }
}

fn work_type_options(selected: Option<&str>) -> Vec<SelectOption> {
    WORK_TYPES
        .iter()
        .map(|value| SelectOption::new(value, value, selected == Some(*value)))
        .collect()
}

/// `GET /partials/admin/jobs/:id/edit`
#[derive(Template)]
#[template(path = "job_form_partial.html")]
pub struct JobFormPartial {
    pub form: JobFormView,
}
