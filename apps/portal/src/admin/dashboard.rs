//! Admin dashboard and applicants modal views.

use askama::Template;
use uuid::Uuid;

use crate::admin::job_form::JobFormView;
use crate::errors::AppError;
use crate::gateway::{DataGateway, StorageGateway};
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::pages::{JobCard, NavBar, SelectOption};

pub struct DashboardJob {
    pub job: JobCard,
    pub application_count: i64,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardPage {
    pub nav: NavBar,
    pub total_jobs: usize,
    pub total_applications: i64,
    pub jobs: Vec<DashboardJob>,
    pub form: JobFormView,
}

/// Loads every posting and its application count. Counts are queried one
/// job at a time, in listing order.
pub async fn load_dashboard(
    data: &dyn DataGateway,
    nav: NavBar,
) -> Result<AdminDashboardPage, AppError> {
    let rows = data.list_jobs().await?;
    let mut jobs = Vec::with_capacity(rows.len());
    for row in &rows {
        let application_count = data.count_applications_for_job(row.id).await?;
        jobs.push(DashboardJob {
            job: JobCard::from(row),
            application_count,
        });
    }
    let total_applications = data.count_applications().await?;

    Ok(AdminDashboardPage {
        nav,
        total_jobs: jobs.len(),
        total_applications,
        jobs,
        form: JobFormView::create(),
    })
}

pub struct ApplicantView {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub education: String,
    pub experience: String,
    pub pitch: String,
    pub referral_source: String,
    pub submitted: String,
    pub resume_url: String,
    pub status_options: Vec<SelectOption>,
}

impl ApplicantView {
    fn new(row: &ApplicationRow, resume_url: String) -> Self {
        let a = &row.applicant;
        let display_name = [a.prefix.as_deref(), Some(a.full_name.as_str()), a.suffix.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        ApplicantView {
            id: row.id.to_string(),
            display_name,
            email: a.email.clone(),
            phone: a.phone.clone(),
            address: format!("{}, {}, {}, {}", a.street, a.city, a.state, a.country),
            education: a.education.clone(),
            experience: a.experience.clone(),
            pitch: a.pitch.clone(),
            referral_source: a.referral_source.clone(),
            submitted: row.submitted_at.format("%b %-d, %Y %H:%M UTC").to_string(),
            resume_url,
            status_options: ApplicationStatus::ALL
                .iter()
                .map(|s| SelectOption::new(s.as_str(), s.label(), *s == row.status))
                .collect(),
        }
    }
}

/// `GET /partials/admin/jobs/:id/applicants`
#[derive(Template)]
#[template(path = "applicants_modal.html")]
pub struct ApplicantsModal {
    pub job_title: String,
    pub applicants: Vec<ApplicantView>,
}

pub async fn load_applicants(
    data: &dyn DataGateway,
    storage: &dyn StorageGateway,
    job_id: Uuid,
) -> Result<ApplicantsModal, AppError> {
    let job = data
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
    let applicants = data
        .list_applications_for_job(job_id)
        .await?
        .iter()
        .map(|row| ApplicantView::new(row, storage.public_url(&row.resume_path)))
        .collect();
    Ok(ApplicantsModal {
        job_title: job.title,
        applicants,
    })
}
