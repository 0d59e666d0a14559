use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::applications::form::{resume_key, ApplicationForm};
use crate::errors::AppError;
use crate::gateway::{is_missing_bucket, DataGateway, GatewayError, StorageGateway};
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::user::User;

/// Validates, uploads the resume, then records the application.
///
/// Validation failures return before either gateway is called. A failed
/// insert leaves the uploaded resume in place.
pub async fn submit_application(
    data: &dyn DataGateway,
    storage: &dyn StorageGateway,
    user: &User,
    job_id: Uuid,
    form: &ApplicationForm,
    submitted_at: DateTime<Utc>,
) -> Result<ApplicationRow, AppError> {
    let (applicant, resume) = form.validate()?;

    let path = resume_key(user.id, job_id, submitted_at, resume.extension());
    let resume_path = storage
        .upload(&path, resume.bytes.clone(), resume.content_type)
        .await
        .map_err(upload_error)?;
    info!("Uploaded resume {:?} to {resume_path}", resume.file_name);

    let application = NewApplication {
        job_id,
        user_id: user.id,
        applicant,
        resume_path,
        submitted_at,
    };
    let row = data
        .insert_application(&application)
        .await
        .map_err(insert_error)?;
    info!("Application {} submitted for job {job_id}", row.id);
    Ok(row)
}

fn upload_error(err: GatewayError) -> AppError {
    if is_missing_bucket(&err) {
        return AppError::Gateway(err);
    }
    error!("Resume upload failed: {err}");
    AppError::Upstream(format!("Resume upload failed: {err}"))
}

fn insert_error(err: GatewayError) -> AppError {
    match err {
        GatewayError::Rejected(_) => AppError::Gateway(err),
        other => {
            error!("Application insert failed: {other}");
            AppError::Upstream(
                "Your resume was uploaded but the application could not be saved. Please try again."
                    .to_string(),
            )
        }
    }
}
