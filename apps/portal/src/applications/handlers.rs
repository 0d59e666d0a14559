//! Axum route handler for application submission.

use axum::extract::{Multipart, Path, State};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::applications::form::{ApplicationForm, ResumeUpload};
use crate::applications::submit::submit_application;
use crate::errors::AppError;
use crate::fragment::Route;
use crate::routes::action::ActionResponse;
use crate::session::SessionState;
use crate::state::AppState;

pub const APPLY_LOGIN_MESSAGE: &str = "You must be logged in to apply for a position.";

/// POST /apply/:job_id
///
/// Multipart form with the applicant fields and a `resume` file part.
pub async fn handle_apply(
    State(state): State<AppState>,
    session: SessionState,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ActionResponse, AppError> {
    let user = session.require_user(APPLY_LOGIN_MESSAGE)?;
    let form = read_application_form(multipart).await?;

    let row = submit_application(
        state.data.as_ref(),
        state.storage.as_ref(),
        user,
        job_id,
        &form,
        Utc::now(),
    )
    .await?;
    info!("User {} applied to job {job_id} ({})", user.id, row.id);

    Ok(ActionResponse::navigate(Route::Jobs)
        .with_message("Application submitted successfully! We'll be in touch soon."))
}

async fn read_application_form(mut multipart: Multipart) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read the application form: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "resume" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read the resume: {e}")))?;
            form.resume = Some(ResumeUpload {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read field {name}: {e}")))?;
            form.set_text(&name, value);
        }
    }
    Ok(form)
}
