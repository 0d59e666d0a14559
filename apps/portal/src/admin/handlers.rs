//! Axum route handlers for the admin dashboard actions and partials.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::admin::dashboard::load_applicants;
use crate::admin::job_form::{JobForm, JobFormPartial, JobFormView};
use crate::applications::form::extension_for;
use crate::errors::AppError;
use crate::fragment::Route;
use crate::models::application::ApplicationStatus;
use crate::routes::action::ActionResponse;
use crate::session::SessionState;
use crate::state::AppState;
use crate::storage::setup::probe_bucket;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// POST /admin/jobs
///
/// Creates a posting, or updates one when `editing_job_id` is set.
pub async fn handle_save_job(
    State(state): State<AppState>,
    session: SessionState,
    Form(form): Form<JobForm>,
) -> Result<ActionResponse, AppError> {
    session.require_admin()?;
    let editing = form.editing()?;
    let input = form.to_input()?;

    let message = match editing {
        Some(id) => {
            state
                .data
                .update_job(id, &input)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;
            "Job updated successfully!"
        }
        None => {
            state.data.insert_job(&input).await?;
            "Job posted successfully!"
        }
    };

    Ok(ActionResponse::navigate(Route::Admin).with_message(message))
}

/// POST /admin/jobs/:id/delete
pub async fn handle_delete_job(
    State(state): State<AppState>,
    session: SessionState,
    Path(job_id): Path<Uuid>,
) -> Result<ActionResponse, AppError> {
    session.require_admin()?;
    if !state.data.delete_job(job_id).await? {
        return Err(AppError::NotFound(format!("job {job_id}")));
    }
    Ok(ActionResponse::navigate(Route::Admin))
}

/// POST /admin/applications/:id/status
///
/// Exactly one update call per accepted request. Unknown statuses are
/// rejected before the data gateway is reached.
pub async fn handle_update_status(
    State(state): State<AppState>,
    session: SessionState,
    Path(application_id): Path<Uuid>,
    Form(form): Form<StatusForm>,
) -> Result<ActionResponse, AppError> {
    session.require_admin()?;
    let status = form
        .status
        .parse::<ApplicationStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if !state
        .data
        .update_application_status(application_id, status)
        .await?
    {
        return Err(AppError::NotFound(format!("application {application_id}")));
    }
    info!("Application {application_id} moved to {status}");

    Ok(ActionResponse::stay().with_message(format!("Status updated to {status}")))
}

/// GET /admin/applications/:id/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    session: SessionState,
    Path(application_id): Path<Uuid>,
) -> Result<Response, AppError> {
    session.require_admin()?;
    let application = state
        .data
        .get_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("application {application_id}")))?;
    let object = state.storage.download(&application.resume_path).await?;

    let file_name = format!(
        "resume-{}.{}",
        application_id,
        extension_for(&object.content_type)
    );
    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        object.bytes,
    )
        .into_response())
}

/// GET /partials/admin/jobs/:id/applicants
pub async fn handle_applicants_partial(
    State(state): State<AppState>,
    session: SessionState,
    Path(job_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    session.require_admin()?;
    let modal = load_applicants(state.data.as_ref(), state.storage.as_ref(), job_id).await?;
    Ok(Html(modal.render()?))
}

/// GET /partials/admin/jobs/:id/edit
pub async fn handle_edit_partial(
    State(state): State<AppState>,
    session: SessionState,
    Path(job_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    session.require_admin()?;
    let job = state
        .data
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
    let partial = JobFormPartial {
        form: JobFormView::edit(&job),
    };
    Ok(Html(partial.render()?))
}

/// GET /admin/diagnostics
///
/// Checks the database and runs a storage round trip. Failures are
/// reported in the body rather than as an error status.
pub async fn handle_diagnostics(
    State(state): State<AppState>,
    session: SessionState,
) -> Result<Json<Value>, AppError> {
    session.require_admin()?;

    let database = match state.data.count_applications().await {
        Ok(applications) => json!({ "ok": true, "applications": applications }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    };

    let bucket = state.config.s3_bucket.clone();
    let bucket_exists = match state.storage.list_buckets().await {
        Ok(buckets) => json!(buckets.contains(&bucket)),
        Err(e) => json!({ "error": e.to_string() }),
    };
    let probe = probe_bucket(state.storage.as_ref()).await;

    Ok(Json(json!({
        "database": database,
        "storage": {
            "bucket": bucket,
            "exists": bucket_exists,
            "ok": probe.ok(),
            "probe": probe,
        },
    })))
}
