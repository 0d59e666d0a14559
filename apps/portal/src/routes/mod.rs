pub mod action;
pub mod health;
pub mod render;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admin::{gate, handlers as admin};
use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::gateway::RESUME_MAX_BYTES;
use crate::state::AppState;

/// Request body ceiling for application uploads: the resume limit plus room
/// for the text fields.
const APPLY_BODY_LIMIT: usize = RESUME_MAX_BYTES as usize + 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Shell and rendering
        .route("/", get(render::handle_shell))
        .route("/static/portal.js", get(render::handle_script))
        .route("/render/:fragment", get(render::handle_render))
        .route("/partials/jobs/listings", get(render::handle_job_listings))
        .route(
            "/partials/admin/jobs/:id/applicants",
            get(admin::handle_applicants_partial),
        )
        .route(
            "/partials/admin/jobs/:id/edit",
            get(admin::handle_edit_partial),
        )
        // Accounts
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/logout", post(auth::handle_logout))
        // Applications
        .route(
            "/apply/:job_id",
            post(applications::handle_apply).layer(DefaultBodyLimit::max(APPLY_BODY_LIMIT)),
        )
        // Admin
        .route("/admin/login", post(gate::handle_admin_login))
        .route("/admin/logout", post(gate::handle_admin_logout))
        .route("/admin/jobs", post(admin::handle_save_job))
        .route("/admin/jobs/:id/delete", post(admin::handle_delete_job))
        .route(
            "/admin/applications/:id/status",
            post(admin::handle_update_status),
        )
        .route(
            "/admin/applications/:id/resume",
            get(admin::handle_download_resume),
        )
        .route("/admin/diagnostics", get(admin::handle_diagnostics))
        .with_state(state)
}
