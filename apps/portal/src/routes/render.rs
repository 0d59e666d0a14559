//! The shell page, the fragment renderer, and the jobs listing partial.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use tracing::debug;

use crate::errors::AppError;
use crate::fragment::{resolve, Route};
use crate::pages::listing::{filter_and_sort, ListingQuery};
use crate::pages::{render_page, JobListingsPartial};
use crate::session::SessionState;
use crate::state::AppState;

pub const ROUTE_HEADER: &str = "x-portal-route";
pub const JOBS_LOGIN_MESSAGE: &str = "You must be logged in to access job postings.";

const SHELL_HTML: &str = include_str!("../../static/index.html");
const PORTAL_JS: &str = include_str!("../../static/portal.js");

/// GET /
pub async fn handle_shell() -> Html<&'static str> {
    Html(SHELL_HTML)
}

/// GET /static/portal.js
pub async fn handle_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        PORTAL_JS,
    )
}

/// GET /render/:fragment
///
/// Renders whatever the guards allow for this fragment. The page actually
/// rendered is named in the `X-Portal-Route` header.
pub async fn handle_render(
    State(state): State<AppState>,
    session: SessionState,
    Path(fragment): Path<String>,
) -> Result<Response, AppError> {
    let route = Route::from_fragment(&fragment);
    let page = resolve(route, &session);
    debug!("Rendering {fragment:?} as {}", page.name());

    let html = render_page(&state, &session, route, page).await?;
    Ok(([(ROUTE_HEADER, page.name())], Html(html)).into_response())
}

/// GET /partials/jobs/listings?q=&sort=
pub async fn handle_job_listings(
    State(state): State<AppState>,
    session: SessionState,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>, AppError> {
    session.require_user(JOBS_LOGIN_MESSAGE)?;
    let jobs = filter_and_sort(state.data.list_jobs().await?, query.search(), query.sort_key());
    Ok(Html(JobListingsPartial::new(&jobs).render()?))
}
