//! The admin gate. The password never leaves the server; a match issues a
//! grant token that lives in the `hera_admin` cookie.

use axum::{extract::State, Form};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::fragment::Route;
use crate::routes::action::ActionResponse;
use crate::session::{removal_cookie, token_cookie, SessionState, ADMIN_COOKIE};
use crate::state::AppState;

pub const WRONG_PASSWORD_MESSAGE: &str = "Incorrect admin password";

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    pub password: String,
}

/// Constant-time comparison. An unset password never matches.
pub fn password_matches(expected: &str, candidate: &str) -> bool {
    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(candidate.as_bytes()))
}

/// POST /admin/login
pub async fn handle_admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Result<(CookieJar, ActionResponse), AppError> {
    if !password_matches(&state.config.admin_password, &form.password) {
        warn!("Rejected admin password attempt");
        return Err(AppError::Unauthorized(WRONG_PASSWORD_MESSAGE.to_string()));
    }

    let grant = state.auth.grant_admin().await?;
    info!("Admin grant issued");

    Ok((
        jar.add(token_cookie(ADMIN_COOKIE, grant)),
        ActionResponse::navigate(Route::Admin),
    ))
}

/// POST /admin/logout
pub async fn handle_admin_logout(
    State(state): State<AppState>,
    session: SessionState,
    jar: CookieJar,
) -> Result<(CookieJar, ActionResponse), AppError> {
    if let Some(token) = session.admin_token {
        state.auth.revoke_admin(token).await?;
        info!("Admin grant revoked");
    }
    Ok((
        jar.remove(removal_cookie(ADMIN_COOKIE)),
        ActionResponse::navigate(Route::Home),
    ))
}
