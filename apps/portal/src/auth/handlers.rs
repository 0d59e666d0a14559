//! Axum route handlers for applicant accounts.

use axum::{extract::State, Form};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::fragment::Route;
use crate::routes::action::ActionResponse;
use crate::session::{removal_cookie, token_cookie, SessionState, SESSION_COOKIE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, ActionResponse), AppError> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::Validation(
            "Please enter your email and password.".to_string(),
        ));
    }

    let session = state.auth.sign_in(&form.email, &form.password).await?;
    info!("User {} signed in until {}", session.user.id, session.expires_at);

    Ok((
        jar.add(token_cookie(SESSION_COOKIE, session.token)),
        ActionResponse::navigate(Route::Jobs),
    ))
}

/// POST /auth/register
///
/// Creates the account and signs it in straight away.
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, ActionResponse), AppError> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::Validation(
            "Please enter an email and a password.".to_string(),
        ));
    }
    if form.password != form.confirm_password {
        return Err(AppError::Validation("Passwords do not match.".to_string()));
    }

    let session = state.auth.sign_up(&form.email, &form.password).await?;
    info!("User {} registered, session until {}", session.user.id, session.expires_at);

    Ok((
        jar.add(token_cookie(SESSION_COOKIE, session.token)),
        ActionResponse::navigate(Route::Jobs).with_message("Registration successful!"),
    ))
}

/// POST /auth/logout
///
/// Ends the user session only; an admin grant held in the same browser
/// stays valid.
pub async fn handle_logout(
    State(state): State<AppState>,
    session: SessionState,
    jar: CookieJar,
) -> Result<(CookieJar, ActionResponse), AppError> {
    if let Some(token) = session.session_token {
        state.auth.sign_out(token).await?;
        info!("Session signed out");
    }
    Ok((
        jar.remove(removal_cookie(SESSION_COOKIE)),
        ActionResponse::navigate(Route::Home),
    ))
}
