//! Per-request session state.
//!
//! Both the user session and the admin flag are read from cookies on every
//! request and resolved through the auth gateway. The resulting
//! [`SessionState`] is passed explicitly to the router and page renderers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "hera_session";
/// Admin grant cookie. No expiry, so the browser drops it at the end of the
/// browsing session; signing out of the user account leaves it alone. The
/// grant behind it lapses server-side after `ADMIN_GRANT_TTL_HOURS`.
pub const ADMIN_COOKIE: &str = "hera_admin";

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub session_token: Option<Uuid>,
    pub admin: bool,
    pub admin_token: Option<Uuid>,
}

impl SessionState {
    pub fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn require_user(&self, message: &str) -> Result<&User, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized(message.to_string()))
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn cookie_token(jar: &CookieJar, name: &str) -> Option<Uuid> {
    jar.get(name)
        .and_then(|c| c.value().parse::<Uuid>().ok())
}

/// Builds a session-scoped, HttpOnly cookie.
pub fn token_cookie(name: &'static str, token: Uuid) -> Cookie<'static> {
    Cookie::build((name, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

#[async_trait]
impl FromRequestParts<AppState> for SessionState {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let mut session = SessionState::default();

        if let Some(token) = cookie_token(&jar, SESSION_COOKIE) {
            if let Some(user) = state.auth.current_user(token).await? {
                session.user = Some(user);
                session.session_token = Some(token);
            } else {
                tracing::debug!("session cookie present but no live session");
            }
        }

        if let Some(token) = cookie_token(&jar, ADMIN_COOKIE) {
            if state.auth.has_admin_grant(token).await? {
                session.admin = true;
                session.admin_token = Some(token);
            }
        }

        Ok(session)
    }
}
