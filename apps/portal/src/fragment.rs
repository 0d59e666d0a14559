//! Fragment routing: maps the URL fragment to a route, then applies the
//! session guards to decide which page actually renders.

use uuid::Uuid;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Jobs,
    WhyHera,
    Login,
    Register,
    Admin,
    Apply(Uuid),
}

impl Route {
    /// Parses a fragment with or without its leading `#`. Anything
    /// unrecognised, including `apply-` with a malformed id, is `Home`.
    pub fn from_fragment(fragment: &str) -> Route {
        let fragment = fragment.trim().trim_start_matches('#');
        match fragment {
            "" | "home" => Route::Home,
            "jobs" => Route::Jobs,
            "why-hera" => Route::WhyHera,
            "login" => Route::Login,
            "register" => Route::Register,
            "admin" => Route::Admin,
            other => other
                .strip_prefix("apply-")
                .and_then(|id| id.parse::<Uuid>().ok())
                .map(Route::Apply)
                .unwrap_or(Route::Home),
        }
    }

    /// The fragment that navigates to this route.
    pub fn fragment(&self) -> String {
        match self {
            Route::Home => "#home".to_string(),
            Route::Jobs => "#jobs".to_string(),
            Route::WhyHera => "#why-hera".to_string(),
            Route::Login => "#login".to_string(),
            Route::Register => "#register".to_string(),
            Route::Admin => "#admin".to_string(),
            Route::Apply(id) => format!("#apply-{id}"),
        }
    }

    /// Navigation tab highlighted while this route is showing.
    pub fn nav_tab(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Jobs | Route::Apply(_) => "jobs",
            Route::WhyHera => "why-hera",
            Route::Login | Route::Register => "login",
            Route::Admin => "admin",
        }
    }
}

/// The page that gets rendered once guards have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Jobs,
    WhyHera,
    Login,
    Register,
    Apply(Uuid),
    AdminDashboard,
    /// Shown in place of the dashboard until the admin password is entered.
    AdminGate,
    /// Shown in place of a page that needs a signed-in user.
    LoginPrompt(Route),
}

impl Page {
    /// Stable name reported in the `X-Portal-Route` header.
    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Jobs => "jobs",
            Page::WhyHera => "why-hera",
            Page::Login => "login",
            Page::Register => "register",
            Page::Apply(_) => "apply",
            Page::AdminDashboard => "admin",
            Page::AdminGate => "admin-gate",
            Page::LoginPrompt(_) => "login-prompt",
        }
    }
}

/// Applies the route guards. Jobs and apply need a user session, admin
/// needs the admin flag; a failed guard substitutes a prompt page rather
/// than redirecting.
pub fn resolve(route: Route, session: &SessionState) -> Page {
    match route {
        Route::Home => Page::Home,
        Route::WhyHera => Page::WhyHera,
        Route::Login => Page::Login,
        Route::Register => Page::Register,
        Route::Jobs if session.signed_in() => Page::Jobs,
        Route::Apply(id) if session.signed_in() => Page::Apply(id),
        Route::Jobs | Route::Apply(_) => Page::LoginPrompt(route),
        Route::Admin if session.admin => Page::AdminDashboard,
        Route::Admin => Page::AdminGate,
    }
}
