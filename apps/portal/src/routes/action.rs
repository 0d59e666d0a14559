//! Responses to form actions. The shell script reads the navigate header,
//! alerts the body when there is one, and switches the fragment.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::fragment::Route;

pub const NAVIGATE_HEADER: &str = "x-portal-navigate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub navigate: Option<Route>,
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn navigate(route: Route) -> Self {
        ActionResponse {
            navigate: Some(route),
            message: None,
        }
    }

    /// Stay on the current page.
    pub fn stay() -> Self {
        ActionResponse {
            navigate: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        let mut response = (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message.unwrap_or_default(),
        )
            .into_response();
        if let Some(route) = self.navigate {
            if let Ok(value) = HeaderValue::from_str(&route.fragment()) {
                response.headers_mut().insert(NAVIGATE_HEADER, value);
            }
        }
        response
    }
}
