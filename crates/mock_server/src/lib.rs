//! In-memory CampusCash backend for tests.
//!
//! Serves the same endpoints and error envelope as the real backend, with
//! just enough semantics for client tests to be meaningful: redeeming
//! actually moves coins and issues a coupon, granting actually spends the
//! professor's allowance. The state handle doubles as the test hook surface
//! (hit counters, injected failures, artificial delays).

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

mod auth;
mod company;
mod marketplace;
mod notifications;
mod professor;
mod profile;
mod server;
mod state;
mod student;

pub use server::{router, run_with_listener, spawn, spawn_with_listener};
pub use state::AppState;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Error half of every handler; renders the `{error, message}` envelope.
pub(crate) struct ApiFailure {
    status: StatusCode,
    error: String,
    message: Option<String>,
}

impl ApiFailure {
    pub(crate) fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn unauthorized(error: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    pub(crate) fn forbidden(error: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, error)
    }

    pub(crate) fn not_found(error: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub(crate) fn bad_request(error: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.error,
                message: self.message,
            }),
        )
            .into_response()
    }
}
