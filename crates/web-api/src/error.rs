use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nifty_relay_core::RelayError;
use serde::Serialize;
use thiserror::Error;

/// Request-level failure rendered as a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was not JSON or lacked a required field.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Relay(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Broker error text can carry account details; keep it in the logs only.
        let error = match &self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Relay(e) if e.is_timeout() => "broker timeout".to_string(),
            Self::Relay(_) => "broker unavailable".to_string(),
        };

        match &self {
            Self::BadRequest(msg) => tracing::warn!(error = %msg, "Rejected request"),
            Self::Relay(e) => tracing::error!(error = %e, "Signal failed"),
        }

        (
            status,
            Json(ErrorBody {
                status: "error",
                error,
            }),
        )
            .into_response()
    }
}
