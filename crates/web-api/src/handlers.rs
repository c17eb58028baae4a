use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use nifty_relay_core::{PositionSnapshot, PostbackEvent, RelayEngine, SignalOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub message: String,
}

/// Body returned by both webhook endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl StatusResponse {
    fn plain(status: &str) -> Self {
        Self {
            status: status.to_string(),
            symbol: None,
        }
    }
}

impl From<SignalOutcome> for StatusResponse {
    fn from(outcome: SignalOutcome) -> Self {
        match outcome {
            SignalOutcome::Ignored => Self::plain("ignored"),
            SignalOutcome::TradeLocked => Self::plain("trade locked"),
            SignalOutcome::FirstPriceStored { .. } => Self::plain("first price stored"),
            SignalOutcome::OrderPlaced { symbol, .. } => Self {
                status: "order placed".to_string(),
                symbol: Some(symbol),
            },
        }
    }
}

/// GET / - liveness probe.
pub async fn home(State(engine): State<Arc<RelayEngine>>) -> String {
    format!("{} Automation Server Running", engine.strategy().underlying)
}

/// POST /webhook - alert from the charting platform.
///
/// # Errors
/// Returns 400 for a malformed body, 502/504 when the broker call fails.
pub async fn webhook(
    State(engine): State<Arc<RelayEngine>>,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = payload?;
    let outcome = engine.handle_signal(&request.message).await?;
    Ok(Json(outcome.into()))
}

/// POST /postback - order status push from the broker. Always acknowledged.
///
/// # Errors
/// Returns 400 only when the body is not JSON or has no `status`.
pub async fn postback(
    State(engine): State<Arc<RelayEngine>>,
    payload: Result<Json<PostbackEvent>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(event) = payload?;
    engine.handle_postback(&event).await;
    Ok(Json(StatusResponse::plain("ok")))
}

/// GET /status - current lock and position.
pub async fn status(State(engine): State<Arc<RelayEngine>>) -> Json<PositionSnapshot> {
    Json(engine.snapshot().await)
}
