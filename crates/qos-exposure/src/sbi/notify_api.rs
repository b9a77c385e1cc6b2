//! Handlers for inbound notifications from the policy authority.
//!
//! The acknowledgement depends only on correlation resolution, never
//! on whether the onward forwarding succeeded.

use super::{decode_body, AppState};
use crate::domain::error::ProblemDetails;
use crate::domain::models::{AppSessionContextUpdateData, EventExposureNotification};
use crate::notifier::CORRELATION_HEADER;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

fn decode_update(body: &str) -> Result<Option<AppSessionContextUpdateData>, ProblemDetails> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    decode_body(body).map(Some)
}

async fn handle_qos(state: AppState, corr_id: &str, body: String) -> Response {
    let update = match decode_update(&body) {
        Ok(update) => update,
        Err(pd) => return pd.into_response(),
    };
    match state.processor.handle_qos_notification(corr_id, update).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(pd) => pd.into_response(),
    }
}

/// Correlation token carried in the path
pub(crate) async fn qos_notification_by_path(
    State(state): State<AppState>,
    Path(corr_id): Path<String>,
    body: String,
) -> Response {
    handle_qos(state, &corr_id, body).await
}

/// Correlation token carried in the `X-Correlation-Id` header
pub(crate) async fn qos_notification_by_header(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(corr_id) = headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return ProblemDetails::malformed_request(format!(
            "missing {CORRELATION_HEADER} header"
        ))
        .into_response();
    };
    handle_qos(state, &corr_id, body).await
}

/// Legacy event-exposure notification, resolved by notification id
pub(crate) async fn event_notification(
    State(state): State<AppState>,
    body: String,
) -> Response {
    let notif: EventExposureNotification = match decode_body(&body) {
        Ok(notif) => notif,
        Err(pd) => return pd.into_response(),
    };
    match state
        .processor
        .handle_event_notification(&notif.notif_id)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(pd) => pd.into_response(),
    }
}
