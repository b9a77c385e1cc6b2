//! Northbound HTTP surface (service-based interface).
//!
//! Handlers decode bodies themselves so malformed JSON maps to a 400
//! problem report instead of a framework rejection, then delegate to
//! the [`Processor`].

pub mod notify_api;
pub mod qos_api;

use crate::domain::error::ProblemDetails;
use crate::processor::Processor;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::error;

/// URI prefix the QoS resource surface is mounted under
pub const QOS_URI_PREFIX: &str = "/3gpp-as-session-with-qos/v1";

/// URI prefix for inbound notification callbacks
pub const NOTIFY_URI_PREFIX: &str = "/notification";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<Processor>,
}

/// Build the full northbound router
pub fn build_router(processor: Arc<Processor>) -> Router {
    let state = AppState { processor };

    let qos = Router::new()
        .route(
            "/:af_id/sessions",
            post(qos_api::post_session),
        )
        .route(
            "/:af_id/sessions/:sess_id",
            get(qos_api::get_session)
                .put(qos_api::put_session)
                .patch(qos_api::patch_session)
                .delete(qos_api::delete_session),
        )
        .route(
            "/:scs_as_id/subscriptions",
            get(qos_api::list_subscriptions).post(qos_api::post_subscription),
        )
        .route(
            "/:scs_as_id/subscriptions/:sub_id",
            get(qos_api::get_subscription)
                .put(qos_api::put_subscription)
                .patch(qos_api::patch_subscription)
                .delete(qos_api::delete_subscription),
        );

    let notify = Router::new()
        .route("/qos", post(notify_api::qos_notification_by_header))
        .route("/qos/:corr_id", post(notify_api::qos_notification_by_path))
        .route("/smf-event", post(notify_api::event_notification));

    Router::new()
        .nest(QOS_URI_PREFIX, qos)
        .nest(NOTIFY_URI_PREFIX, notify)
        .route("/health", get(health_check))
        .with_state(state)
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or_else(|_| {
            error!(status = self.status, "problem carries an invalid status");
            StatusCode::INTERNAL_SERVER_ERROR
        });
        (status, Json(self)).into_response()
    }
}

/// Decode a request body, mapping decode failures onto the malformed
/// cause.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ProblemDetails> {
    serde_json::from_str(body)
        .map_err(|e| ProblemDetails::malformed_request(format!("decode request body: {e}")))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "qos-exposure",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
