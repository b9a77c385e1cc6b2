//! Handlers for the QoS session and subscription resource surface.

use super::{decode_body, AppState, QOS_URI_PREFIX};
use crate::processor::UpdateOutcome;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

fn session_uri(af_id: &str, sess_id: &str) -> String {
    format!("{QOS_URI_PREFIX}/{af_id}/sessions/{sess_id}")
}

fn subscription_uri(scs_as_id: &str, sub_id: &str) -> String {
    format!("{QOS_URI_PREFIX}/{scs_as_id}/subscriptions/{sub_id}")
}

fn update_response(outcome: UpdateOutcome) -> Response {
    match outcome {
        UpdateOutcome::Replaced(asc) => (StatusCode::OK, Json(asc)).into_response(),
        UpdateOutcome::Accepted => StatusCode::NO_CONTENT.into_response(),
    }
}

fn delete_response(status: u16) -> Response {
    StatusCode::from_u16(status)
        .unwrap_or(StatusCode::NO_CONTENT)
        .into_response()
}

// ─── Sessions ────────────────────────────────────────────────────────

pub(crate) async fn post_session(
    State(state): State<AppState>,
    Path(af_id): Path<String>,
    body: String,
) -> Response {
    let asc = match decode_body(&body) {
        Ok(asc) => asc,
        Err(pd) => return pd.into_response(),
    };
    match state.processor.create_session(&af_id, asc).await {
        Ok(created) => (
            StatusCode::CREATED,
            [(header::LOCATION, session_uri(&af_id, &created.resource_id))],
            Json(created.payload),
        )
            .into_response(),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn get_session(
    State(state): State<AppState>,
    Path((af_id, sess_id)): Path<(String, String)>,
) -> Response {
    match state.processor.get_session(&af_id, &sess_id).await {
        Ok(asc) => (StatusCode::OK, Json(asc)).into_response(),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn put_session(
    state: State<AppState>,
    path: Path<(String, String)>,
    body: String,
) -> Response {
    update_session(state, path, body).await
}

pub(crate) async fn patch_session(
    state: State<AppState>,
    path: Path<(String, String)>,
    body: String,
) -> Response {
    update_session(state, path, body).await
}

async fn update_session(
    State(state): State<AppState>,
    Path((af_id, sess_id)): Path<(String, String)>,
    body: String,
) -> Response {
    let update = match decode_body(&body) {
        Ok(update) => update,
        Err(pd) => return pd.into_response(),
    };
    match state
        .processor
        .update_session(&af_id, &sess_id, update)
        .await
    {
        Ok(outcome) => update_response(outcome),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn delete_session(
    State(state): State<AppState>,
    Path((af_id, sess_id)): Path<(String, String)>,
) -> Response {
    match state.processor.delete_session(&af_id, &sess_id).await {
        Ok(status) => delete_response(status),
        Err(pd) => pd.into_response(),
    }
}

// ─── Subscriptions ───────────────────────────────────────────────────

pub(crate) async fn list_subscriptions(
    State(state): State<AppState>,
    Path(scs_as_id): Path<String>,
) -> Response {
    match state.processor.list_subscriptions(&scs_as_id).await {
        Ok(subs) => (StatusCode::OK, Json(subs)).into_response(),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn post_subscription(
    State(state): State<AppState>,
    Path(scs_as_id): Path<String>,
    body: String,
) -> Response {
    let asc = match decode_body(&body) {
        Ok(asc) => asc,
        Err(pd) => return pd.into_response(),
    };
    match state.processor.create_subscription(&scs_as_id, asc).await {
        Ok(created) => (
            StatusCode::CREATED,
            [(
                header::LOCATION,
                subscription_uri(&scs_as_id, &created.resource_id),
            )],
            Json(created.payload),
        )
            .into_response(),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn get_subscription(
    State(state): State<AppState>,
    Path((scs_as_id, sub_id)): Path<(String, String)>,
) -> Response {
    match state.processor.get_subscription(&scs_as_id, &sub_id).await {
        Ok(asc) => (StatusCode::OK, Json(asc)).into_response(),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn put_subscription(
    state: State<AppState>,
    path: Path<(String, String)>,
    body: String,
) -> Response {
    update_subscription(state, path, body).await
}

pub(crate) async fn patch_subscription(
    state: State<AppState>,
    path: Path<(String, String)>,
    body: String,
) -> Response {
    update_subscription(state, path, body).await
}

async fn update_subscription(
    State(state): State<AppState>,
    Path((scs_as_id, sub_id)): Path<(String, String)>,
    body: String,
) -> Response {
    let update = match decode_body(&body) {
        Ok(update) => update,
        Err(pd) => return pd.into_response(),
    };
    match state
        .processor
        .update_subscription(&scs_as_id, &sub_id, update)
        .await
    {
        Ok(outcome) => update_response(outcome),
        Err(pd) => pd.into_response(),
    }
}

pub(crate) async fn delete_subscription(
    State(state): State<AppState>,
    Path((scs_as_id, sub_id)): Path<(String, String)>,
) -> Response {
    match state
        .processor
        .delete_subscription(&scs_as_id, &sub_id)
        .await
    {
        Ok(status) => delete_response(status),
        Err(pd) => pd.into_response(),
    }
}
