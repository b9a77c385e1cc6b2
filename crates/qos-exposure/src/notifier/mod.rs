//! Best-effort delivery of notifications to requester callback
//! endpoints. Delivery failure is logged by the caller and never
//! surfaces to whoever triggered the notification.

use crate::domain::error::ExposureError;
use crate::domain::models::AppSessionContextUpdateData;
use async_trait::async_trait;
use std::time::Duration;

/// Header tagging an outbound notification with the resource's
/// correlation token.
pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

/// Delivery failure detail, for logging only
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("notification URI missing in stored request data")]
    MissingUri,
    #[error("callback endpoint returned status {0}")]
    Status(u16),
    #[error("callback transport error: {0}")]
    Transport(String),
}

/// Sink for requester-bound notifications
#[async_trait]
pub trait CallbackSink: Send + Sync {
    async fn deliver(
        &self,
        notif_uri: &str,
        corr_id: &str,
        update: &AppSessionContextUpdateData,
    ) -> Result<(), ForwardError>;
}

/// HTTP sink posting the update to the requester's registered endpoint
pub struct HttpCallbackSink {
    http: reqwest::Client,
}

impl HttpCallbackSink {
    pub fn new(timeout: Duration) -> Result<Self, ExposureError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExposureError::Client(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CallbackSink for HttpCallbackSink {
    async fn deliver(
        &self,
        notif_uri: &str,
        corr_id: &str,
        update: &AppSessionContextUpdateData,
    ) -> Result<(), ForwardError> {
        let resp = self
            .http
            .post(notif_uri)
            .header(CORRELATION_HEADER, corr_id)
            .json(update)
            .send()
            .await
            .map_err(|e| ForwardError::Transport(e.to_string()))?;

        if resp.status().as_u16() >= 300 {
            return Err(ForwardError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
