//! HTTP client for the Npcf_PolicyAuthorization service.

use super::{PolicyAuthorization, PolicyError};
use crate::domain::config::PcfConfig;
use crate::domain::error::{ExposureError, ProblemDetails};
use crate::domain::models::{AppSessionContext, AppSessionContextUpdateData};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

/// reqwest-backed policy authority client. Timeout and retry policy
/// live here, not in the coordinator.
pub struct PcfClient {
    http: reqwest::Client,
    base_url: String,
}

impl PcfClient {
    pub fn new(config: &PcfConfig) -> Result<Self, ExposureError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExposureError::Client(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn app_sessions_url(&self) -> String {
        format!("{}/app-sessions", self.base_url)
    }

    fn app_session_url(&self, app_session_id: &str) -> String {
        format!("{}/app-sessions/{app_session_id}", self.base_url)
    }

    /// Turn a non-success response into a `PolicyError`, preserving
    /// the authority's problem details when the body carries them.
    async fn problem_from(resp: reqwest::Response) -> PolicyError {
        let status = resp.status().as_u16();
        match resp.json::<ProblemDetails>().await {
            Ok(pd) => PolicyError::Problem(pd),
            Err(_) => PolicyError::Problem(ProblemDetails {
                status,
                title: None,
                cause: None,
                detail: Some(format!("policy authority returned status {status}")),
            }),
        }
    }
}

/// Extract the authority-assigned session id from a Location header
/// value, e.g. `.../app-sessions/42` -> `42`.
pub(crate) fn session_id_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

#[async_trait]
impl PolicyAuthorization for PcfClient {
    async fn create_app_session(&self, asc: &AppSessionContext) -> Result<String, PolicyError> {
        let resp = self
            .http
            .post(self.app_sessions_url())
            .json(asc)
            .send()
            .await
            .map_err(|e| PolicyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::problem_from(resp).await);
        }

        let app_session_id = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(session_id_from_location)
            .map(str::to_string)
            .ok_or_else(|| {
                PolicyError::Transport("create response missing Location header".into())
            })?;

        debug!(app_session_id, "policy authority created app session");
        Ok(app_session_id)
    }

    async fn update_app_session(
        &self,
        app_session_id: &str,
        update: &AppSessionContextUpdateData,
    ) -> Result<Option<AppSessionContext>, PolicyError> {
        let resp = self
            .http
            .patch(self.app_session_url(app_session_id))
            .json(update)
            .send()
            .await
            .map_err(|e| PolicyError::Transport(e.to_string()))?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => resp
                .json::<AppSessionContext>()
                .await
                .map(Some)
                .map_err(|e| PolicyError::Transport(format!("decode update response: {e}"))),
            _ => Err(Self::problem_from(resp).await),
        }
    }

    async fn delete_app_session(&self, app_session_id: &str) -> Result<u16, PolicyError> {
        // The policy authorization API deletes via a subresource post
        let url = format!("{}/delete", self.app_session_url(app_session_id));
        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| PolicyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::problem_from(resp).await);
        }
        Ok(resp.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_location() {
        assert_eq!(
            session_id_from_location("http://pcf/npcf-policyauthorization/v1/app-sessions/42"),
            Some("42")
        );
        assert_eq!(session_id_from_location("/app-sessions/abc/"), Some("abc"));
        assert_eq!(session_id_from_location(""), None);
        assert_eq!(session_id_from_location("///"), None);
    }

    #[test]
    fn test_urls() {
        let client = PcfClient::new(&PcfConfig::default()).unwrap();
        assert!(client.app_sessions_url().ends_with("/app-sessions"));
        assert!(client.app_session_url("7").ends_with("/app-sessions/7"));
    }
}
