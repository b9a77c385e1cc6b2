//! Outbound port to the policy authority.
//!
//! The coordinator only ever talks to the authority through
//! [`PolicyAuthorization`]; the production implementation is the
//! reqwest-backed [`PcfClient`].

pub mod pcf;

pub use pcf::PcfClient;

use crate::domain::error::ProblemDetails;
use crate::domain::models::{AppSessionContext, AppSessionContextUpdateData};
use async_trait::async_trait;
use std::fmt;

/// Failure modes of a policy-authority call. A structured problem
/// passes through to the requester verbatim and takes precedence over
/// the generic system-failure mapping a transport error gets.
#[derive(Debug, Clone)]
pub enum PolicyError {
    /// The authority returned a structured problem report
    Problem(ProblemDetails),
    /// The call itself failed (connect, timeout, decode)
    Transport(String),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Problem(pd) => write!(f, "policy authority problem: {pd}"),
            Self::Transport(e) => write!(f, "policy authority transport error: {e}"),
        }
    }
}

impl std::error::Error for PolicyError {}

/// Client contract for the policy authorization service
#[async_trait]
pub trait PolicyAuthorization: Send + Sync {
    /// Create an app session; returns the authority-assigned session id
    async fn create_app_session(&self, asc: &AppSessionContext) -> Result<String, PolicyError>;

    /// Update an app session. `Ok(None)` means the authority accepted
    /// the update without returning a representation (the eventual
    /// state arrives via notification).
    async fn update_app_session(
        &self,
        app_session_id: &str,
        update: &AppSessionContextUpdateData,
    ) -> Result<Option<AppSessionContext>, PolicyError>;

    /// Delete an app session; returns the authority's status code
    async fn delete_app_session(&self, app_session_id: &str) -> Result<u16, PolicyError>;
}
