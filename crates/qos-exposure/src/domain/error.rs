//! Error types for the exposure core.
//!
//! The protocol surface speaks `ProblemDetails` (the structured error
//! object exchanged with requesters and the policy authority). The
//! core never invents causes beyond a fixed local set; authority
//! problems pass through verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable causes minted locally. Anything else on the wire
/// originated at the policy authority and is forwarded unchanged.
pub mod causes {
    pub const DATA_NOT_FOUND: &str = "DATA_NOT_FOUND";
    pub const MALFORMED_REQUEST: &str = "MALFORMED_REQUEST";
    pub const SYSTEM_FAILURE: &str = "SYSTEM_FAILURE";
}

/// Structured problem report exchanged at the protocol boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// HTTP status to report
    pub status: u16,
    /// Short human-readable summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Machine-readable cause token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Free-text detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    /// Create a problem with an explicit status and cause
    pub fn new(status: u16, cause: &str, detail: impl Into<String>) -> Self {
        Self {
            status,
            title: None,
            cause: Some(cause.to_string()),
            detail: Some(detail.into()),
        }
    }

    /// Requester, session, or subscription absent (404)
    pub fn data_not_found(detail: impl Into<String>) -> Self {
        Self::new(404, causes::DATA_NOT_FOUND, detail)
    }

    /// Request body could not be decoded (400)
    pub fn malformed_request(detail: impl Into<String>) -> Self {
        Self::new(400, causes::MALFORMED_REQUEST, detail)
    }

    /// Unexpected local or transport error (500)
    pub fn system_failure(detail: impl Into<String>) -> Self {
        Self::new(500, causes::SYSTEM_FAILURE, detail)
    }

    /// True when the problem carries one of the locally minted causes
    pub fn is_local(&self) -> bool {
        matches!(
            self.cause.as_deref(),
            Some(causes::DATA_NOT_FOUND)
                | Some(causes::MALFORMED_REQUEST)
                | Some(causes::SYSTEM_FAILURE)
        )
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.status,
            self.cause.as_deref().unwrap_or("UNSPECIFIED"),
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Service-level errors (startup and plumbing, not protocol errors)
#[derive(Debug, thiserror::Error)]
pub enum ExposureError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Outbound HTTP client construction error
    #[error("http client error: {0}")]
    Client(String),

    /// Server runtime error
    #[error("server error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_causes() {
        let pd = ProblemDetails::data_not_found("AF is not found");
        assert_eq!(pd.status, 404);
        assert_eq!(pd.cause.as_deref(), Some(causes::DATA_NOT_FOUND));
        assert!(pd.is_local());

        let pd = ProblemDetails::malformed_request("bad json");
        assert_eq!(pd.status, 400);

        let pd = ProblemDetails::system_failure("pcf unreachable");
        assert_eq!(pd.status, 500);
    }

    #[test]
    fn test_passthrough_is_not_local() {
        let pd = ProblemDetails::new(403, "REQUESTED_SERVICE_NOT_AUTHORIZED", "denied");
        assert!(!pd.is_local());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let pd = ProblemDetails {
            status: 404,
            title: None,
            cause: Some(causes::DATA_NOT_FOUND.into()),
            detail: None,
        };
        let json = serde_json::to_string(&pd).unwrap();
        assert!(json.contains("DATA_NOT_FOUND"));
        assert!(!json.contains("title"));
        assert!(!json.contains("detail"));
    }

    #[test]
    fn test_round_trip() {
        let pd = ProblemDetails::system_failure("boom");
        let json = serde_json::to_string(&pd).unwrap();
        let parsed: ProblemDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(pd, parsed);
    }
}
