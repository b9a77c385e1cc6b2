//! Wire payload models.
//!
//! Field-level QoS semantics are out of scope for the core: payloads
//! are cached and relayed as-is. Only the handful of fields the core
//! must inspect (notification URI, application id, notification id)
//! are typed; everything else rides in a flattened map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application session context, the resource representation exchanged
/// with requesters and relayed to the policy authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSessionContext {
    /// Requested session parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc_req_data: Option<AscReqData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppSessionContext {
    /// Callback endpoint registered by the requester, if any
    pub fn notif_uri(&self) -> Option<&str> {
        self.asc_req_data
            .as_ref()
            .map(|d| d.notif_uri.as_str())
            .filter(|u| !u.is_empty())
    }
}

/// Requested session data inside an [`AppSessionContext`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AscReqData {
    /// Endpoint the requester wants notifications delivered to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notif_uri: String,
    /// Application identifier, used by the duplicate-registration guard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub af_app_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update of an application session context. The policy
/// authority also carries this shape in its asynchronous notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSessionContextUpdateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notif_uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Legacy event-exposure notification, resolved by notification id
/// rather than correlation token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventExposureNotification {
    pub notif_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_notifs: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
