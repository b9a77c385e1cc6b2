//! Per-requester mutable state.
//!
//! Every mutation of the maps or the id counter happens through a held
//! write guard on [`AfContext::state`]; the state type itself never
//! re-enters locking. Id allocation is therefore always in the same
//! critical section as the map insertion it accompanies.

use crate::domain::models::{AppSessionContext, AppSessionContextUpdateData};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// An AF-owned QoS session (single-resource-per-request pattern)
#[derive(Debug, Clone)]
pub struct QosSession {
    /// Resource id, allocated from the owning context's sequence
    pub sess_id: String,
    /// Session id assigned by the policy authority
    pub app_sess_id: String,
    /// Correlation token, stable for the resource's lifetime
    pub notif_corr_id: String,
    /// Last known resource representation
    pub payload: AppSessionContext,
    /// Most recent partial update carried by a notification
    pub last_update: Option<AppSessionContextUpdateData>,
}

/// An SCS/AS-owned QoS subscription (subscribe/notify pattern)
#[derive(Debug, Clone)]
pub struct QosSubscription {
    pub sub_id: String,
    pub app_sess_id: String,
    pub notif_corr_id: String,
    pub payload: AppSessionContext,
    pub last_update: Option<AppSessionContextUpdateData>,
}

/// Legacy event-exposure subscription, resolved by notification id
#[derive(Debug, Clone)]
pub struct EventSubscription {
    pub sub_id: String,
    pub notif_id: String,
}

/// Legacy PFD transaction holding registered application ids
#[derive(Debug, Clone)]
pub struct PfdTransaction {
    pub trans_id: String,
    pub app_ids: HashSet<String>,
}

/// Names a resource inside a context without borrowing its state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Session(String),
    Subscription(String),
}

/// Per-requester context: resource maps plus the scoped id sequence
pub struct AfContext {
    af_id: String,
    state: RwLock<AfState>,
}

impl AfContext {
    pub fn new(af_id: &str) -> Self {
        Self {
            af_id: af_id.to_string(),
            state: RwLock::new(AfState::default()),
        }
    }

    /// Requester identifier this context belongs to
    pub fn af_id(&self) -> &str {
        &self.af_id
    }

    /// The guarded state. Callers hold the guard in the correct mode
    /// for the full extent of their operation.
    pub fn state(&self) -> &RwLock<AfState> {
        &self.state
    }
}

/// The state guarded by an [`AfContext`]'s lock
#[derive(Default)]
pub struct AfState {
    sessions: HashMap<String, QosSession>,
    subscriptions: HashMap<String, QosSubscription>,
    event_subs: HashMap<String, EventSubscription>,
    transactions: HashMap<String, PfdTransaction>,
    next_id: u64,
}

impl AfState {
    /// Allocate the next resource id: strictly increasing, never
    /// reused within the context's lifetime. Only reachable through a
    /// held write guard.
    pub fn alloc_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    pub fn add_session(&mut self, sess: QosSession) {
        self.sessions.insert(sess.sess_id.clone(), sess);
    }

    pub fn session(&self, sess_id: &str) -> Option<&QosSession> {
        self.sessions.get(sess_id)
    }

    pub fn session_mut(&mut self, sess_id: &str) -> Option<&mut QosSession> {
        self.sessions.get_mut(sess_id)
    }

    pub fn remove_session(&mut self, sess_id: &str) -> Option<QosSession> {
        self.sessions.remove(sess_id)
    }

    pub fn add_subscription(&mut self, sub: QosSubscription) {
        self.subscriptions.insert(sub.sub_id.clone(), sub);
    }

    pub fn subscription(&self, sub_id: &str) -> Option<&QosSubscription> {
        self.subscriptions.get(sub_id)
    }

    pub fn subscription_mut(&mut self, sub_id: &str) -> Option<&mut QosSubscription> {
        self.subscriptions.get_mut(sub_id)
    }

    pub fn remove_subscription(&mut self, sub_id: &str) -> Option<QosSubscription> {
        self.subscriptions.remove(sub_id)
    }

    /// Payloads of every subscription owned by this context
    pub fn subscription_payloads(&self) -> Vec<AppSessionContext> {
        self.subscriptions
            .values()
            .map(|sub| sub.payload.clone())
            .collect()
    }

    pub fn add_event_subscription(&mut self, sub: EventSubscription) {
        self.event_subs.insert(sub.sub_id.clone(), sub);
    }

    /// Resolve a legacy event-exposure subscription by notification id
    pub fn find_event_subscription(&self, notif_id: &str) -> Option<&EventSubscription> {
        self.event_subs.values().find(|sub| sub.notif_id == notif_id)
    }

    pub fn add_transaction(&mut self, trans: PfdTransaction) {
        self.transactions.insert(trans.trans_id.clone(), trans);
    }

    /// Reject re-registering an application id already bound to a
    /// transaction; returns the owning transaction id.
    pub fn find_duplicate_registration(&self, app_id: &str) -> Option<&str> {
        self.transactions
            .values()
            .find(|trans| trans.app_ids.contains(app_id))
            .map(|trans| trans.trans_id.as_str())
    }

    /// Resolve a correlation token to the resource carrying it. At
    /// most one resource in a context carries a given token.
    pub fn find_by_correlation(&self, corr_id: &str) -> Option<ResourceRef> {
        if let Some(sess) = self
            .sessions
            .values()
            .find(|sess| sess.notif_corr_id == corr_id)
        {
            return Some(ResourceRef::Session(sess.sess_id.clone()));
        }
        self.subscriptions
            .values()
            .find(|sub| sub.notif_corr_id == corr_id)
            .map(|sub| ResourceRef::Subscription(sub.sub_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(state: &mut AfState, corr: &str) -> String {
        let id = state.alloc_id();
        state.add_session(QosSession {
            sess_id: id.clone(),
            app_sess_id: format!("pcf-{id}"),
            notif_corr_id: corr.to_string(),
            payload: AppSessionContext::default(),
            last_update: None,
        });
        id
    }

    #[test]
    fn test_alloc_id_strictly_increasing() {
        let mut state = AfState::default();
        let a: u64 = state.alloc_id().parse().unwrap();
        let b: u64 = state.alloc_id().parse().unwrap();
        let c: u64 = state.alloc_id().parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut state = AfState::default();
        let first = session(&mut state, "corr-1");
        state.remove_session(&first);
        let second = session(&mut state, "corr-2");
        assert_ne!(first, second);
        assert!(second.parse::<u64>().unwrap() > first.parse::<u64>().unwrap());
    }

    #[test]
    fn test_find_by_correlation_prefers_owner() {
        let mut state = AfState::default();
        let sess_id = session(&mut state, "corr-sess");
        let sub_id = state.alloc_id();
        state.add_subscription(QosSubscription {
            sub_id: sub_id.clone(),
            app_sess_id: "pcf-sub".into(),
            notif_corr_id: "corr-sub".into(),
            payload: AppSessionContext::default(),
            last_update: None,
        });

        assert_eq!(
            state.find_by_correlation("corr-sess"),
            Some(ResourceRef::Session(sess_id))
        );
        assert_eq!(
            state.find_by_correlation("corr-sub"),
            Some(ResourceRef::Subscription(sub_id))
        );
        assert_eq!(state.find_by_correlation("corr-none"), None);
    }

    #[test]
    fn test_duplicate_registration_guard() {
        let mut state = AfState::default();
        let trans_id = state.alloc_id();
        state.add_transaction(PfdTransaction {
            trans_id: trans_id.clone(),
            app_ids: ["app-a".to_string(), "app-b".to_string()].into(),
        });

        assert_eq!(
            state.find_duplicate_registration("app-a"),
            Some(trans_id.as_str())
        );
        assert_eq!(state.find_duplicate_registration("app-z"), None);
    }

    #[test]
    fn test_event_subscription_lookup() {
        let mut state = AfState::default();
        let sub_id = state.alloc_id();
        state.add_event_subscription(EventSubscription {
            sub_id: sub_id.clone(),
            notif_id: "ee-1".into(),
        });

        assert_eq!(
            state.find_event_subscription("ee-1").map(|s| &s.sub_id),
            Some(&sub_id)
        );
        assert!(state.find_event_subscription("ee-2").is_none());
    }
}
