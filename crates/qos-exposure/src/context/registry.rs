//! Process-wide registry of requester contexts.

use crate::context::af_context::{AfContext, ResourceRef};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Map from requester id to its context. Created once at startup and
/// passed by reference to every handler; never a global.
pub struct AfRegistry {
    afs: DashMap<String, Arc<AfContext>>,
}

impl AfRegistry {
    pub fn new() -> Self {
        Self {
            afs: DashMap::new(),
        }
    }

    /// Return the existing context or atomically install a new one.
    /// Concurrent first-time callers for the same id all observe the
    /// same instance.
    pub fn get_or_create(&self, af_id: &str) -> Arc<AfContext> {
        self.afs
            .entry(af_id.to_string())
            .or_insert_with(|| {
                debug!(af_id, "creating AF context");
                Arc::new(AfContext::new(af_id))
            })
            .clone()
    }

    /// Lookup only, never creates
    pub fn get(&self, af_id: &str) -> Option<Arc<AfContext>> {
        self.afs.get(af_id).map(|entry| entry.clone())
    }

    /// Number of known contexts
    pub fn len(&self) -> usize {
        self.afs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.afs.is_empty()
    }

    /// Resolve a correlation token to its owning context and resource.
    ///
    /// Full scan over every context's resource maps, an accepted cost
    /// at this system's scale. The registry map is snapshotted first
    /// so no shard lock is held while a context lock is taken, and
    /// only one context's lock is held at a time.
    pub async fn find_by_correlation(
        &self,
        corr_id: &str,
    ) -> Option<(Arc<AfContext>, ResourceRef)> {
        let contexts: Vec<Arc<AfContext>> =
            self.afs.iter().map(|entry| entry.value().clone()).collect();

        for af in contexts {
            let state = af.state().read().await;
            if let Some(resource) = state.find_by_correlation(corr_id) {
                drop(state);
                return Some((af, resource));
            }
        }
        None
    }

    /// Resolve a legacy event-exposure subscription by notification
    /// id; returns the owning context and subscription id.
    pub async fn find_event_subscription(
        &self,
        notif_id: &str,
    ) -> Option<(Arc<AfContext>, String)> {
        let contexts: Vec<Arc<AfContext>> =
            self.afs.iter().map(|entry| entry.value().clone()).collect();

        for af in contexts {
            let state = af.state().read().await;
            if let Some(sub) = state.find_event_subscription(notif_id) {
                let sub_id = sub.sub_id.clone();
                drop(state);
                return Some((af, sub_id));
            }
        }
        None
    }
}

impl Default for AfRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::af_context::{EventSubscription, QosSession};
    use crate::domain::models::AppSessionContext;

    #[test]
    fn test_get_does_not_create() {
        let registry = AfRegistry::new();
        assert!(registry.get("af1").is_none());
        assert!(registry.is_empty());

        let af = registry.get_or_create("af1");
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&af, &registry.get("af1").unwrap()));
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_installs_one_context() {
        let registry = Arc::new(AfRegistry::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.get_or_create("newaf") })
            })
            .collect();

        let mut contexts = Vec::new();
        for handle in handles {
            contexts.push(handle.await.unwrap());
        }

        assert_eq!(registry.len(), 1);
        for ctx in &contexts[1..] {
            assert!(Arc::ptr_eq(&contexts[0], ctx));
        }
    }

    #[tokio::test]
    async fn test_find_by_correlation_across_contexts() {
        let registry = AfRegistry::new();
        for af_id in ["af1", "af2", "af3"] {
            let af = registry.get_or_create(af_id);
            let mut state = af.state().write().await;
            let sess_id = state.alloc_id();
            state.add_session(QosSession {
                sess_id: sess_id.clone(),
                app_sess_id: format!("pcf-{af_id}"),
                notif_corr_id: format!("corr-{af_id}"),
                payload: AppSessionContext::default(),
                last_update: None,
            });
        }

        let (af, resource) = registry.find_by_correlation("corr-af2").await.unwrap();
        assert_eq!(af.af_id(), "af2");
        assert!(matches!(resource, ResourceRef::Session(_)));

        assert!(registry.find_by_correlation("corr-missing").await.is_none());
    }

    #[tokio::test]
    async fn test_find_event_subscription() {
        let registry = AfRegistry::new();
        let af = registry.get_or_create("legacy-af");
        {
            let mut state = af.state().write().await;
            let sub_id = state.alloc_id();
            state.add_event_subscription(EventSubscription {
                sub_id,
                notif_id: "ee-9".into(),
            });
        }

        let (found, sub_id) = registry.find_event_subscription("ee-9").await.unwrap();
        assert_eq!(found.af_id(), "legacy-af");
        assert_eq!(sub_id, "1");

        assert!(registry.find_event_subscription("ee-0").await.is_none());
    }
}
