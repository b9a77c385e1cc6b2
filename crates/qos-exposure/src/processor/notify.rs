//! Routing of inbound policy-authority notifications.
//!
//! Forwarding to the requester's callback endpoint is best effort:
//! once the correlation token resolves, the inbound notifier is
//! acknowledged no matter what happens downstream, so a requester
//! outage cannot trigger redelivery storms from the authority.

use super::Processor;
use crate::context::ResourceRef;
use crate::domain::error::ProblemDetails;
use crate::domain::models::AppSessionContextUpdateData;
use tracing::{info, warn};

impl Processor {
    /// Route a QoS notification carrying a correlation token; sessions
    /// and subscriptions share the mechanism.
    pub async fn handle_qos_notification(
        &self,
        corr_id: &str,
        update: Option<AppSessionContextUpdateData>,
    ) -> Result<(), ProblemDetails> {
        info!(corr_id, "QoS notification received");

        let Some((af, resource)) = self.registry().find_by_correlation(corr_id).await else {
            return Err(ProblemDetails::data_not_found(
                "no resource matches the correlation id",
            ));
        };

        let mut state = af.state().write().await;

        // The resource may have been deleted between the scan and
        // taking the exclusive lock.
        let (payload, last_update) = match &resource {
            ResourceRef::Session(sess_id) => state
                .session_mut(sess_id)
                .map(|sess| (&sess.payload, &mut sess.last_update)),
            ResourceRef::Subscription(sub_id) => state
                .subscription_mut(sub_id)
                .map(|sub| (&sub.payload, &mut sub.last_update)),
        }
        .ok_or_else(|| {
            ProblemDetails::data_not_found("no resource matches the correlation id")
        })?;

        // Last write wins: the carried update wholesale replaces the
        // stored one, no field-level diffing.
        if let Some(ref carried) = update {
            *last_update = Some(carried.clone());
        }

        let notif_uri = payload.notif_uri().map(str::to_string);
        let forwarded = update.unwrap_or_default();

        match notif_uri {
            Some(uri) => {
                if let Err(e) = self.sink.deliver(&uri, corr_id, &forwarded).await {
                    warn!(corr_id, uri, error = %e, "failed to forward QoS notification");
                }
            }
            None => {
                warn!(corr_id, "no notification URI registered, dropping forward");
            }
        }

        Ok(())
    }

    /// Legacy event-exposure notification path: resolve by
    /// notification id and acknowledge. No local state is mutated, so
    /// a shared lock suffices.
    pub async fn handle_event_notification(&self, notif_id: &str) -> Result<(), ProblemDetails> {
        info!(notif_id, "event exposure notification received");

        let Some((af, sub_id)) = self.registry().find_event_subscription(notif_id).await else {
            return Err(ProblemDetails::data_not_found("subscription is not found"));
        };

        let _state = af.state().read().await;
        // TODO: forward the event to the AF once the legacy surface
        // defines a delivery endpoint for it
        let _ = sub_id;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EventSubscription;
    use crate::processor::testing::{asc_with_uri, test_processor};
    use std::sync::atomic::Ordering;

    async fn corr_id_of(processor: &Processor, af_id: &str, sess_id: &str) -> String {
        let af = processor.registry().get(af_id).unwrap();
        let state = af.state().read().await;
        state.session(sess_id).unwrap().notif_corr_id.clone()
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found_and_mutates_nothing() {
        let (processor, _, sink) = test_processor();
        processor
            .create_session("af1", asc_with_uri("http://af.example/cb"))
            .await
            .unwrap();

        let err = processor
            .handle_qos_notification("no-such-token", Some(Default::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status, 404);
        assert!(sink.deliveries.lock().unwrap().is_empty());

        let af = processor.registry().get("af1").unwrap();
        let state = af.state().read().await;
        assert!(state.session("1").unwrap().last_update.is_none());
    }

    #[tokio::test]
    async fn test_resolved_token_merges_and_forwards() {
        let (processor, _, sink) = test_processor();
        let created = processor
            .create_session("af1", asc_with_uri("http://af.example/cb"))
            .await
            .unwrap();
        let corr_id = corr_id_of(&processor, "af1", &created.resource_id).await;

        let update = AppSessionContextUpdateData {
            notif_uri: Some("http://af.example/cb-new".into()),
            ..Default::default()
        };
        processor
            .handle_qos_notification(&corr_id, Some(update.clone()))
            .await
            .unwrap();

        let deliveries = sink.deliveries.lock().unwrap().clone();
        assert_eq!(deliveries, vec![("http://af.example/cb".to_string(), corr_id)]);

        let af = processor.registry().get("af1").unwrap();
        let state = af.state().read().await;
        assert_eq!(
            state.session(&created.resource_id).unwrap().last_update,
            Some(update)
        );
    }

    #[tokio::test]
    async fn test_last_write_wins_merge() {
        let (processor, _, _) = test_processor();
        let created = processor
            .create_session("af1", asc_with_uri("http://af.example/cb"))
            .await
            .unwrap();
        let corr_id = corr_id_of(&processor, "af1", &created.resource_id).await;

        let first = AppSessionContextUpdateData {
            notif_uri: Some("http://first".into()),
            ..Default::default()
        };
        let second = AppSessionContextUpdateData {
            notif_uri: Some("http://second".into()),
            ..Default::default()
        };
        processor
            .handle_qos_notification(&corr_id, Some(first))
            .await
            .unwrap();
        processor
            .handle_qos_notification(&corr_id, Some(second.clone()))
            .await
            .unwrap();

        let af = processor.registry().get("af1").unwrap();
        let state = af.state().read().await;
        assert_eq!(
            state.session(&created.resource_id).unwrap().last_update,
            Some(second)
        );
    }

    #[tokio::test]
    async fn test_forwarding_failure_still_acknowledged() {
        let (processor, _, sink) = test_processor();
        let created = processor
            .create_session("af1", asc_with_uri("http://af.example/cb"))
            .await
            .unwrap();
        let corr_id = corr_id_of(&processor, "af1", &created.resource_id).await;

        sink.fail.store(true, Ordering::SeqCst);
        processor
            .handle_qos_notification(&corr_id, Some(Default::default()))
            .await
            .unwrap();
        assert_eq!(sink.deliveries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_notif_uri_skips_forwarding() {
        let (processor, _, sink) = test_processor();
        let created = processor
            .create_session("af1", Default::default())
            .await
            .unwrap();
        let corr_id = corr_id_of(&processor, "af1", &created.resource_id).await;

        processor
            .handle_qos_notification(&corr_id, Some(Default::default()))
            .await
            .unwrap();
        assert!(sink.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_notifications_use_the_same_path() {
        let (processor, _, sink) = test_processor();
        let created = processor
            .create_subscription("scs1", asc_with_uri("http://as.example/cb"))
            .await
            .unwrap();

        let corr_id = {
            let af = processor.registry().get("scs1").unwrap();
            let state = af.state().read().await;
            state
                .subscription(&created.resource_id)
                .unwrap()
                .notif_corr_id
                .clone()
        };

        processor
            .handle_qos_notification(&corr_id, Some(Default::default()))
            .await
            .unwrap();
        assert_eq!(sink.deliveries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_event_notification_resolution() {
        let (processor, _, sink) = test_processor();
        let af = processor.registry().get_or_create("legacy-af");
        {
            let mut state = af.state().write().await;
            let sub_id = state.alloc_id();
            state.add_event_subscription(EventSubscription {
                sub_id,
                notif_id: "ee-1".into(),
            });
        }

        processor.handle_event_notification("ee-1").await.unwrap();
        // Pass-through acknowledgement only; nothing is forwarded
        assert!(sink.deliveries.lock().unwrap().is_empty());

        let err = processor
            .handle_event_notification("ee-404")
            .await
            .unwrap_err();
        assert_eq!(err.status, 404);
    }
}
