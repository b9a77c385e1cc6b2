//! Create/read/update/delete coordination for QoS sessions and
//! subscriptions.
//!
//! Lifecycle per resource: Requested -> Active -> (Updating ->)
//! Active -> Deleted, no return from Deleted. A resource becomes
//! visible in its context only after the authority-side create has
//! succeeded, and leaves it only after a delete has succeeded; on any
//! failure the cached state is left untouched.

use super::{into_problem, Processor};
use crate::context::{QosSession, QosSubscription};
use crate::domain::error::ProblemDetails;
use crate::domain::models::{AppSessionContext, AppSessionContextUpdateData};
use tracing::info;
use uuid::Uuid;

/// Result of a successful create: the allocated resource id (used for
/// the Location reference) and the stored payload.
#[derive(Debug, Clone)]
pub struct CreatedResource {
    pub resource_id: String,
    pub payload: AppSessionContext,
}

/// Result of a successful update
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// The authority returned a representation; the cache now holds it
    Replaced(AppSessionContext),
    /// Accepted with no content; the cache is unchanged and the
    /// eventual state arrives via notification
    Accepted,
}

impl Processor {
    // ─── AF-owned QoS sessions ───────────────────────────────────────

    pub async fn create_session(
        &self,
        af_id: &str,
        asc: AppSessionContext,
    ) -> Result<CreatedResource, ProblemDetails> {
        let af = self.registry().get_or_create(af_id);
        let mut state = af.state().write().await;

        let app_sess_id = self
            .consumer
            .create_app_session(&asc)
            .await
            .map_err(into_problem)?;

        // Id allocation and insertion share the critical section the
        // authority call completed under; the resource is never
        // visible half-created.
        let sess_id = state.alloc_id();
        let notif_corr_id = Uuid::new_v4().to_string();
        info!(af_id, sess_id, app_sess_id, "created QoS session");
        state.add_session(QosSession {
            sess_id: sess_id.clone(),
            app_sess_id,
            notif_corr_id,
            payload: asc.clone(),
            last_update: None,
        });

        Ok(CreatedResource {
            resource_id: sess_id,
            payload: asc,
        })
    }

    pub async fn get_session(
        &self,
        af_id: &str,
        sess_id: &str,
    ) -> Result<AppSessionContext, ProblemDetails> {
        let af = self
            .registry()
            .get(af_id)
            .ok_or_else(|| ProblemDetails::data_not_found("AF is not found"))?;
        let state = af.state().read().await;
        // Clone while the shared lock is held; a reference must not
        // outlive the guard.
        state
            .session(sess_id)
            .map(|sess| sess.payload.clone())
            .ok_or_else(|| ProblemDetails::data_not_found("QoS session is not found"))
    }

    pub async fn update_session(
        &self,
        af_id: &str,
        sess_id: &str,
        update: AppSessionContextUpdateData,
    ) -> Result<UpdateOutcome, ProblemDetails> {
        let af = self
            .registry()
            .get(af_id)
            .ok_or_else(|| ProblemDetails::data_not_found("AF is not found"))?;
        let mut state = af.state().write().await;

        let app_sess_id = state
            .session(sess_id)
            .ok_or_else(|| ProblemDetails::data_not_found("QoS session is not found"))?
            .app_sess_id
            .clone();

        match self
            .consumer
            .update_app_session(&app_sess_id, &update)
            .await
            .map_err(into_problem)?
        {
            Some(asc) => {
                if let Some(sess) = state.session_mut(sess_id) {
                    sess.payload = asc.clone();
                }
                Ok(UpdateOutcome::Replaced(asc))
            }
            None => Ok(UpdateOutcome::Accepted),
        }
    }

    pub async fn delete_session(&self, af_id: &str, sess_id: &str) -> Result<u16, ProblemDetails> {
        let af = self
            .registry()
            .get(af_id)
            .ok_or_else(|| ProblemDetails::data_not_found("AF is not found"))?;
        let mut state = af.state().write().await;

        let app_sess_id = state
            .session(sess_id)
            .ok_or_else(|| ProblemDetails::data_not_found("QoS session is not found"))?
            .app_sess_id
            .clone();

        let status = self
            .consumer
            .delete_app_session(&app_sess_id)
            .await
            .map_err(into_problem)?;

        state.remove_session(sess_id);
        info!(af_id, sess_id, "deleted QoS session");

        Ok(normalize_delete_status(status))
    }

    // ─── SCS/AS-owned QoS subscriptions ──────────────────────────────

    pub async fn list_subscriptions(
        &self,
        scs_as_id: &str,
    ) -> Result<Vec<AppSessionContext>, ProblemDetails> {
        let af = self
            .registry()
            .get(scs_as_id)
            .ok_or_else(|| ProblemDetails::data_not_found("SCS/AS is not found"))?;
        let state = af.state().read().await;
        Ok(state.subscription_payloads())
    }

    pub async fn create_subscription(
        &self,
        scs_as_id: &str,
        asc: AppSessionContext,
    ) -> Result<CreatedResource, ProblemDetails> {
        let af = self.registry().get_or_create(scs_as_id);
        let mut state = af.state().write().await;

        let app_sess_id = self
            .consumer
            .create_app_session(&asc)
            .await
            .map_err(into_problem)?;

        let sub_id = state.alloc_id();
        let notif_corr_id = Uuid::new_v4().to_string();
        info!(scs_as_id, sub_id, app_sess_id, "created QoS subscription");
        state.add_subscription(QosSubscription {
            sub_id: sub_id.clone(),
            app_sess_id,
            notif_corr_id,
            payload: asc.clone(),
            last_update: None,
        });

        Ok(CreatedResource {
            resource_id: sub_id,
            payload: asc,
        })
    }

    pub async fn get_subscription(
        &self,
        scs_as_id: &str,
        sub_id: &str,
    ) -> Result<AppSessionContext, ProblemDetails> {
        let af = self
            .registry()
            .get(scs_as_id)
            .ok_or_else(|| ProblemDetails::data_not_found("SCS/AS is not found"))?;
        let state = af.state().read().await;
        state
            .subscription(sub_id)
            .map(|sub| sub.payload.clone())
            .ok_or_else(|| ProblemDetails::data_not_found("QoS subscription is not found"))
    }

    /// Shared by PUT (full replace) and PATCH (partial): the cache is
    /// overwritten only when the authority returns a representation.
    pub async fn update_subscription(
        &self,
        scs_as_id: &str,
        sub_id: &str,
        update: AppSessionContextUpdateData,
    ) -> Result<UpdateOutcome, ProblemDetails> {
        let af = self
            .registry()
            .get(scs_as_id)
            .ok_or_else(|| ProblemDetails::data_not_found("SCS/AS is not found"))?;
        let mut state = af.state().write().await;

        let app_sess_id = state
            .subscription(sub_id)
            .ok_or_else(|| ProblemDetails::data_not_found("QoS subscription is not found"))?
            .app_sess_id
            .clone();

        match self
            .consumer
            .update_app_session(&app_sess_id, &update)
            .await
            .map_err(into_problem)?
        {
            Some(asc) => {
                if let Some(sub) = state.subscription_mut(sub_id) {
                    sub.payload = asc.clone();
                }
                Ok(UpdateOutcome::Replaced(asc))
            }
            None => Ok(UpdateOutcome::Accepted),
        }
    }

    pub async fn delete_subscription(
        &self,
        scs_as_id: &str,
        sub_id: &str,
    ) -> Result<u16, ProblemDetails> {
        let af = self
            .registry()
            .get(scs_as_id)
            .ok_or_else(|| ProblemDetails::data_not_found("SCS/AS is not found"))?;
        let mut state = af.state().write().await;

        let app_sess_id = state
            .subscription(sub_id)
            .ok_or_else(|| ProblemDetails::data_not_found("QoS subscription is not found"))?
            .app_sess_id
            .clone();

        let status = self
            .consumer
            .delete_app_session(&app_sess_id)
            .await
            .map_err(into_problem)?;

        state.remove_subscription(sub_id);
        info!(scs_as_id, sub_id, "deleted QoS subscription");

        Ok(normalize_delete_status(status))
    }
}

/// The authority's exact delete status passes through, except that an
/// unset status maps to 204.
fn normalize_delete_status(status: u16) -> u16 {
    if status == 0 {
        204
    } else {
        status
    }
}
