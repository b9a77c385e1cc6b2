//! Request processing: the CRUD coordinator for QoS resources and the
//! router for inbound policy-authority notifications.

pub mod notify;
pub mod qos;

pub use qos::{CreatedResource, UpdateOutcome};

use crate::consumer::{PolicyAuthorization, PolicyError};
use crate::context::AfRegistry;
use crate::domain::error::ProblemDetails;
use crate::notifier::CallbackSink;
use std::sync::Arc;

/// Coordinates requester-facing operations against the context store
/// and the policy authority.
pub struct Processor {
    registry: Arc<AfRegistry>,
    consumer: Arc<dyn PolicyAuthorization>,
    sink: Arc<dyn CallbackSink>,
}

impl Processor {
    pub fn new(
        registry: Arc<AfRegistry>,
        consumer: Arc<dyn PolicyAuthorization>,
        sink: Arc<dyn CallbackSink>,
    ) -> Self {
        Self {
            registry,
            consumer,
            sink,
        }
    }

    pub fn registry(&self) -> &Arc<AfRegistry> {
        &self.registry
    }
}

/// Map a policy-authority failure onto the upward error surface: a
/// structured problem passes through verbatim, a transport failure
/// becomes a generic system failure.
pub(crate) fn into_problem(err: PolicyError) -> ProblemDetails {
    match err {
        PolicyError::Problem(pd) => pd,
        PolicyError::Transport(detail) => ProblemDetails::system_failure(detail),
    }
}
