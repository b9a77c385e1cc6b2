//! Per-requester context store.
//!
//! [`AfRegistry`] maps requester ids to their [`AfContext`]; each
//! context guards its resource maps and id counter behind its own
//! `tokio::sync::RwLock`.

pub mod af_context;
pub mod registry;

pub use af_context::{
    AfContext, AfState, EventSubscription, PfdTransaction, QosSession, QosSubscription,
    ResourceRef,
};
pub use registry::AfRegistry;
