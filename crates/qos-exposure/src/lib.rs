// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! QoS Exposure Core - northbound QoS session/subscription API.
//!
//! This crate lets external Application Functions (AFs) and SCS/AS
//! clients request quality-of-service treatment for their traffic. It
//! relays create/update/delete requests to the policy authority (PCF)
//! and routes the authority's asynchronous notifications back to the
//! owning resource and onward to the requester's callback endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     QOS EXPOSURE CORE                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐        ┌───────────────────┐              │
//! │  │  SBI (axum)  │───────▶│     Processor     │              │
//! │  │  sessions /  │        │  CRUD coordinator │              │
//! │  │ subscriptions│        │  + notif router   │              │
//! │  └──────────────┘        └───┬───────────┬───┘              │
//! │                              │           │                  │
//! │                      ┌───────┴────┐  ┌───┴────────────┐     │
//! │                      │ AfRegistry │  │ PolicyAuth port│     │
//! │                      │ per-AF ctx │  │  (PCF client)  │     │
//! │                      └────────────┘  └────────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//!              ▲                                 │
//!     inbound notifications             outbound app-session
//!     (correlation token)               create/update/delete
//! ```
//!
//! # Concurrency discipline
//!
//! Two lock tiers: the registry's map is only touched transiently and
//! never across an outbound call; each `AfContext` carries its own
//! `tokio::sync::RwLock` held across the full extent of a mutating
//! operation, including the policy-authority call, so operations on
//! the same requester serialize. No operation ever holds two
//! contexts' locks at once.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod consumer;
pub mod context;
pub mod domain;
pub mod notifier;
pub mod processor;
pub mod sbi;
pub mod service;

// Re-exports for public API
pub use consumer::{PcfClient, PolicyAuthorization, PolicyError};
pub use context::{AfContext, AfRegistry, ResourceRef};
pub use domain::config::ExposureConfig;
pub use domain::error::{ExposureError, ProblemDetails};
pub use domain::models::{AppSessionContext, AppSessionContextUpdateData};
pub use notifier::{CallbackSink, HttpCallbackSink};
pub use processor::Processor;
pub use service::ExposureService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
