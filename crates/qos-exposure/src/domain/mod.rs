//! Domain types: configuration, errors, and wire payload models.

pub mod config;
pub mod error;
pub mod models;

pub use config::ExposureConfig;
pub use error::{ExposureError, ProblemDetails};
pub use models::{AppSessionContext, AppSessionContextUpdateData};
