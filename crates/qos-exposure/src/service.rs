//! Exposure service - startup and shutdown of the northbound server.

use crate::consumer::{PcfClient, PolicyAuthorization};
use crate::context::AfRegistry;
use crate::domain::config::ExposureConfig;
use crate::domain::error::ExposureError;
use crate::notifier::{CallbackSink, HttpCallbackSink};
use crate::processor::Processor;
use crate::sbi::build_router;
use axum::Router;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

/// QoS exposure service state
pub struct ExposureService {
    config: ExposureConfig,
    processor: Arc<Processor>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ExposureService {
    /// Create a service with injected collaborators
    pub fn new(
        config: ExposureConfig,
        consumer: Arc<dyn PolicyAuthorization>,
        sink: Arc<dyn CallbackSink>,
    ) -> Result<Self, ExposureError> {
        config
            .validate()
            .map_err(|e| ExposureError::Config(e.to_string()))?;

        let registry = Arc::new(AfRegistry::new());
        let processor = Arc::new(Processor::new(registry, consumer, sink));

        Ok(Self {
            config,
            processor,
            shutdown_tx: None,
        })
    }

    /// Create a service wired to the HTTP policy authority client and
    /// HTTP callback forwarder.
    pub fn from_config(config: ExposureConfig) -> Result<Self, ExposureError> {
        config
            .validate()
            .map_err(|e| ExposureError::Config(e.to_string()))?;
        let consumer = Arc::new(PcfClient::new(&config.pcf)?);
        let sink = Arc::new(HttpCallbackSink::new(config.callback.timeout)?);
        Self::new(config, consumer, sink)
    }

    /// Shared request processor
    pub fn processor(&self) -> Arc<Processor> {
        Arc::clone(&self.processor)
    }

    /// Build the northbound router
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.processor))
    }

    /// Bind and serve until shutdown is requested
    pub async fn start(&mut self) -> Result<(), ExposureError> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ExposureError::Bind(e.to_string()))?;

        info!(addr = %addr, "starting QoS exposure server");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .map_err(|e| ExposureError::Serve(e.to_string()))?;

        info!("QoS exposure server stopped");
        Ok(())
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
