//! QoS exposure server binary.
//!
//! Usage: `qos-exposure [config.toml]` - without an argument the
//! built-in defaults apply.

use anyhow::Context;
use qos_exposure::service::ExposureService;
use qos_exposure::ExposureConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("read config file {path}"))?;
            toml::from_str::<ExposureConfig>(&raw)
                .with_context(|| format!("parse config file {path}"))?
        }
        None => ExposureConfig::default(),
    };

    info!(version = qos_exposure::VERSION, "starting QoS exposure function");

    let mut service = ExposureService::from_config(config)?;

    tokio::select! {
        res = service.start() => {
            res.context("server terminated")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        }
    }

    Ok(())
}
