//! Exposure service configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Northbound HTTP server
    pub http: HttpConfig,
    /// Policy authority (PCF) client
    pub pcf: PcfConfig,
    /// Requester callback forwarding
    pub callback: CallbackConfig,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            pcf: PcfConfig::default(),
            callback: CallbackConfig::default(),
        }
    }
}

impl ExposureConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pcf.base_url.is_empty() {
            return Err(ConfigError::InvalidPcf("base_url cannot be empty".into()));
        }
        if self.pcf.base_url.ends_with('/') {
            return Err(ConfigError::InvalidPcf(
                "base_url must not end with '/'".into(),
            ));
        }
        if self.pcf.timeout.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout("pcf timeout cannot be 0".into()));
        }
        if self.callback.timeout.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "callback timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// Northbound HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8000,
        }
    }
}

/// Policy authority client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PcfConfig {
    /// Base URI of the policy authorization service, without trailing slash
    pub base_url: String,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for PcfConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:29507/npcf-policyauthorization/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Callback forwarding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackConfig {
    /// Per-delivery timeout; a slow requester endpoint must not block
    /// the notification path indefinitely
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PCF configuration: {0}")]
    InvalidPcf(String),
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExposureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_addr().port(), 8000);
    }

    #[test]
    fn test_rejects_empty_pcf_url() {
        let mut config = ExposureConfig::default();
        config.pcf.base_url.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPcf(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = ExposureConfig::default();
        config.callback.timeout = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let raw = r#"
            [http]
            port = 9000

            [pcf]
            base_url = "http://pcf.local/npcf-policyauthorization/v1"
            timeout = "2s"

            [callback]
            timeout = "1s"
        "#;
        let config: ExposureConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.pcf.timeout, Duration::from_secs(2));
        assert_eq!(config.callback.timeout, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }
}
