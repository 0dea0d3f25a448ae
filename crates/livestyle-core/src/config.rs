//! Agent configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where the development server listens by default.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8080";

/// How often the supervisor re-checks the connection.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Live-style agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    /// WebSocket endpoint of the development server.
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Health-check cadence. Also the worst-case reconnect latency.
    #[serde(
        rename = "tick_interval_ms",
        default = "default_tick_interval",
        with = "millis"
    )]
    tick_interval: Duration,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_tick_interval() -> Duration {
    DEFAULT_TICK_INTERVAL
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl AgentConfig {
    /// Build a validated configuration.
    ///
    /// The endpoint must be a `ws://` or `wss://` URL with a host, and the
    /// interval must be non-zero.
    pub fn new(endpoint: impl Into<String>, tick_interval: Duration) -> Result<Self, ConfigError> {
        let config = Self {
            endpoint: endpoint.into(),
            tick_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check a configuration obtained through deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidUrl {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ConfigError::UnsupportedScheme {
                    endpoint: self.endpoint.clone(),
                    scheme: other.to_string(),
                });
            }
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingHost(self.endpoint.clone()));
        }

        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

mod millis {
    use std::time::Duration;

    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis())
            .map_err(|_| S::Error::custom(format!("{value:?} does not fit in u64 milliseconds")))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_loopback() {
        let config = AgentConfig::default();
        assert_eq!(config.endpoint(), "ws://127.0.0.1:8080");
        assert_eq!(config.tick_interval(), Duration::from_millis(1000));
        config.validate().unwrap();
    }

    #[test]
    fn accepts_wss() {
        let config = AgentConfig::new("wss://localhost:9443", Duration::from_millis(250)).unwrap();
        assert_eq!(config.endpoint(), "wss://localhost:9443");
    }

    #[test]
    fn rejects_http_scheme() {
        let err = AgentConfig::new("http://127.0.0.1:8080", DEFAULT_TICK_INTERVAL).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme { ref scheme, .. } if scheme == "http"));
    }

    #[test]
    fn rejects_garbage() {
        let err = AgentConfig::new("not a url", DEFAULT_TICK_INTERVAL).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = AgentConfig::new(DEFAULT_ENDPOINT, Duration::ZERO).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTickInterval);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AgentConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AgentConfig::default());

        let config: AgentConfig =
            serde_json::from_str(r#"{"endpoint":"ws://[::1]:3000","tick_interval_ms":500}"#)
                .unwrap();
        assert_eq!(config.endpoint(), "ws://[::1]:3000");
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        config.validate().unwrap();
    }

    #[test]
    fn interval_too_long_for_millis_does_not_serialize() {
        let config = AgentConfig::new(DEFAULT_ENDPOINT, Duration::MAX).unwrap();
        assert!(serde_json::to_string(&config).is_err());

        let config = AgentConfig::new(DEFAULT_ENDPOINT, Duration::from_millis(u64::MAX)).unwrap();
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            format!(r#"{{"endpoint":"ws://127.0.0.1:8080","tick_interval_ms":{}}}"#, u64::MAX)
        );
    }
}
