//! Error types for the live-style agent.

/// Errors a [`Transport`](crate::Transport) can report when asked to open a
/// connection.
///
/// The supervisor never surfaces these: a failed open is treated the same
/// as a dropped connection and retried on the next tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The endpoint was rejected before any network activity.
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The underlying socket implementation refused to start.
    #[error("failed to open connection: {0}")]
    Open(String),
}

/// Invalid agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The endpoint is not a parseable URL.
    #[error("endpoint {endpoint} is not a valid URL: {reason}")]
    InvalidUrl { endpoint: String, reason: String },

    /// The endpoint uses something other than `ws` or `wss`.
    #[error("endpoint {endpoint} must use ws:// or wss://, not {scheme}://")]
    UnsupportedScheme { endpoint: String, scheme: String },

    /// The endpoint has no host to connect to.
    #[error("endpoint {0} has no host")]
    MissingHost(String),

    /// A zero tick interval would spin.
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}
