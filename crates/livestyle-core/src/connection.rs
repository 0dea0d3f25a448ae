//! Connection handles and the transport seam.

use std::rc::Rc;

use crate::TransportError;

/// Callback invoked with every payload a connection receives.
///
/// Single-threaded: handlers run on the page's event loop, one at a time.
pub type MessageHandler = Rc<dyn Fn(&str)>;

/// Lifecycle of one connection handle.
///
/// A missing handle ("absent") is modelled as `Option::None` by the
/// supervisor, not as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl ConnectionState {
    /// Map a WebSocket `readyState` value.
    ///
    /// Values outside `0..=3` are treated as closed so the supervisor
    /// replaces the handle.
    pub fn from_ready_state(ready_state: u16) -> Self {
        match ready_state {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == ConnectionState::Open
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle to one bidirectional channel.
///
/// The state is read on every tick, so it must reflect the transport's
/// own lifecycle callbacks rather than anything the agent tracks.
pub trait Connection {
    fn state(&self) -> ConnectionState;

    /// Start closing the channel. A connection closed while still
    /// connecting must never reach [`ConnectionState::Open`]. Calling it on
    /// a closing or closed connection is a no-op.
    fn close(&self);
}

/// Opens connections to the development server.
pub trait Transport {
    type Connection: Connection;

    /// Start opening a connection to `endpoint` and wire `on_message` to it.
    ///
    /// Must not block on establishment: the returned handle is normally
    /// [`ConnectionState::Connecting`], and success or failure shows up
    /// only through its later state.
    fn open(
        &mut self,
        endpoint: &str,
        on_message: MessageHandler,
    ) -> Result<Self::Connection, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_state_mapping() {
        assert_eq!(
            ConnectionState::from_ready_state(0),
            ConnectionState::Connecting
        );
        assert_eq!(ConnectionState::from_ready_state(1), ConnectionState::Open);
        assert_eq!(
            ConnectionState::from_ready_state(2),
            ConnectionState::Closing
        );
        assert_eq!(ConnectionState::from_ready_state(3), ConnectionState::Closed);
        assert_eq!(
            ConnectionState::from_ready_state(42),
            ConnectionState::Closed
        );
    }

    #[test]
    fn only_open_is_open() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Connecting.is_open());
        assert!(!ConnectionState::Closing.is_open());
        assert!(!ConnectionState::Closed.is_open());
    }
}
