//! Connection supervision: one logical connection, re-checked every tick.

use crate::{Connection, ConnectionState, MessageHandler, Transport};

/// What a single [`Supervisor::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The current connection is open; nothing to do.
    Healthy,
    /// There was no connection, so one was started.
    Opened { attempt: u64 },
    /// The current connection was not open and has been superseded.
    Reopened {
        previous: ConnectionState,
        attempt: u64,
    },
    /// The transport refused to start a connection. Retried next tick.
    OpenFailed { attempt: u64 },
}

impl TickOutcome {
    /// Whether this tick issued a connection attempt, successful or not.
    pub fn attempted(&self) -> bool {
        !matches!(self, TickOutcome::Healthy)
    }
}

/// Owns the agent's connection to the development server.
///
/// There is no backoff and no retry limit: every tick that finds the
/// connection absent or not open starts a fresh one. A superseded handle is
/// closed and moved to a retired list, where it stays until its state
/// reaches [`ConnectionState::Closed`] so the transport can finish the close
/// handshake with its handler still alive. At most one held connection is
/// ever open: a retired handle that reports open anyway is closed again on
/// the next tick.
pub struct Supervisor<T: Transport> {
    transport: T,
    endpoint: String,
    current: Option<T::Connection>,
    retired: Vec<T::Connection>,
    attempts: u64,
}

impl<T: Transport> Supervisor<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            current: None,
            retired: Vec::new(),
            attempts: 0,
        }
    }

    /// Run one health check, opening a connection if the current one is
    /// absent or not open. Never blocks on establishment.
    pub fn tick(&mut self, on_message: &MessageHandler) -> TickOutcome {
        for conn in &self.retired {
            if matches!(
                conn.state(),
                ConnectionState::Connecting | ConnectionState::Open
            ) {
                tracing::debug!("[livestyle] closing superseded connection again");
                conn.close();
            }
        }
        self.retired
            .retain(|conn| conn.state() != ConnectionState::Closed);

        let previous = match &self.current {
            Some(conn) => {
                let state = conn.state();
                if state.is_open() {
                    return TickOutcome::Healthy;
                }
                Some(state)
            }
            None => None,
        };

        if let Some(stale) = self.current.take()
            && previous != Some(ConnectionState::Closed)
        {
            stale.close();
            self.retired.push(stale);
        }

        self.attempts += 1;
        let attempt = self.attempts;

        match self.transport.open(&self.endpoint, on_message.clone()) {
            Ok(conn) => {
                self.current = Some(conn);
                match previous {
                    Some(previous) => {
                        tracing::debug!(
                            "[livestyle] connection {previous}, reconnecting to {} (attempt {attempt})",
                            self.endpoint
                        );
                        TickOutcome::Reopened { previous, attempt }
                    }
                    None => {
                        tracing::debug!(
                            "[livestyle] connecting to {} (attempt {attempt})",
                            self.endpoint
                        );
                        TickOutcome::Opened { attempt }
                    }
                }
            }
            Err(e) => {
                tracing::debug!("[livestyle] attempt {attempt} failed: {e}");
                TickOutcome::OpenFailed { attempt }
            }
        }
    }

    /// State of the current connection, `None` when absent.
    pub fn state(&self) -> Option<ConnectionState> {
        self.current.as_ref().map(Connection::state)
    }

    /// Connection attempts issued since construction.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Superseded connections that have not reported `Closed` yet.
    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
