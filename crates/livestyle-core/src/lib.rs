//! Live-style agent core
//!
//! Keeps a single connection to the local development server alive and
//! applies every stylesheet it pushes to one owned `<style>` element:
//! - [`Supervisor`] re-checks connection health on a fixed tick and opens a
//!   fresh connection whenever the current one is not open
//! - [`StyleApplicator`] overwrites the style sink with each payload
//! - [`LegacyLinkRemover`] detaches the page's original stylesheet link
//!   after the first payload
//!
//! Nothing here touches the browser directly. The wasm client plugs
//! `web-sys` types into the [`Transport`], [`StyleSink`] and [`LegacyLink`]
//! seams; tests plug in fakes.

mod agent;
mod applicator;
mod config;
mod connection;
mod error;
mod legacy;
mod supervisor;

pub use agent::LiveStyleAgent;
pub use applicator::{Applied, StyleApplicator, StyleSink};
pub use config::{AgentConfig, DEFAULT_ENDPOINT, DEFAULT_TICK_INTERVAL};
pub use connection::{Connection, ConnectionState, MessageHandler, Transport};
pub use error::{ConfigError, TransportError};
pub use legacy::{LegacyLink, LegacyLinkRemover};
pub use supervisor::{Supervisor, TickOutcome};
