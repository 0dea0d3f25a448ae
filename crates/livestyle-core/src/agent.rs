//! The live-style agent: supervisor plus applicator behind two entry points.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::{
    AgentConfig, Applied, ConnectionState, LegacyLink, MessageHandler, StyleApplicator, StyleSink,
    Supervisor, TickOutcome, Transport,
};

/// Page-lifetime owner of the connection, the style sink and the legacy link.
///
/// Only [`tick`](Self::tick) and [`on_message`](Self::on_message) mutate it.
/// Both run on the page's single event loop and never interleave, so the
/// shared applicator needs a `RefCell`, not a lock.
///
/// Every connection gets a handler bound to the same applicator. The
/// supervisor closes superseded connections, but a payload already in
/// flight on one may still land through its handler; that is harmless
/// because application is last-write-wins.
pub struct LiveStyleAgent<T, S, L>
where
    T: Transport,
{
    supervisor: Supervisor<T>,
    applicator: Rc<RefCell<StyleApplicator<S, L>>>,
    handler: MessageHandler,
    tick_interval: Duration,
}

impl<T, S, L> LiveStyleAgent<T, S, L>
where
    T: Transport,
    S: StyleSink + 'static,
    L: LegacyLink + 'static,
{
    /// Build an agent. No connection is opened until the first tick.
    pub fn new(config: &AgentConfig, transport: T, sink: S, legacy_link: Option<L>) -> Self {
        let applicator = Rc::new(RefCell::new(StyleApplicator::new(sink, legacy_link)));

        let handler: MessageHandler = {
            let applicator = Rc::clone(&applicator);
            Rc::new(move |payload: &str| {
                apply_payload(&applicator, payload);
            })
        };

        Self {
            supervisor: Supervisor::new(transport, config.endpoint()),
            applicator,
            handler,
            tick_interval: config.tick_interval(),
        }
    }

    /// One health check of the connection; see [`Supervisor::tick`].
    pub fn tick(&mut self) -> TickOutcome {
        self.supervisor.tick(&self.handler)
    }

    /// Apply a payload as if it had arrived on the current connection.
    pub fn on_message(&self, payload: &str) -> Option<Applied> {
        apply_payload(&self.applicator, payload)
    }

    /// The handler wired to every connection this agent opens.
    pub fn message_handler(&self) -> MessageHandler {
        Rc::clone(&self.handler)
    }

    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.supervisor.state()
    }

    /// Payloads applied since page load, across all connections.
    pub fn applied(&self) -> u64 {
        self.applicator.borrow().applied()
    }

    pub fn legacy_link_pending(&self) -> bool {
        self.applicator.borrow().legacy_link_pending()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn supervisor(&self) -> &Supervisor<T> {
        &self.supervisor
    }
}

fn apply_payload<S: StyleSink, L: LegacyLink>(
    applicator: &RefCell<StyleApplicator<S, L>>,
    payload: &str,
) -> Option<Applied> {
    let Ok(mut applicator) = applicator.try_borrow_mut() else {
        tracing::warn!("[livestyle] payload delivered re-entrantly, dropping it");
        return None;
    };

    let applied = applicator.apply(payload);
    tracing::trace!(
        "[livestyle] applied stylesheet #{} ({} bytes)",
        applied.generation,
        payload.len()
    );
    Some(applied)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{Connection, TransportError};

    struct NullConn;

    impl Connection for NullConn {
        fn state(&self) -> ConnectionState {
            ConnectionState::Connecting
        }

        fn close(&self) {}
    }

    /// Keeps every handler it is given so tests can deliver on old connections.
    #[derive(Default)]
    struct CapturingTransport {
        handlers: Rc<RefCell<Vec<MessageHandler>>>,
    }

    impl Transport for CapturingTransport {
        type Connection = NullConn;

        fn open(
            &mut self,
            _endpoint: &str,
            on_message: MessageHandler,
        ) -> Result<NullConn, TransportError> {
            self.handlers.borrow_mut().push(on_message);
            Ok(NullConn)
        }
    }

    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<String>>);

    impl StyleSink for Sink {
        fn replace(&self, css: &str) {
            *self.0.borrow_mut() = css.to_string();
        }
    }

    struct Link(Rc<Cell<u32>>);

    impl LegacyLink for Link {
        fn detach(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn stale_handlers_share_page_state() {
        let transport = CapturingTransport::default();
        let handlers = Rc::clone(&transport.handlers);
        let sink = Sink::default();
        let detached = Rc::new(Cell::new(0));
        let mut agent = LiveStyleAgent::new(
            &AgentConfig::default(),
            transport,
            sink.clone(),
            Some(Link(detached.clone())),
        );

        // Connecting never becomes open, so each tick supersedes.
        agent.tick();
        agent.tick();
        agent.tick();
        assert_eq!(handlers.borrow().len(), 3);

        (handlers.borrow()[0])("a{}");
        (handlers.borrow()[2])("b{}");
        (handlers.borrow()[1])("c{}");

        assert_eq!(*sink.0.borrow(), "c{}");
        assert_eq!(detached.get(), 1);
        assert_eq!(agent.applied(), 3);
        assert!(!agent.legacy_link_pending());
    }

    #[test]
    fn on_message_without_connection_still_applies() {
        let sink = Sink::default();
        let agent: LiveStyleAgent<_, _, Link> = LiveStyleAgent::new(
            &AgentConfig::default(),
            CapturingTransport::default(),
            sink.clone(),
            None,
        );

        let applied = agent.on_message("body{}").unwrap();
        assert_eq!(applied.generation, 1);
        assert!(!applied.removed_legacy_link);
        assert_eq!(*sink.0.borrow(), "body{}");
        assert_eq!(agent.connection_state(), None);
    }
}
