//! Writes received payloads into the owned style element.

use crate::{LegacyLink, LegacyLinkRemover};

/// The single `<style>` element the agent owns.
pub trait StyleSink {
    /// Overwrite the element's whole text content with `css`.
    fn replace(&self, css: &str);
}

/// What one [`StyleApplicator::apply`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// 1-based count of payloads applied since page load.
    pub generation: u64,
    /// Whether this payload triggered removal of the legacy link.
    pub removed_legacy_link: bool,
}

/// Applies payloads to the style sink, last write wins.
///
/// The payload is opaque: no parsing, validation or size limit. An empty
/// string blanks the sink like any other payload would replace it.
#[derive(Debug)]
pub struct StyleApplicator<S, L> {
    sink: S,
    remover: LegacyLinkRemover<L>,
    applied: u64,
}

impl<S: StyleSink, L: LegacyLink> StyleApplicator<S, L> {
    pub fn new(sink: S, legacy_link: Option<L>) -> Self {
        Self {
            sink,
            remover: LegacyLinkRemover::new(legacy_link),
            applied: 0,
        }
    }

    /// Replace the sink content, then retire the legacy link if still held.
    pub fn apply(&mut self, payload: &str) -> Applied {
        self.sink.replace(payload);
        self.applied += 1;

        let removed_legacy_link = self.remover.remove();
        if removed_legacy_link {
            tracing::debug!("[livestyle] removed legacy stylesheet link");
        }

        Applied {
            generation: self.applied,
            removed_legacy_link,
        }
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn legacy_link_pending(&self) -> bool {
        self.remover.is_pending()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
