//! One-shot removal of the page's original stylesheet link.

/// The page's pre-existing `<link rel="stylesheet">`.
///
/// `detach` consumes the link, so the remover can only ever call it once.
pub trait LegacyLink {
    /// Remove the element from its parent.
    fn detach(self);
}

/// Holds the legacy link until the first payload arrives, then detaches it.
///
/// Page-scoped: it survives connection replacement, so a reconnect never
/// re-arms it.
#[derive(Debug)]
pub struct LegacyLinkRemover<L> {
    link: Option<L>,
}

impl<L: LegacyLink> LegacyLinkRemover<L> {
    /// `None` when the page had no stylesheet link at startup; every call
    /// to [`remove`](Self::remove) is then a no-op.
    pub fn new(link: Option<L>) -> Self {
        Self { link }
    }

    /// Detach the link if it is still held. Returns whether it was detached.
    pub fn remove(&mut self) -> bool {
        match self.link.take() {
            Some(link) => {
                link.detach();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.link.is_some()
    }
}
