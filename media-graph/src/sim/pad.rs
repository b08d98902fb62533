use std::sync::{Arc, Mutex, Weak};

use crate::{
    caps::Caps,
    element::{Pad, PadDirection},
    error::LinkError,
    sim::{Journal, SimEvent, lock},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Always,
    Sometimes,
    Request,
}

#[derive(Clone)]
pub struct SimPad {
    inner: Arc<PadInner>,
}

struct PadInner {
    name: String,
    parent: String,
    direction: PadDirection,
    presence: Presence,
    accepts: &'static [&'static str],
    caps: Mutex<Option<Caps>>,
    peer: Mutex<Option<Weak<PadInner>>>,
    journal: Journal,
}

impl SimPad {
    pub(crate) fn new(
        name: String,
        parent: &str,
        direction: PadDirection,
        presence: Presence,
        accepts: &'static [&'static str],
        journal: Journal,
    ) -> Self {
        Self {
            inner: Arc::new(PadInner {
                name,
                parent: parent.to_string(),
                direction,
                presence,
                accepts,
                caps: Mutex::new(None),
                peer: Mutex::new(None),
                journal,
            }),
        }
    }

    pub fn presence(&self) -> Presence {
        self.inner.presence
    }

    pub(crate) fn set_caps(&self, caps: Option<Caps>) {
        *lock(&self.inner.caps) = caps;
    }

    /// `element:pad` of the linked peer.
    pub fn peer(&self) -> Option<String> {
        let peer = lock(&self.inner.peer).as_ref()?.upgrade()?;
        Some(format!("{}:{}", peer.parent, peer.name))
    }

    pub fn same_pad(&self, other: &SimPad) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Drops the link on both sides, if any.
    pub(crate) fn unlink(&self) {
        let peer = lock(&self.inner.peer).take();
        if let Some(peer) = peer.and_then(|p| p.upgrade()) {
            lock(&peer.peer).take();
        }
    }

    fn accepts(&self, caps: Option<&Caps>) -> bool {
        match caps {
            Some(caps) if !self.inner.accepts.is_empty() => {
                self.inner.accepts.contains(&caps.media_type())
            }
            _ => true,
        }
    }

    fn try_link(&self, sink: &SimPad) -> Result<(), LinkError> {
        if self.inner.direction != PadDirection::Src || sink.inner.direction != PadDirection::Sink
        {
            return Err(LinkError::WrongDirection);
        }

        // src before sink, so two links never wait on each other
        let mut src_peer = lock(&self.inner.peer);
        let mut sink_peer = lock(&sink.inner.peer);
        if src_peer.is_some() || sink_peer.is_some() {
            return Err(LinkError::WasLinked);
        }
        if !sink.accepts(lock(&self.inner.caps).as_ref()) {
            return Err(LinkError::NoFormat);
        }

        *src_peer = Some(Arc::downgrade(&sink.inner));
        *sink_peer = Some(Arc::downgrade(&self.inner));
        Ok(())
    }
}

impl Pad for SimPad {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn parent_name(&self) -> Option<String> {
        Some(self.inner.parent.clone())
    }

    fn direction(&self) -> PadDirection {
        self.inner.direction
    }

    fn is_linked(&self) -> bool {
        lock(&self.inner.peer).is_some()
    }

    fn current_caps(&self) -> Option<Caps> {
        lock(&self.inner.caps).clone()
    }

    fn link(&self, sink: &Self) -> Result<(), LinkError> {
        let result = self.try_link(sink);
        self.inner.journal.record(SimEvent::Linked {
            upstream: self.path(),
            downstream: sink.path(),
            result,
        });
        result
    }
}
