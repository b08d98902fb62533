use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use crate::{
    caps::{Caps, MediaCategory},
    element::{Element, Pad, PadDirection},
    error::{GraphError, LinkError},
    sim::{
        Journal, SimEvent,
        catalog::KindSpec,
        lock,
        pad::{Presence, SimPad},
    },
    state::State,
};

type PadAddedCallback = Arc<dyn Fn(&SimElement, &SimPad) + Send + Sync>;

#[derive(Clone)]
pub struct SimElement {
    inner: Arc<ElementInner>,
}

struct ElementInner {
    name: String,
    spec: &'static KindSpec,
    pads: Mutex<Vec<SimPad>>,
    counters: Mutex<HashMap<String, u32>>,
    properties: Mutex<BTreeMap<String, String>>,
    pad_added: Mutex<Vec<PadAddedCallback>>,
    parent: Mutex<Option<String>>,
    state: Mutex<State>,
    journal: Journal,
}

impl SimElement {
    pub(crate) fn new(spec: &'static KindSpec, name: &str, journal: Journal) -> Self {
        let mut pads = Vec::new();
        if spec.sink {
            pads.push(SimPad::new(
                "sink".to_string(),
                name,
                PadDirection::Sink,
                Presence::Always,
                spec.accepts,
                journal.clone(),
            ));
        }
        if spec.src {
            pads.push(SimPad::new(
                "src".to_string(),
                name,
                PadDirection::Src,
                Presence::Always,
                &[],
                journal.clone(),
            ));
        }

        Self {
            inner: Arc::new(ElementInner {
                name: name.to_string(),
                spec,
                pads: Mutex::new(pads),
                counters: Mutex::new(HashMap::new()),
                properties: Mutex::new(BTreeMap::new()),
                pad_added: Mutex::new(Vec::new()),
                parent: Mutex::new(None),
                state: Mutex::new(State::Null),
                journal,
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.inner.spec.kind
    }

    pub fn is_demuxer(&self) -> bool {
        self.inner.spec.demuxer
    }

    pub fn property(&self, key: &str) -> Option<String> {
        lock(&self.inner.properties).get(key).cloned()
    }

    pub fn pads(&self) -> Vec<SimPad> {
        lock(&self.inner.pads).clone()
    }

    pub fn state(&self) -> State {
        *lock(&self.inner.state)
    }

    pub(crate) fn set_state(&self, state: State) {
        *lock(&self.inner.state) = state;
    }

    pub(crate) fn set_parent(&self, pipeline: &str) -> bool {
        let mut parent = lock(&self.inner.parent);
        if parent.is_some() {
            return false;
        }
        *parent = Some(pipeline.to_string());
        true
    }

    fn next_name(&self, template: &str) -> String {
        let mut counters = lock(&self.inner.counters);
        let counter = counters.entry(template.to_string()).or_insert(0);
        let name = template.replace("%u", &counter.to_string());
        *counter += 1;
        name
    }

    /// Exposes a new elementary stream the way a demuxer does while prerolling:
    /// a `sometimes` source pad carrying `caps`, announced to every pad-added
    /// callback on the calling thread.
    pub fn add_stream_pad(&self, caps: Option<Caps>) -> SimPad {
        let template = match caps.as_ref().map(Caps::category) {
            Some(MediaCategory::Audio) => "audio_%u",
            Some(MediaCategory::Video) => "video_%u",
            _ => "subtitle_%u",
        };
        let pad = SimPad::new(
            self.next_name(template),
            &self.inner.name,
            PadDirection::Src,
            Presence::Sometimes,
            &[],
            self.inner.journal.clone(),
        );
        pad.set_caps(caps);
        lock(&self.inner.pads).push(pad.clone());
        self.inner.journal.record(SimEvent::PadAdded {
            element: self.inner.name.clone(),
            pad: pad.name(),
        });

        let callbacks = lock(&self.inner.pad_added).clone();
        for callback in callbacks {
            (*callback)(self, &pad);
        }
        pad
    }

    fn first_free(&self, direction: PadDirection) -> Option<SimPad> {
        lock(&self.inner.pads)
            .iter()
            .find(|p| {
                p.presence() == Presence::Always && p.direction() == direction && !p.is_linked()
            })
            .cloned()
    }
}

impl Element for SimElement {
    type Pad = SimPad;

    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn static_pad(&self, name: &str) -> Option<SimPad> {
        lock(&self.inner.pads)
            .iter()
            .find(|p| p.presence() != Presence::Request && p.name() == name)
            .cloned()
    }

    fn request_pad(&self, template: &str) -> Option<SimPad> {
        let (template, direction) = self
            .inner
            .spec
            .request_templates
            .iter()
            .find(|(t, _)| *t == template)?;
        let pad = SimPad::new(
            self.next_name(template),
            &self.inner.name,
            *direction,
            Presence::Request,
            &[],
            self.inner.journal.clone(),
        );
        lock(&self.inner.pads).push(pad.clone());
        self.inner.journal.record(SimEvent::RequestPad {
            element: self.inner.name.clone(),
            pad: pad.name(),
        });
        Some(pad)
    }

    fn release_request_pad(&self, pad: &SimPad) {
        let mut pads = lock(&self.inner.pads);
        let Some(index) = pads
            .iter()
            .position(|p| p.presence() == Presence::Request && p.same_pad(pad))
        else {
            log::warn!("{}: {} is not a request pad of this element", self.inner.name, pad.name());
            return;
        };
        let pad = pads.remove(index);
        drop(pads);

        pad.unlink();
        self.inner.journal.record(SimEvent::ReleasedPad {
            element: self.inner.name.clone(),
            pad: pad.name(),
        });
    }

    fn set_property(&self, key: &str, value: &str) -> Result<(), GraphError> {
        if !self.inner.spec.properties.contains(&key) {
            return Err(GraphError::Property {
                element: self.inner.name.clone(),
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        lock(&self.inner.properties).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn link(&self, downstream: &Self) -> Result<(), LinkError> {
        let src = self.first_free(PadDirection::Src);
        let sink = downstream.first_free(PadDirection::Sink);
        let result = match (src, sink) {
            (Some(src), Some(sink)) => return src.link(&sink),
            _ => Err(LinkError::NoPads),
        };
        self.inner.journal.record(SimEvent::Linked {
            upstream: self.inner.name.clone(),
            downstream: downstream.name(),
            result,
        });
        result
    }

    fn connect_pad_added<F>(&self, callback: F)
    where
        F: Fn(&Self, &SimPad) + Send + Sync + 'static,
    {
        lock(&self.inner.pad_added).push(Arc::new(callback));
    }
}
