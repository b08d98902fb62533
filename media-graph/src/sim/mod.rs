//! In-process simulation of the element framework.
//!
//! Elements come from a small catalog (`filesrc`, `matroskademux`, `tee`, `queue`,
//! decoders, converters, `matroskamux`, sinks) with the same static pads and request
//! templates as their GStreamer counterparts. Going to paused spawns a streaming
//! thread on the tokio blocking pool which exposes the scripted elementary streams
//! on every demuxer, completes the transition and posts the scripted terminal
//! message. Every link, pad request and state request is written to a journal that
//! tests can inspect.
//!
//! Needs a tokio runtime once a pipeline leaves the ready state.

mod catalog;
mod element;
mod pad;
mod pipeline;

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

pub use element::SimElement;
pub use pad::{Presence, SimPad};
pub use pipeline::SimPipeline;

use crate::{caps::Caps, element::Backend, error::LinkError, state::State};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    Created {
        kind: String,
        name: String,
    },
    RequestPad {
        element: String,
        pad: String,
    },
    ReleasedPad {
        element: String,
        pad: String,
    },
    PadAdded {
        element: String,
        pad: String,
    },
    Linked {
        upstream: String,
        downstream: String,
        result: Result<(), LinkError>,
    },
    StateRequested {
        pipeline: String,
        state: State,
    },
}

#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<SimEvent>>>);

impl Journal {
    pub(crate) fn record(&self, event: SimEvent) {
        log::trace!("sim: {:?}", event);
        lock(&self.0).push(event);
    }

    fn snapshot(&self) -> Vec<SimEvent> {
        lock(&self.0).clone()
    }
}

/// How a simulated run ends once the pipeline is playing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Terminal {
    #[default]
    EndOfStream,
    Error {
        element: String,
        message: String,
        debug: Option<String>,
    },
    /// Keeps playing until set back to null.
    None,
}

#[derive(Debug, Default)]
pub(crate) struct Script {
    streams: Vec<Option<Caps>>,
    terminal: Terminal,
    unavailable: HashSet<String>,
    refuse_state_change: bool,
}

#[derive(Clone, Default)]
pub struct SimBackend {
    inner: Arc<BackendInner>,
}

#[derive(Default)]
struct BackendInner {
    script: Arc<Script>,
    journal: Journal,
    pipelines: Mutex<Vec<SimPipeline>>,
}

impl SimBackend {
    /// A WebM input: one Vorbis and one VP8 stream, then end of stream.
    pub fn new() -> Self {
        Self::builder()
            .stream(Caps::new("audio/x-vorbis").with_field("channels", "2"))
            .stream(Caps::new("video/x-vp8").with_field("width", "854"))
            .build()
    }

    pub fn builder() -> SimBackendBuilder {
        SimBackendBuilder::default()
    }

    pub fn journal(&self) -> Vec<SimEvent> {
        self.inner.journal.snapshot()
    }

    /// Successful pad links as `(upstream, downstream)` pad paths.
    pub fn links(&self) -> Vec<(String, String)> {
        self.journal()
            .into_iter()
            .filter_map(|event| match event {
                SimEvent::Linked {
                    upstream,
                    downstream,
                    result: Ok(()),
                } => Some((upstream, downstream)),
                _ => None,
            })
            .collect()
    }

    pub fn link_attempts(&self) -> usize {
        self.journal()
            .iter()
            .filter(|event| matches!(event, SimEvent::Linked { .. }))
            .count()
    }

    pub fn state_requests(&self, pipeline: &str) -> Vec<State> {
        self.journal()
            .into_iter()
            .filter_map(|event| match event {
                SimEvent::StateRequested { pipeline: p, state } if p == pipeline => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn pipeline(&self, name: &str) -> Option<SimPipeline> {
        use crate::element::Pipeline;
        lock(&self.inner.pipelines)
            .iter()
            .find(|p| p.name() == name)
            .cloned()
    }
}

impl Backend for SimBackend {
    type Pad = SimPad;
    type Element = SimElement;
    type Pipeline = SimPipeline;

    fn make_element(&self, kind: &str, name: &str) -> Option<SimElement> {
        if self.inner.script.unavailable.contains(kind) {
            return None;
        }
        let spec = catalog::lookup(kind)?;
        self.inner.journal.record(SimEvent::Created {
            kind: kind.to_string(),
            name: name.to_string(),
        });
        Some(SimElement::new(spec, name, self.inner.journal.clone()))
    }

    fn new_pipeline(&self, name: &str) -> SimPipeline {
        let pipeline = SimPipeline::new(
            name,
            Arc::clone(&self.inner.script),
            self.inner.journal.clone(),
        );
        lock(&self.inner.pipelines).push(pipeline.clone());
        pipeline
    }
}

#[derive(Default)]
pub struct SimBackendBuilder {
    script: Script,
}

impl SimBackendBuilder {
    /// Adds an elementary stream every demuxer discovers, in call order.
    pub fn stream(mut self, caps: Caps) -> Self {
        self.script.streams.push(Some(caps));
        self
    }

    /// Adds a stream whose pad carries no caps.
    pub fn stream_without_caps(mut self) -> Self {
        self.script.streams.push(None);
        self
    }

    /// The factory returns nothing for `kind`, like a missing plugin.
    pub fn unavailable(mut self, kind: &str) -> Self {
        self.script.unavailable.insert(kind.to_string());
        self
    }

    pub fn end_with_error(
        mut self,
        element: &str,
        message: &str,
        debug: Option<&str>,
    ) -> Self {
        self.script.terminal = Terminal::Error {
            element: element.to_string(),
            message: message.to_string(),
            debug: debug.map(str::to_string),
        };
        self
    }

    pub fn keep_playing(mut self) -> Self {
        self.script.terminal = Terminal::None;
        self
    }

    /// Every upward state change fails.
    pub fn refuse_state_change(mut self) -> Self {
        self.script.refuse_state_change = true;
        self
    }

    pub fn build(self) -> SimBackend {
        SimBackend {
            inner: Arc::new(BackendInner {
                script: Arc::new(self.script),
                journal: Journal::default(),
                pipelines: Mutex::new(Vec::new()),
            }),
        }
    }
}

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;
