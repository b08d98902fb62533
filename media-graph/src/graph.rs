use futures::stream::BoxStream;

use crate::{
    bus::Notification,
    element::{Backend, Element, Pipeline},
    error::{GraphError, Result},
    plan::{DynamicRoute, PadRef, PadSpec},
    resolver::BranchRouter,
    state::{State, StateChangeSuccess},
};

/// A built pipeline together with every element and request pad it owns.
///
/// Dropping a graph that was not torn down explicitly tears it down, so early
/// returns after construction never leave a running pipeline behind.
pub struct Graph<B: Backend> {
    name: String,
    pipeline: B::Pipeline,
    elements: Vec<(String, B::Element)>,
    request_pads: Vec<(B::Element, B::Pad)>,
    torn_down: bool,
}

impl<B: Backend> Graph<B> {
    pub(crate) fn new(name: &str, pipeline: B::Pipeline) -> Self {
        Self {
            name: name.to_string(),
            pipeline,
            elements: Vec::new(),
            request_pads: Vec::new(),
            torn_down: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline(&self) -> &B::Pipeline {
        &self.pipeline
    }

    pub(crate) fn insert(&mut self, name: &str, element: B::Element) -> Result<()> {
        self.pipeline.add(&element)?;
        self.elements.push((name.to_string(), element));
        Ok(())
    }

    /// Keeps `pad` until teardown, when it is handed back to `owner`.
    pub(crate) fn track_request_pad(&mut self, owner: B::Element, pad: B::Pad) {
        self.request_pads.push((owner, pad));
    }

    pub fn element(&self, name: &str) -> Result<&B::Element> {
        self.elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
            .ok_or_else(|| GraphError::UnknownElement(name.to_string()))
    }

    /// Looks up a static pad. Request templates have no pad to look up.
    pub fn static_pad(&self, pad: &PadRef) -> Result<B::Pad> {
        let found = match &pad.pad {
            PadSpec::Static(name) => self.element(&pad.element)?.static_pad(name),
            PadSpec::Request(_) => None,
        };
        found.ok_or_else(|| GraphError::PadUnavailable {
            element: pad.element.clone(),
            pad: pad.to_string(),
        })
    }

    pub fn request_pad_count(&self) -> usize {
        self.request_pads.len()
    }

    /// Connects a [`BranchRouter`] for `route` to the demuxer's pad-added signal.
    pub fn attach_router(&self, route: &DynamicRoute) -> Result<()> {
        let demuxer = self.element(&route.demuxer)?;
        let router = BranchRouter::new(
            self.static_pad(&route.audio)?,
            self.static_pad(&route.video)?,
        );
        demuxer.connect_pad_added(move |demuxer, pad| {
            router.resolve(demuxer, pad);
        });
        Ok(())
    }

    pub fn notifications(&self) -> BoxStream<'static, Notification> {
        self.pipeline.notifications()
    }

    /// Asks the pipeline to move to `state`. Returns without waiting; an `Async`
    /// result means the transition is still pending.
    pub fn request_state(&self, state: State) -> Result<StateChangeSuccess> {
        self.pipeline.set_state(state).map_err(|_| {
            log::error!("Unable to set the pipeline to the {} state.", state);
            GraphError::StateChange(state)
        })
    }

    pub fn current_state(&self) -> State {
        self.pipeline.current_state()
    }

    /// Stops the pipeline and releases the request pads.
    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Err(e) = self.request_state(State::Null) {
            log::error!("{}: teardown: {}", self.name, e);
        }
        for (owner, pad) in self.request_pads.drain(..) {
            owner.release_request_pad(&pad);
        }
        log::debug!("{}: torn down", self.name);
    }
}

impl<B: Backend> Drop for Graph<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
