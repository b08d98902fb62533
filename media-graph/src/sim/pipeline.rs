use std::sync::{Arc, Mutex};

use futures::{StreamExt, stream::BoxStream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::{
    bus::Notification,
    element::{Element, Pipeline},
    error::GraphError,
    sim::{Journal, Script, SimEvent, Terminal, element::SimElement, lock},
    state::{State, StateChangeError, StateChangeSuccess},
};

#[derive(Clone)]
pub struct SimPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    name: String,
    elements: Mutex<Vec<SimElement>>,
    state: Mutex<State>,
    tx: mpsc::UnboundedSender<Notification>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Notification>>>,
    cancel: Mutex<CancellationToken>,
    script: Arc<Script>,
    journal: Journal,
}

impl SimPipeline {
    pub(crate) fn new(name: &str, script: Arc<Script>, journal: Journal) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(PipelineInner {
                name: name.to_string(),
                elements: Mutex::new(Vec::new()),
                state: Mutex::new(State::Null),
                tx,
                rx: Mutex::new(Some(rx)),
                cancel: Mutex::new(CancellationToken::new()),
                script,
                journal,
            }),
        }
    }

    pub fn elements(&self) -> Vec<SimElement> {
        lock(&self.inner.elements).clone()
    }

    pub fn element(&self, name: &str) -> Option<SimElement> {
        lock(&self.inner.elements)
            .iter()
            .find(|e| e.name() == name)
            .cloned()
    }

    fn post(&self, msg: Notification) {
        // nobody listening is fine, the bus just drops it
        let _ = self.inner.tx.send(msg);
    }

    /// One transition without skipping: children first, then the pipeline.
    fn step(&self, current: &mut State, next: State, target: State) {
        let pending = (next != target).then_some(target);
        for element in self.elements() {
            let old = element.state();
            element.set_state(next);
            self.post(Notification::state_changed(element.name(), old, next, None));
        }
        self.post(Notification::pipeline_state_changed(
            &self.inner.name,
            *current,
            next,
            pending,
        ));
        *current = next;
    }

    fn start_streaming(&self, target: State) -> Result<(), StateChangeError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            log::error!("{}: simulated streaming needs a tokio runtime: {}", self.inner.name, e);
            StateChangeError
        })?;
        let cancel = lock(&self.inner.cancel).clone();
        let pipeline = self.clone();
        handle.spawn_blocking(move || pipeline.streaming_loop(target, cancel));
        Ok(())
    }

    /// Streaming thread: discovers the scripted streams, completes the pending
    /// transition and finally posts the scripted terminal message.
    fn streaming_loop(&self, target: State, cancel: CancellationToken) {
        for demuxer in self.elements().iter().filter(|e| e.is_demuxer()) {
            for caps in &self.inner.script.streams {
                if cancel.is_cancelled() {
                    return;
                }
                demuxer.add_stream_pad(caps.clone());
            }
        }

        let mut current = lock(&self.inner.state);
        if cancel.is_cancelled() {
            return;
        }
        while let Some(next) = current.step_towards(target) {
            self.step(&mut current, next, target);
        }
        if target != State::Playing {
            return;
        }

        match &self.inner.script.terminal {
            Terminal::EndOfStream => self.post(Notification::end_of_stream(&self.inner.name)),
            Terminal::Error {
                element,
                message,
                debug,
            } => self.post(Notification::error(element, message, debug.clone())),
            Terminal::None => {}
        }
    }
}

impl Pipeline for SimPipeline {
    type Element = SimElement;

    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn add(&self, element: &SimElement) -> Result<(), GraphError> {
        let mut elements = lock(&self.inner.elements);
        if elements.iter().any(|e| e.name() == element.name()) {
            return Err(GraphError::AddFailed(element.name()));
        }
        if !element.set_parent(&self.inner.name) {
            return Err(GraphError::AddFailed(element.name()));
        }
        elements.push(element.clone());
        Ok(())
    }

    fn set_state(&self, target: State) -> Result<StateChangeSuccess, StateChangeError> {
        self.inner.journal.record(SimEvent::StateRequested {
            pipeline: self.inner.name.clone(),
            state: target,
        });

        let mut current = lock(&self.inner.state);
        if target > *current && self.inner.script.refuse_state_change {
            return Err(StateChangeError);
        }

        if target <= *current {
            if target < State::Paused {
                let token = std::mem::replace(&mut *lock(&self.inner.cancel), CancellationToken::new());
                token.cancel();
            }
            while let Some(next) = current.step_towards(target) {
                self.step(&mut current, next, target);
            }
            return Ok(StateChangeSuccess::Success);
        }

        while let Some(next) = current.step_towards(target) {
            if next == State::Paused {
                // prerolling needs the streaming thread, the rest completes there
                self.start_streaming(target)?;
                return Ok(StateChangeSuccess::Async);
            }
            self.step(&mut current, next, target);
        }
        Ok(StateChangeSuccess::Success)
    }

    fn current_state(&self) -> State {
        *lock(&self.inner.state)
    }

    fn notifications(&self) -> BoxStream<'static, Notification> {
        match lock(&self.inner.rx).take() {
            Some(rx) => UnboundedReceiverStream::new(rx).boxed(),
            None => {
                log::warn!("{}: bus already taken", self.inner.name);
                futures::stream::empty().boxed()
            }
        }
    }
}
