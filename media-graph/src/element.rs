//! Contract with the element framework.
//!
//! The framework owns the actual processing nodes and their streaming threads. This
//! crate only creates nodes by kind, joins their pads and drives the pipeline state,
//! so the whole surface it needs fits in four traits. `crate::gst` maps them onto
//! GStreamer, `crate::sim` onto an in-process simulation used by the tests.

use futures::stream::BoxStream;

use crate::{
    bus::Notification,
    caps::Caps,
    error::{GraphError, LinkError},
    state::{State, StateChangeError, StateChangeSuccess},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadDirection {
    Src,
    Sink,
}

/// A connection point on an element. Handles are reference counted; dropping one
/// releases the reference, not the pad.
pub trait Pad: Clone + Send + Sync + 'static {
    fn name(&self) -> String;

    /// Name of the owning element, if the pad still has one.
    fn parent_name(&self) -> Option<String>;

    fn direction(&self) -> PadDirection;

    fn is_linked(&self) -> bool;

    /// Negotiated caps, `None` before the first caps event.
    fn current_caps(&self) -> Option<Caps>;

    /// Links `self` (a source pad) to `sink`.
    fn link(&self, sink: &Self) -> Result<(), LinkError>;

    /// `element:pad`, used in diagnostics.
    fn path(&self) -> String {
        match self.parent_name() {
            Some(parent) => format!("{}:{}", parent, self.name()),
            None => self.name(),
        }
    }
}

pub trait Element: Clone + Send + Sync + 'static {
    type Pad: Pad;

    fn name(&self) -> String;

    /// A pad that exists from creation on, such as `sink` or `src`.
    fn static_pad(&self, name: &str) -> Option<Self::Pad>;

    /// Creates a fresh, uniquely named pad from a request template such as
    /// `src_%u` or `audio_%u`.
    fn request_pad(&self, template: &str) -> Option<Self::Pad>;

    /// Hands a pad obtained from [`Element::request_pad`] back to the element.
    fn release_request_pad(&self, pad: &Self::Pad);

    fn set_property(&self, key: &str, value: &str) -> Result<(), GraphError>;

    /// Links the first compatible source pad of `self` with a sink pad of `downstream`.
    fn link(&self, downstream: &Self) -> Result<(), LinkError>;

    /// Registers `callback` for pads that appear at runtime. The framework calls it
    /// from one of its streaming threads.
    fn connect_pad_added<F>(&self, callback: F)
    where
        F: Fn(&Self, &Self::Pad) + Send + Sync + 'static;
}

pub trait Pipeline: Send + Sync + 'static {
    type Element: Element;

    fn name(&self) -> String;

    fn add(&self, element: &Self::Element) -> Result<(), GraphError>;

    /// Requests a transition of the whole pipeline. Returns immediately.
    fn set_state(&self, state: State) -> Result<StateChangeSuccess, StateChangeError>;

    fn current_state(&self) -> State;

    /// Pipeline bus restricted to state-changed, error and end-of-stream
    /// notifications, in emission order. Take it once per pipeline.
    fn notifications(&self) -> BoxStream<'static, Notification>;
}

/// Element registry: creates nodes by kind name.
pub trait Backend {
    type Pad: Pad;
    type Element: Element<Pad = Self::Pad>;
    type Pipeline: Pipeline<Element = Self::Element>;

    /// `None` when the kind is unknown or its plugin is missing.
    fn make_element(&self, kind: &str, name: &str) -> Option<Self::Element>;

    fn new_pipeline(&self, name: &str) -> Self::Pipeline;
}
