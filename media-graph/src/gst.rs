//! GStreamer implementation of the element contract.

use futures::{StreamExt, stream::BoxStream};
use gstreamer as gst;
use gstreamer::prelude::*;

use crate::{
    bus::{Notification, NotificationKind},
    caps::Caps,
    element::{Backend, Element, Pad, PadDirection, Pipeline},
    error::{GraphError, LinkError},
    state::{State, StateChangeError, StateChangeSuccess},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct GstBackend;

#[derive(Clone, Debug)]
pub struct GstPad(gst::Pad);

#[derive(Clone, Debug)]
pub struct GstElement(gst::Element);

#[derive(Debug)]
pub struct GstPipeline(gst::Pipeline);

fn to_gst_state(state: State) -> gst::State {
    match state {
        State::Null => gst::State::Null,
        State::Ready => gst::State::Ready,
        State::Paused => gst::State::Paused,
        State::Playing => gst::State::Playing,
    }
}

/// `VoidPending` has no counterpart and maps to `None`.
fn from_gst_state(state: gst::State) -> Option<State> {
    match state {
        gst::State::Null => Some(State::Null),
        gst::State::Ready => Some(State::Ready),
        gst::State::Paused => Some(State::Paused),
        gst::State::Playing => Some(State::Playing),
        _ => None,
    }
}

fn from_link_error(err: gst::PadLinkError) -> LinkError {
    match err {
        gst::PadLinkError::WasLinked => LinkError::WasLinked,
        gst::PadLinkError::WrongDirection => LinkError::WrongDirection,
        gst::PadLinkError::Noformat => LinkError::NoFormat,
        gst::PadLinkError::WrongHierarchy => LinkError::WrongHierarchy,
        _ => LinkError::Refused,
    }
}

fn to_caps(caps: &gst::CapsRef) -> Option<Caps> {
    let structure = caps.structure(0)?;
    let mut out = Caps::new(structure.name().as_str());
    for (field, value) in structure.iter() {
        if let Ok(value) = value.serialize() {
            out = out.with_field(field.as_str(), value.as_str());
        }
    }
    Some(out)
}

fn to_notification(msg: &gst::Message, from_pipeline: bool) -> Notification {
    use gst::MessageView;

    let source = msg
        .src()
        .map(|s| s.name().to_string())
        .unwrap_or_default();
    let kind = match msg.view() {
        MessageView::Error(err) => NotificationKind::Error {
            message: err.error().to_string(),
            debug: err.debug().map(|d| d.to_string()),
        },
        MessageView::Eos(_) => NotificationKind::EndOfStream,
        MessageView::StateChanged(changed) => {
            match (from_gst_state(changed.old()), from_gst_state(changed.current())) {
                (Some(old), Some(new)) => NotificationKind::StateChanged {
                    old,
                    new,
                    pending: from_gst_state(changed.pending()),
                },
                _ => NotificationKind::Other("state-changed".to_string()),
            }
        }
        _ => NotificationKind::Other(format!("{:?}", msg.type_())),
    };
    Notification {
        source,
        from_pipeline,
        kind,
    }
}

impl Pad for GstPad {
    fn name(&self) -> String {
        self.0.name().to_string()
    }

    fn parent_name(&self) -> Option<String> {
        self.0.parent_element().map(|e| e.name().to_string())
    }

    fn direction(&self) -> PadDirection {
        match self.0.direction() {
            gst::PadDirection::Src => PadDirection::Src,
            _ => PadDirection::Sink,
        }
    }

    fn is_linked(&self) -> bool {
        self.0.is_linked()
    }

    fn current_caps(&self) -> Option<Caps> {
        self.0.current_caps().and_then(|caps| to_caps(&caps))
    }

    fn link(&self, sink: &Self) -> Result<(), LinkError> {
        self.0.link(&sink.0).map(|_| ()).map_err(from_link_error)
    }
}

impl Element for GstElement {
    type Pad = GstPad;

    fn name(&self) -> String {
        self.0.name().to_string()
    }

    fn static_pad(&self, name: &str) -> Option<GstPad> {
        self.0.static_pad(name).map(GstPad)
    }

    fn request_pad(&self, template: &str) -> Option<GstPad> {
        self.0.request_pad_simple(template).map(GstPad)
    }

    fn release_request_pad(&self, pad: &GstPad) {
        self.0.release_request_pad(&pad.0);
    }

    fn set_property(&self, key: &str, value: &str) -> Result<(), GraphError> {
        let writable = self
            .0
            .find_property(key)
            .is_some_and(|pspec| pspec.flags().contains(gst::glib::ParamFlags::WRITABLE));
        if !writable {
            return Err(GraphError::Property {
                element: self.name(),
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        self.0.set_property_from_str(key, value);
        Ok(())
    }

    fn link(&self, downstream: &Self) -> Result<(), LinkError> {
        // element linking only reports a message, not the pad-level reason
        self.0.link(&downstream.0).map_err(|e| {
            log::debug!("{} -> {}: {}", self.name(), downstream.name(), e);
            LinkError::Refused
        })
    }

    fn connect_pad_added<F>(&self, callback: F)
    where
        F: Fn(&Self, &GstPad) + Send + Sync + 'static,
    {
        self.0.connect_pad_added(move |element, pad| {
            callback(&GstElement(element.clone()), &GstPad(pad.clone()));
        });
    }
}

impl Pipeline for GstPipeline {
    type Element = GstElement;

    fn name(&self) -> String {
        self.0.name().to_string()
    }

    fn add(&self, element: &GstElement) -> Result<(), GraphError> {
        self.0
            .add(&element.0)
            .map_err(|_| GraphError::AddFailed(element.name()))
    }

    fn set_state(&self, state: State) -> Result<StateChangeSuccess, StateChangeError> {
        match self.0.set_state(to_gst_state(state)) {
            Ok(gst::StateChangeSuccess::Async) => Ok(StateChangeSuccess::Async),
            Ok(gst::StateChangeSuccess::NoPreroll) => Ok(StateChangeSuccess::NoPreroll),
            Ok(_) => Ok(StateChangeSuccess::Success),
            Err(_) => Err(StateChangeError),
        }
    }

    fn current_state(&self) -> State {
        from_gst_state(self.0.current_state()).unwrap_or(State::Null)
    }

    fn notifications(&self) -> BoxStream<'static, Notification> {
        let Some(bus) = self.0.bus() else {
            log::error!("{}: pipeline without a bus", self.name());
            return futures::stream::empty().boxed();
        };
        let pipeline = self.0.downgrade();
        bus.stream_filtered(&[
            gst::MessageType::Error,
            gst::MessageType::Eos,
            gst::MessageType::StateChanged,
        ])
        .map(move |msg| {
            let from_pipeline = match (msg.src(), pipeline.upgrade()) {
                (Some(src), Some(pipeline)) => src == pipeline.upcast_ref::<gst::Object>(),
                _ => false,
            };
            to_notification(&msg, from_pipeline)
        })
        .boxed()
    }
}

impl Backend for GstBackend {
    type Pad = GstPad;
    type Element = GstElement;
    type Pipeline = GstPipeline;

    fn make_element(&self, kind: &str, name: &str) -> Option<GstElement> {
        match gst::ElementFactory::make(kind).name(name).build() {
            Ok(element) => Some(GstElement(element)),
            Err(e) => {
                log::debug!("{} ({}): {}", name, kind, e);
                None
            }
        }
    }

    fn new_pipeline(&self, name: &str) -> GstPipeline {
        GstPipeline(gst::Pipeline::builder().name(name).build())
    }
}

#[cfg(test)]
#[path = "gst_test.rs"]
mod gst_test;
