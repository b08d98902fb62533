//! Error types for graph construction and lifecycle control.

use thiserror::Error;

use crate::state::State;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Why two pads (or two elements) could not be joined.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    #[error("pad was already linked")]
    WasLinked,
    #[error("pads have wrong direction")]
    WrongDirection,
    #[error("pads do not have common format")]
    NoFormat,
    #[error("pads have no common parent pipeline")]
    WrongHierarchy,
    #[error("no compatible pads")]
    NoPads,
    #[error("link refused")]
    Refused,
}

#[derive(Error, Debug)]
pub enum GraphError {
    /// The element factory returned nothing for this kind.
    #[error("element {name} ({kind}) could not be created")]
    ElementUnavailable { kind: String, name: String },

    #[error("element {0} could not be added to the pipeline")]
    AddFailed(String),

    #[error("no element named {0} in the graph")]
    UnknownElement(String),

    #[error("element {element} has no pad available as {pad}")]
    PadUnavailable { element: String, pad: String },

    #[error("elements {upstream}, {downstream} could not be linked: {reason}")]
    LinkFailed {
        upstream: String,
        downstream: String,
        reason: LinkError,
    },

    #[error("element {element} rejected property {key}={value}")]
    Property {
        element: String,
        key: String,
        value: String,
    },

    #[error("unable to set the pipeline to the {0} state")]
    StateChange(State),
}
