//! Declarative description of a graph: which nodes exist, which pairs are linked
//! statically, which pads must be requested and where runtime streams go.
//!
//! ```text
//!  filesrc ─► demux ~~audio~~► tee ─► queue ─► ...
//!                  ~~video~~► tee ─► queue ─► ...
//! ```
//! `─►` are static or request links made by the builder, `~~►` is the dynamic route
//! resolved when the demuxer discovers its streams.

use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSpec {
    pub kind: String,
    pub name: String,
    pub properties: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PadSpec {
    /// Pad present from element creation (`sink`, `src`).
    Static(String),
    /// Request template (`src_%u`, `audio_%u`); each request yields a new pad.
    Request(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PadRef {
    pub element: String,
    pub pad: PadSpec,
}

impl PadRef {
    pub fn fixed(element: impl Into<String>, pad: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            pad: PadSpec::Static(pad.into()),
        }
    }

    pub fn request(element: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            pad: PadSpec::Request(template.into()),
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self.pad, PadSpec::Request(_))
    }
}

impl Display for PadRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.pad {
            PadSpec::Static(name) => write!(f, "{}:{}", self.element, name),
            PadSpec::Request(template) => write!(f, "{}:{}", self.element, template),
        }
    }
}

/// A link where at least one side is a request pad (tee fan-out, muxer fan-in).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestLink {
    pub upstream: PadRef,
    pub downstream: PadRef,
    /// Human readable branch name for logs, e.g. "audio file branch".
    pub label: String,
}

/// Where the demuxer's runtime pads go: audio streams to `audio`, everything
/// else to `video`. Both sides are static sink pads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicRoute {
    pub demuxer: String,
    pub audio: PadRef,
    pub video: PadRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphPlan {
    pub name: String,
    pub nodes: Vec<NodeSpec>,
    pub chains: Vec<Vec<String>>,
    pub request_links: Vec<RequestLink>,
    pub route: Option<DynamicRoute>,
    /// `(node, key)` of properties set on a node the plan does not have.
    pub orphan_properties: Vec<(String, String)>,
}

impl GraphPlan {
    pub fn builder(name: impl Into<String>) -> GraphPlanBuilder {
        GraphPlanBuilder {
            name: name.into(),
            nodes: Vec::new(),
            chains: Vec::new(),
            request_links: Vec::new(),
            route: None,
            orphan_properties: Vec::new(),
        }
    }

    pub fn node(&self, name: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

pub struct GraphPlanBuilder {
    name: String,
    nodes: Vec<NodeSpec>,
    chains: Vec<Vec<String>>,
    request_links: Vec<RequestLink>,
    route: Option<DynamicRoute>,
    orphan_properties: Vec<(String, String)>,
}

impl GraphPlanBuilder {
    /// Adds a node of `kind` named `name`.
    pub fn node(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.nodes.push(NodeSpec {
            kind: kind.into(),
            name: name.into(),
            properties: Vec::new(),
        });
        self
    }

    /// Sets a property on an already added node. A property on an unknown node is
    /// kept aside and makes building the graph fail.
    pub fn property(
        mut self,
        node: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        if let Some(spec) = self.nodes.iter_mut().find(|n| n.name == node) {
            spec.properties.push((key.into(), value.into()));
        } else {
            log::warn!("plan {}: property on unknown node {}", self.name, node);
            self.orphan_properties.push((node.to_string(), key.into()));
        }
        self
    }

    /// Statically links each adjacent pair of `nodes`, in order.
    pub fn chain(mut self, nodes: &[&str]) -> Self {
        self.chains.push(nodes.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Requests a pad from `tee` with `template` and links it to `downstream`'s
    /// static `sink_pad`.
    pub fn fan_out(
        mut self,
        tee: &str,
        template: &str,
        downstream: &str,
        sink_pad: &str,
        label: impl Into<String>,
    ) -> Self {
        self.request_links.push(RequestLink {
            upstream: PadRef::request(tee, template),
            downstream: PadRef::fixed(downstream, sink_pad),
            label: label.into(),
        });
        self
    }

    /// Links `upstream`'s static `src_pad` to a pad requested from `muxer`.
    pub fn fan_in(
        mut self,
        upstream: &str,
        src_pad: &str,
        muxer: &str,
        template: &str,
        label: impl Into<String>,
    ) -> Self {
        self.request_links.push(RequestLink {
            upstream: PadRef::fixed(upstream, src_pad),
            downstream: PadRef::request(muxer, template),
            label: label.into(),
        });
        self
    }

    /// Routes the runtime pads of `demuxer` to the `sink` pads of `audio` and `video`.
    pub fn route(mut self, demuxer: &str, audio: &str, video: &str) -> Self {
        self.route = Some(DynamicRoute {
            demuxer: demuxer.to_string(),
            audio: PadRef::fixed(audio, "sink"),
            video: PadRef::fixed(video, "sink"),
        });
        self
    }

    pub fn build(self) -> GraphPlan {
        GraphPlan {
            name: self.name,
            nodes: self.nodes,
            chains: self.chains,
            request_links: self.request_links,
            route: self.route,
            orphan_properties: self.orphan_properties,
        }
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod plan_test;
