//! Turns a [`GraphPlan`] into a linked [`Graph`].
//!
//! Every element is created before anything is added or linked, so a missing
//! plugin is reported without leaving a half built pipeline. Request pads are
//! acquired and linked here too: a tee branch left unlinked would silently
//! drop its data once playing.

use crate::{
    element::{Backend, Element, Pad},
    error::{GraphError, Result},
    graph::Graph,
    plan::{GraphPlan, PadRef, PadSpec, RequestLink},
};

pub fn build<B: Backend>(backend: &B, plan: &GraphPlan) -> Result<Graph<B>> {
    if let Some((node, key)) = plan.orphan_properties.first() {
        log::error!("Property {} set on unknown element {}.", key, node);
        return Err(GraphError::UnknownElement(node.clone()));
    }

    let mut created = Vec::with_capacity(plan.nodes.len());
    for node in &plan.nodes {
        let Some(element) = backend.make_element(&node.kind, &node.name) else {
            log::error!(
                "Not all elements could be created: {} ({}) is missing.",
                node.name,
                node.kind
            );
            return Err(GraphError::ElementUnavailable {
                kind: node.kind.clone(),
                name: node.name.clone(),
            });
        };
        created.push((node, element));
    }

    let mut graph = Graph::new(&plan.name, backend.new_pipeline(&plan.name));
    for (node, element) in created {
        for (key, value) in &node.properties {
            element.set_property(key, value)?;
        }
        graph.insert(&node.name, element)?;
    }

    for chain in &plan.chains {
        for pair in chain.windows(2) {
            let (upstream, downstream) = (&pair[0], &pair[1]);
            let (up, down): (&B::Element, &B::Element) =
                (graph.element(upstream)?, graph.element(downstream)?);
            if let Err(reason) = up.link(down) {
                log::error!("Elements {}, {} could not be linked.", upstream, downstream);
                return Err(GraphError::LinkFailed {
                    upstream: upstream.clone(),
                    downstream: downstream.clone(),
                    reason,
                });
            }
        }
    }

    for link in &plan.request_links {
        link_request(&mut graph, link)?;
    }

    log::debug!(
        "{}: built {} elements, {} request pads",
        plan.name,
        plan.nodes.len(),
        graph.request_pad_count()
    );
    Ok(graph)
}

/// One side of a request link. `owner` is set when the pad came from a request
/// template and has to be given back.
struct Endpoint<B: Backend> {
    pad: B::Pad,
    owner: Option<B::Element>,
}

impl<B: Backend> Endpoint<B> {
    fn release(self) {
        if let Some(owner) = self.owner {
            owner.release_request_pad(&self.pad);
        }
    }
}

fn acquire<B: Backend>(graph: &Graph<B>, pad: &PadRef, label: &str) -> Result<Endpoint<B>> {
    match &pad.pad {
        PadSpec::Static(_) => Ok(Endpoint {
            pad: graph.static_pad(pad)?,
            owner: None,
        }),
        PadSpec::Request(template) => {
            let owner = graph.element(&pad.element)?;
            let Some(requested) = owner.request_pad(template) else {
                log::error!("{}: no pad available from {}", label, pad);
                return Err(GraphError::PadUnavailable {
                    element: pad.element.clone(),
                    pad: template.clone(),
                });
            };
            log::info!("Obtained request pad {} for {}.", requested.name(), label);
            Ok(Endpoint {
                pad: requested,
                owner: Some(owner.clone()),
            })
        }
    }
}

fn link_request<B: Backend>(graph: &mut Graph<B>, link: &RequestLink) -> Result<()> {
    let upstream = acquire(graph, &link.upstream, &link.label)?;
    let downstream = match acquire(graph, &link.downstream, &link.label) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            upstream.release();
            return Err(e);
        }
    };

    if let Err(reason) = upstream.pad.link(&downstream.pad) {
        log::error!("{} could not be linked.", link.label);
        let err = GraphError::LinkFailed {
            upstream: upstream.pad.path(),
            downstream: downstream.pad.path(),
            reason,
        };
        upstream.release();
        downstream.release();
        return Err(err);
    }

    for endpoint in [upstream, downstream] {
        if let Some(owner) = endpoint.owner {
            graph.track_request_pad(owner, endpoint.pad);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
