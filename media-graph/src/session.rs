use crate::{
    builder,
    bus::{self, RunSummary},
    element::Backend,
    error::Result,
    plan::GraphPlan,
    state::State,
};

/// Builds `plan`, plays it until an error or end of stream, then tears it down.
///
/// Construction and state-change failures are returned before the bus is read;
/// a failure reported on the bus ends up in the summary instead.
pub async fn run<B: Backend>(backend: &B, plan: &GraphPlan) -> Result<RunSummary> {
    let graph = builder::build(backend, plan)?;
    if let Some(route) = &plan.route {
        graph.attach_router(route)?;
    }

    // subscribe before playing so no early notification is missed
    let notifications = graph.notifications();
    graph.request_state(State::Playing)?;

    let summary = bus::pump(graph.name(), notifications).await;
    graph.teardown();
    Ok(summary)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
