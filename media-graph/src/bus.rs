use futures::{Stream, StreamExt};

use crate::state::State;

/// A message posted on the pipeline bus by the pipeline itself or by one of its
/// elements. `source` is the name of the posting object; names are only unique
/// among siblings, so `from_pipeline` tells whether the poster is the pipeline
/// object itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub source: String,
    pub from_pipeline: bool,
    pub kind: NotificationKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    StateChanged {
        old: State,
        new: State,
        pending: Option<State>,
    },
    Error {
        message: String,
        debug: Option<String>,
    },
    EndOfStream,
    /// Any other message type a backend lets through, by type name.
    Other(String),
}

impl Notification {
    pub fn state_changed(
        source: impl Into<String>,
        old: State,
        new: State,
        pending: Option<State>,
    ) -> Self {
        Self {
            source: source.into(),
            from_pipeline: false,
            kind: NotificationKind::StateChanged { old, new, pending },
        }
    }

    /// A state change posted by the pipeline itself.
    pub fn pipeline_state_changed(
        source: impl Into<String>,
        old: State,
        new: State,
        pending: Option<State>,
    ) -> Self {
        Self {
            from_pipeline: true,
            ..Self::state_changed(source, old, new, pending)
        }
    }

    pub fn error(
        source: impl Into<String>,
        message: impl Into<String>,
        debug: Option<String>,
    ) -> Self {
        Self {
            source: source.into(),
            from_pipeline: false,
            kind: NotificationKind::Error {
                message: message.into(),
                debug,
            },
        }
    }

    pub fn end_of_stream(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            from_pipeline: false,
            kind: NotificationKind::EndOfStream,
        }
    }
}

/// A state change of the pipeline itself, as reported on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub old: State,
    pub new: State,
    pub pending: Option<State>,
}

/// Why the message pump stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    EndOfStream,
    Error {
        source: String,
        message: String,
        debug: Option<String>,
    },
    /// The bus went away without a terminal message.
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub transitions: Vec<Transition>,
    pub unexpected: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::EndOfStream
    }

    /// Last state the pipeline reported reaching, if any.
    pub fn last_state(&self) -> Option<State> {
        self.transitions.last().map(|t| t.new)
    }
}

/// Consumes notifications until an error or end-of-stream arrives.
///
/// Waits without timeout. State changes are only reported when posted by the
/// pipeline object itself; those of child elements go through the same channel
/// and are filtered here, even when a child shares the pipeline's name.
pub async fn pump<S>(graph_name: &str, mut notifications: S) -> RunSummary
where
    S: Stream<Item = Notification> + Unpin,
{
    let mut terminate = false;
    let mut outcome = Outcome::Closed;
    let mut transitions = Vec::new();
    let mut unexpected = 0;

    while !terminate {
        let Some(msg) = notifications.next().await else {
            log::error!("bus of {} closed before end of stream", graph_name);
            break;
        };

        match msg.kind {
            NotificationKind::Error { message, debug } => {
                log::error!("Error received from element {}: {}", msg.source, message);
                log::error!(
                    "Debugging information: {}",
                    debug.as_deref().unwrap_or("none")
                );
                outcome = Outcome::Error {
                    source: msg.source,
                    message,
                    debug,
                };
                terminate = true;
            }
            NotificationKind::EndOfStream => {
                log::info!("End-Of-Stream reached.");
                outcome = Outcome::EndOfStream;
                terminate = true;
            }
            NotificationKind::StateChanged { old, new, pending } => {
                if msg.from_pipeline {
                    log::info!("Pipeline state changed from {} to {}", old, new);
                    transitions.push(Transition { old, new, pending });
                } else {
                    log::trace!("{} state changed from {} to {}", msg.source, old, new);
                }
            }
            NotificationKind::Other(kind) => {
                log::warn!("Unexpected message received: {} from {}", kind, msg.source);
                unexpected += 1;
            }
        }
    }

    RunSummary {
        outcome,
        transitions,
        unexpected,
    }
}

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;
