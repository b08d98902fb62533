use futures::stream;

use crate::bus::{Notification, NotificationKind, Outcome, Transition, pump};
use crate::state::State;

fn pipeline_change(old: State, new: State, pending: Option<State>) -> Notification {
    Notification::pipeline_state_changed("test-pipeline", old, new, pending)
}

#[tokio::test]
async fn test_pump_stops_on_end_of_stream() {
    let messages = vec![
        pipeline_change(State::Null, State::Ready, Some(State::Playing)),
        Notification::end_of_stream("test-pipeline"),
        // never reached
        Notification::error("source", "late", None),
    ];

    let summary = pump("test-pipeline", stream::iter(messages)).await;

    assert!(summary.is_success());
    assert_eq!(summary.outcome, Outcome::EndOfStream);
    assert_eq!(summary.transitions.len(), 1);
}

#[tokio::test]
async fn test_pump_stops_on_error_and_keeps_payload() {
    let messages = vec![
        Notification::error(
            "vp8dec",
            "Could not decode stream.",
            Some("gstvpxdec.c(402): corrupt frame".to_string()),
        ),
        Notification::end_of_stream("test-pipeline"),
    ];

    let summary = pump("test-pipeline", stream::iter(messages)).await;

    assert!(!summary.is_success());
    assert_eq!(
        summary.outcome,
        Outcome::Error {
            source: "vp8dec".to_string(),
            message: "Could not decode stream.".to_string(),
            debug: Some("gstvpxdec.c(402): corrupt frame".to_string()),
        }
    );
}

#[tokio::test]
async fn test_pump_reports_only_pipeline_state_changes() {
    let messages = vec![
        Notification::state_changed("queue0", State::Null, State::Ready, None),
        pipeline_change(State::Null, State::Ready, Some(State::Playing)),
        Notification::state_changed("matroskademux", State::Ready, State::Paused, None),
        pipeline_change(State::Ready, State::Paused, Some(State::Playing)),
        pipeline_change(State::Paused, State::Playing, None),
        Notification::end_of_stream("test-pipeline"),
    ];

    let summary = pump("test-pipeline", stream::iter(messages)).await;

    assert_eq!(
        summary.transitions,
        vec![
            Transition {
                old: State::Null,
                new: State::Ready,
                pending: Some(State::Playing)
            },
            Transition {
                old: State::Ready,
                new: State::Paused,
                pending: Some(State::Playing)
            },
            Transition {
                old: State::Paused,
                new: State::Playing,
                pending: None
            },
        ]
    );
    assert_eq!(summary.last_state(), Some(State::Playing));
}

#[tokio::test]
async fn test_pump_continues_after_unexpected_message() {
    let messages = vec![
        Notification {
            source: "test-pipeline".to_string(),
            from_pipeline: true,
            kind: NotificationKind::Other("latency".to_string()),
        },
        Notification::end_of_stream("test-pipeline"),
    ];

    let summary = pump("test-pipeline", stream::iter(messages)).await;

    assert_eq!(summary.unexpected, 1);
    assert!(summary.is_success());
}

#[tokio::test]
async fn test_pump_closed_bus_is_not_success() {
    let messages = vec![pipeline_change(State::Null, State::Ready, None)];

    let summary = pump("test-pipeline", stream::iter(messages)).await;

    assert_eq!(summary.outcome, Outcome::Closed);
    assert!(!summary.is_success());
}

#[tokio::test]
async fn test_pump_ignores_child_named_like_the_pipeline() {
    let messages = vec![
        pipeline_change(State::Null, State::Ready, Some(State::Playing)),
        // a queue that happens to be called "test-pipeline"
        Notification::state_changed("test-pipeline", State::Ready, State::Paused, None),
        Notification::end_of_stream("test-pipeline"),
    ];

    let summary = pump("test-pipeline", stream::iter(messages)).await;

    assert_eq!(summary.transitions.len(), 1);
    assert_eq!(summary.last_state(), Some(State::Ready));
}
