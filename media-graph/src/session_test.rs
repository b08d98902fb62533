use crate::bus::Outcome;
use crate::caps::Caps;
use crate::element::Pipeline;
use crate::error::GraphError;
use crate::plan::GraphPlan;
use crate::session::run;
use crate::sim::SimBackend;
use crate::state::State;

fn remux_plan() -> GraphPlan {
    GraphPlan::builder("remux")
        .node("filesrc", "source")
        .node("matroskademux", "demux")
        .node("queue", "audio_queue")
        .node("queue", "video_queue")
        .node("matroskamux", "mux")
        .node("filesink", "sink")
        .property("source", "location", "clip.webm")
        .property("sink", "location", "out.mkv")
        .chain(&["source", "demux"])
        .chain(&["mux", "sink"])
        .fan_in("audio_queue", "src", "mux", "audio_%u", "audio")
        .fan_in("video_queue", "src", "mux", "video_%u", "video")
        .route("demux", "audio_queue", "video_queue")
        .build()
}

#[tokio::test]
async fn test_run_to_end_of_stream() {
    let backend = SimBackend::new();

    let summary = run(&backend, &remux_plan()).await.unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.last_state(), Some(State::Playing));
    assert_eq!(
        backend.state_requests("remux"),
        vec![State::Playing, State::Null]
    );
    assert_eq!(
        backend.pipeline("remux").unwrap().current_state(),
        State::Null
    );

    let links = backend.links();
    let demux_links: Vec<_> = links
        .iter()
        .filter(|(up, _)| up.starts_with("demux:"))
        .collect();
    assert_eq!(
        demux_links,
        vec![
            &("demux:audio_0".to_string(), "audio_queue:sink".to_string()),
            &("demux:video_0".to_string(), "video_queue:sink".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_run_stops_on_error_and_still_tears_down() {
    let backend = SimBackend::builder()
        .stream(Caps::new("audio/x-vorbis"))
        .end_with_error("demux", "Internal data stream error.", Some("streaming stopped"))
        .build();

    let summary = run(&backend, &remux_plan()).await.unwrap();

    assert!(!summary.is_success());
    assert!(matches!(summary.outcome, Outcome::Error { ref source, .. } if source == "demux"));
    assert_eq!(
        backend.state_requests("remux"),
        vec![State::Playing, State::Null]
    );
}

#[tokio::test]
async fn test_extra_streams_do_not_add_links() {
    let backend = SimBackend::builder()
        .stream(Caps::new("audio/x-vorbis"))
        .stream(Caps::new("audio/x-vorbis"))
        .stream(Caps::new("video/x-vp8"))
        .stream(Caps::new("text/x-raw"))
        .build();

    let summary = run(&backend, &remux_plan()).await.unwrap();

    assert!(summary.is_success());
    let from_demux = backend
        .links()
        .into_iter()
        .filter(|(up, _)| up.starts_with("demux:"))
        .count();
    assert_eq!(from_demux, 2);
}

#[tokio::test]
async fn test_construction_failure_never_plays() {
    let backend = SimBackend::builder().unavailable("matroskademux").build();

    let err = run(&backend, &remux_plan()).await.err().unwrap();

    assert!(matches!(err, GraphError::ElementUnavailable { .. }));
    assert_eq!(backend.link_attempts(), 0);
    assert!(backend.state_requests("remux").is_empty());
}

#[tokio::test]
async fn test_refused_state_change_is_fatal() {
    let backend = SimBackend::builder().refuse_state_change().build();

    let err = run(&backend, &remux_plan()).await.err().unwrap();

    assert!(matches!(err, GraphError::StateChange(State::Playing)));
    // torn down on the way out
    assert_eq!(
        backend.state_requests("remux"),
        vec![State::Playing, State::Null]
    );
}

#[tokio::test]
async fn test_child_sharing_the_pipeline_name_is_not_a_transition() {
    let backend = SimBackend::new();
    let plan = GraphPlan::builder("remux")
        .node("filesrc", "source")
        .node("matroskademux", "demux")
        .node("queue", "remux")
        .node("queue", "video_queue")
        .node("matroskamux", "mux")
        .node("filesink", "sink")
        .chain(&["source", "demux"])
        .chain(&["mux", "sink"])
        .fan_in("remux", "src", "mux", "audio_%u", "audio")
        .fan_in("video_queue", "src", "mux", "video_%u", "video")
        .route("demux", "remux", "video_queue")
        .build();

    let summary = run(&backend, &plan).await.unwrap();

    assert!(summary.is_success());
    assert_eq!(
        summary
            .transitions
            .iter()
            .map(|t| t.new)
            .collect::<Vec<_>>(),
        vec![State::Ready, State::Paused, State::Playing]
    );
}
