use std::time::Duration;

use futures::StreamExt;

use crate::bus::NotificationKind;
use crate::caps::Caps;
use crate::element::{Backend, Element, Pad, Pipeline};
use crate::error::{GraphError, LinkError};
use crate::sim::{SimBackend, SimEvent};
use crate::state::{State, StateChangeSuccess};

#[test]
fn test_unknown_and_unavailable_kinds() {
    let backend = SimBackend::builder().unavailable("vp8dec").build();

    assert!(backend.make_element("vp8dec", "decoder").is_none());
    assert!(backend.make_element("nosuchelement", "x").is_none());
    assert!(backend.make_element("vorbisdec", "decoder").is_some());
    assert_eq!(
        backend.journal(),
        vec![SimEvent::Created {
            kind: "vorbisdec".to_string(),
            name: "decoder".to_string(),
        }]
    );
}

#[test]
fn test_static_link_and_double_link() {
    let backend = SimBackend::new();
    let queue = backend.make_element("queue", "q").unwrap();
    let convert = backend.make_element("audioconvert", "conv").unwrap();
    let resample = backend.make_element("audioresample", "res").unwrap();

    assert_eq!(queue.link(&convert), Ok(()));
    assert_eq!(
        queue.static_pad("src").unwrap().peer().as_deref(),
        Some("conv:sink")
    );
    // both free pads are gone now
    assert_eq!(queue.link(&resample), Err(LinkError::NoPads));
    assert_eq!(backend.links().len(), 1);
    assert_eq!(backend.link_attempts(), 2);
}

#[test]
fn test_request_pads_are_numbered_and_released() {
    let backend = SimBackend::new();
    let tee = backend.make_element("tee", "t").unwrap();
    let first = backend.make_element("queue", "q1").unwrap();

    let a = tee.request_pad("src_%u").unwrap();
    let b = tee.request_pad("src_%u").unwrap();
    assert_eq!(a.name(), "src_0");
    assert_eq!(b.name(), "src_1");
    assert!(tee.request_pad("video_%u").is_none());
    // request pads are not static
    assert!(tee.static_pad("src_0").is_none());

    let sink = first.static_pad("sink").unwrap();
    a.link(&sink).unwrap();
    assert!(sink.is_linked());

    tee.release_request_pad(&a);
    assert!(!sink.is_linked());
    assert_eq!(tee.pads().len(), 2);
}

#[test]
fn test_pad_link_checks_format() {
    let backend = SimBackend::new();
    let demux = backend.make_element("matroskademux", "demux").unwrap();
    let decoder = backend.make_element("vorbisdec", "dec").unwrap();

    let video = demux.add_stream_pad(Some(Caps::new("video/x-vp8")));
    let result = video.link(&decoder.static_pad("sink").unwrap());

    assert_eq!(result, Err(LinkError::NoFormat));
    assert!(!video.is_linked());
}

#[test]
fn test_unknown_property_is_rejected() {
    let backend = SimBackend::new();
    let sink = backend.make_element("filesink", "out").unwrap();

    sink.set_property("location", "clip.mka").unwrap();
    assert_eq!(sink.property("location").as_deref(), Some("clip.mka"));
    assert!(matches!(
        sink.set_property("bitrate", "1"),
        Err(GraphError::Property { .. })
    ));
}

#[test]
fn test_pad_added_callback_sees_stream_caps() {
    let backend = SimBackend::new();
    let demux = backend.make_element("matroskademux", "demux").unwrap();
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

    let sink = seen.clone();
    demux.connect_pad_added(move |element, pad| {
        let media = pad.current_caps().map(|c| c.media_type().to_string());
        sink.lock().unwrap().push((element.name(), pad.name(), media));
    });
    demux.add_stream_pad(Some(Caps::new("audio/x-vorbis")));
    demux.add_stream_pad(None);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (
                "demux".to_string(),
                "audio_0".to_string(),
                Some("audio/x-vorbis".to_string())
            ),
            ("demux".to_string(), "subtitle_0".to_string(), None),
        ]
    );
}

#[test]
fn test_element_belongs_to_one_pipeline() {
    let backend = SimBackend::new();
    let a = backend.new_pipeline("a");
    let b = backend.new_pipeline("b");
    let queue = backend.make_element("queue", "q").unwrap();

    a.add(&queue).unwrap();
    assert!(matches!(b.add(&queue), Err(GraphError::AddFailed(_))));
    assert!(backend.pipeline("a").is_some());
}

#[tokio::test]
async fn test_playing_discovers_streams_then_ends() {
    let backend = SimBackend::new();
    let pipeline = backend.new_pipeline("p");
    let src = backend.make_element("filesrc", "src").unwrap();
    let demux = backend.make_element("matroskademux", "demux").unwrap();
    pipeline.add(&src).unwrap();
    pipeline.add(&demux).unwrap();
    src.link(&demux).unwrap();

    let mut bus = pipeline.notifications();
    assert_eq!(
        pipeline.set_state(State::Playing),
        Ok(StateChangeSuccess::Async)
    );

    let mut pipeline_states = Vec::new();
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), bus.next())
            .await
            .expect("bus stalled")
            .expect("bus closed");
        match msg.kind {
            NotificationKind::StateChanged { new, .. } if msg.source == "p" => {
                pipeline_states.push(new)
            }
            NotificationKind::EndOfStream => break,
            _ => {}
        }
    }

    assert_eq!(
        pipeline_states,
        vec![State::Ready, State::Paused, State::Playing]
    );
    assert_eq!(pipeline.current_state(), State::Playing);
    assert_eq!(demux.pads().len(), 3);

    assert_eq!(pipeline.set_state(State::Null), Ok(StateChangeSuccess::Success));
    assert_eq!(pipeline.current_state(), State::Null);
    assert_eq!(demux.state(), State::Null);
    assert_eq!(
        backend.state_requests("p"),
        vec![State::Playing, State::Null]
    );
}

#[tokio::test]
async fn test_refused_state_change() {
    let backend = SimBackend::builder().refuse_state_change().build();
    let pipeline = backend.new_pipeline("p");

    assert!(pipeline.set_state(State::Playing).is_err());
    assert_eq!(pipeline.current_state(), State::Null);
    // going down is always allowed
    assert!(pipeline.set_state(State::Null).is_ok());
}

#[test]
fn test_bus_taken_once() {
    let backend = SimBackend::new();
    let pipeline = backend.new_pipeline("p");

    let _first = pipeline.notifications();
    let second = futures::executor::block_on(pipeline.notifications().collect::<Vec<_>>());
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_null_while_playing_posts_no_terminal() {
    let backend = SimBackend::builder()
        .stream(Caps::new("video/x-vp8"))
        .keep_playing()
        .build();
    let pipeline = backend.new_pipeline("p");
    let mut bus = pipeline.notifications();
    pipeline.set_state(State::Playing).unwrap();

    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), bus.next())
            .await
            .expect("bus stalled")
            .expect("bus closed");
        if msg.source == "p"
            && matches!(msg.kind, NotificationKind::StateChanged { new: State::Playing, .. })
        {
            break;
        }
    }
    pipeline.set_state(State::Null).unwrap();
    assert_eq!(pipeline.current_state(), State::Null);

    while let Ok(Some(msg)) = tokio::time::timeout(Duration::from_millis(50), bus.next()).await {
        assert!(matches!(msg.kind, NotificationKind::StateChanged { .. }));
    }
}
