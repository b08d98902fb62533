//! The splitter graph: plays a WebM/Matroska file locally while writing its audio
//! stream to `base.mka` and its video stream to `base.mkv`.
//!
//! ```text
//!                            ┌► audio_auto_queue ► vorbisdec ► audio_convert ► audio_resample ► audio_sink
//!               ┌► audio_tee ┤
//!               │            └► audio_file_queue ► vorbisparse ► audio_matroskamux ► audio_file_sink
//! source ► demux┤
//!               │            ┌► video_auto_queue ► vp8dec ► video_convert ► video_sink
//!               └► video_tee ┤
//!                            └► video_file_queue ► video_matroskamux ► video_file_sink
//! ```

use media_graph::plan::GraphPlan;

use crate::config::SplitConfig;

pub const PIPELINE_NAME: &str = "test-pipeline";

pub fn plan(config: &SplitConfig) -> GraphPlan {
    GraphPlan::builder(PIPELINE_NAME)
        .node("filesrc", "source")
        .node("matroskademux", "matroskademux")
        .node("tee", "audio_tee")
        .node("tee", "video_tee")
        .node("queue", "audio_file_queue")
        .node("queue", "video_file_queue")
        .node("queue", "audio_auto_queue")
        .node("queue", "video_auto_queue")
        .node("vorbisdec", "vorbisdec")
        .node("audioconvert", "audio_convert")
        .node("audioresample", "audio_resample")
        .node("vp8dec", "vp8dec")
        .node("videoconvert", "video_convert")
        .node(config.audio_sink.as_str(), "audio_sink")
        .node(config.video_sink.as_str(), "video_sink")
        .node("vorbisparse", "vorbisparse")
        .node("matroskamux", "audio_matroskamux")
        .node("matroskamux", "video_matroskamux")
        .node("filesink", "audio_file_sink")
        .node("filesink", "video_file_sink")
        .property("source", "location", config.input.to_string_lossy())
        .property(
            "audio_file_sink",
            "location",
            config.outputs.audio.to_string_lossy(),
        )
        .property(
            "video_file_sink",
            "location",
            config.outputs.video.to_string_lossy(),
        )
        // the demuxer's stream pads are linked once they exist
        .chain(&["source", "matroskademux"])
        .chain(&[
            "audio_auto_queue",
            "vorbisdec",
            "audio_convert",
            "audio_resample",
            "audio_sink",
        ])
        .chain(&["video_auto_queue", "vp8dec", "video_convert", "video_sink"])
        .chain(&["audio_file_queue", "vorbisparse"])
        .chain(&["audio_matroskamux", "audio_file_sink"])
        .chain(&["video_matroskamux", "video_file_sink"])
        .fan_out("audio_tee", "src_%u", "audio_auto_queue", "sink", "Tee")
        .fan_out("video_tee", "src_%u", "video_auto_queue", "sink", "Tee")
        .fan_out("audio_tee", "src_%u", "audio_file_queue", "sink", "Tee")
        .fan_out("video_tee", "src_%u", "video_file_queue", "sink", "Tee")
        .fan_in(
            "video_file_queue",
            "src",
            "video_matroskamux",
            "video_%u",
            "Matroskamux",
        )
        .fan_in(
            "vorbisparse",
            "src",
            "audio_matroskamux",
            "audio_%u",
            "Matroskamux",
        )
        .route("matroskademux", "audio_tee", "video_tee")
        .build()
}

#[cfg(test)]
#[path = "converter_test.rs"]
mod converter_test;
