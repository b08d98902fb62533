use crate::element::PadDirection;

/// Capabilities of one simulated element kind.
pub(crate) struct KindSpec {
    pub kind: &'static str,
    pub sink: bool,
    pub src: bool,
    /// Media types the static sink pad takes; empty means any.
    pub accepts: &'static [&'static str],
    pub request_templates: &'static [(&'static str, PadDirection)],
    pub properties: &'static [&'static str],
    /// Exposes one `sometimes` pad per elementary stream while prerolling.
    pub demuxer: bool,
}

const VORBIS: &[&str] = &["audio/x-vorbis"];
const VP8: &[&str] = &["video/x-vp8"];
const QUEUE_PROPERTIES: &[&str] = &["max-size-buffers", "max-size-bytes", "max-size-time"];
const SINK_PROPERTIES: &[&str] = &["sync", "async"];

const fn filter(kind: &'static str, accepts: &'static [&'static str]) -> KindSpec {
    KindSpec {
        kind,
        sink: true,
        src: true,
        accepts,
        request_templates: &[],
        properties: &[],
        demuxer: false,
    }
}

const fn sink(kind: &'static str, properties: &'static [&'static str]) -> KindSpec {
    KindSpec {
        kind,
        sink: true,
        src: false,
        accepts: &[],
        request_templates: &[],
        properties,
        demuxer: false,
    }
}

const fn source(kind: &'static str) -> KindSpec {
    KindSpec {
        kind,
        sink: false,
        src: true,
        accepts: &[],
        request_templates: &[],
        properties: &["location"],
        demuxer: false,
    }
}

static CATALOG: &[KindSpec] = &[
    source("filesrc"),
    source("souphttpsrc"),
    KindSpec {
        kind: "matroskademux",
        sink: true,
        src: false,
        accepts: &[],
        request_templates: &[],
        properties: &[],
        demuxer: true,
    },
    KindSpec {
        kind: "tee",
        sink: true,
        src: false,
        accepts: &[],
        request_templates: &[("src_%u", PadDirection::Src)],
        properties: &["allow-not-linked"],
        demuxer: false,
    },
    KindSpec {
        properties: QUEUE_PROPERTIES,
        ..filter("queue", &[])
    },
    filter("vorbisdec", VORBIS),
    filter("vorbisparse", VORBIS),
    filter("audioconvert", &[]),
    filter("audioresample", &[]),
    filter("vp8dec", VP8),
    filter("videoconvert", &[]),
    sink("autoaudiosink", SINK_PROPERTIES),
    sink("autovideosink", SINK_PROPERTIES),
    sink("fakesink", SINK_PROPERTIES),
    sink("filesink", &["location", "sync", "async"]),
    KindSpec {
        kind: "matroskamux",
        sink: false,
        src: true,
        accepts: &[],
        request_templates: &[
            ("audio_%u", PadDirection::Sink),
            ("video_%u", PadDirection::Sink),
            ("subtitle_%u", PadDirection::Sink),
        ],
        properties: &["writing-app", "streamable"],
        demuxer: false,
    },
];

pub(crate) fn lookup(kind: &str) -> Option<&'static KindSpec> {
    CATALOG.iter().find(|spec| spec.kind == kind)
}
