use media_graph::{gst::GstBackend, plan::GraphPlan, session};

fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .filter_module("media_graph", log::LevelFilter::Debug)
        .parse_default_env()
        .init();
}

fn remux_plan(input: &str, output: &str) -> GraphPlan {
    let source = if input.starts_with("http://") || input.starts_with("https://") {
        "souphttpsrc"
    } else {
        "filesrc"
    };

    GraphPlan::builder("remux-pipeline")
        .node(source, "source")
        .node("matroskademux", "demux")
        .node("queue", "audio_queue")
        .node("queue", "video_queue")
        .node("matroskamux", "mux")
        .node("filesink", "sink")
        .property("source", "location", input)
        .property("sink", "location", output)
        .chain(&["source", "demux"])
        .chain(&["mux", "sink"])
        .fan_in("audio_queue", "src", "mux", "audio_%u", "audio mux branch")
        .fan_in("video_queue", "src", "mux", "video_%u", "video mux branch")
        .route("demux", "audio_queue", "video_queue")
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, output] = args.as_slice() else {
        eprintln!("Usage: mkv-remux <input path or uri> <output path>");
        std::process::exit(2);
    };

    media_graph::init()?;
    let summary = session::run(&GstBackend, &remux_plan(input, output)).await?;
    if !summary.is_success() {
        anyhow::bail!("remux of {} failed: {:?}", input, summary.outcome);
    }
    log::info!("wrote {}", output);
    Ok(())
}
