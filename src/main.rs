use media_graph::{gst::GstBackend, session};
use mkv_split::{
    config::{ConfigError, SplitConfig},
    converter,
};

fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .filter_module("media_graph", log::LevelFilter::Debug)
        .parse_default_env()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = match SplitConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e @ ConfigError::Usage) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };
    log::info!(
        "splitting {} into {} and {}",
        config.input.display(),
        config.outputs.audio.display(),
        config.outputs.video.display()
    );

    media_graph::init()?;
    let summary = session::run(&GstBackend, &converter::plan(&config)).await?;
    if !summary.is_success() {
        anyhow::bail!("{} did not play to the end: {:?}", config.input.display(), summary.outcome);
    }
    Ok(())
}
