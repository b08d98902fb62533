#![allow(dead_code)]

/// Initializes the media framework behind the `gstreamer` feature. Call once at
/// startup before creating any element. Without the feature this is a no-op.
pub fn init() -> anyhow::Result<()> {
    #[cfg(feature = "gstreamer")]
    gstreamer::init().map_err(|e| anyhow::anyhow!("gstreamer init: {}", e))?;
    Ok(())
}

pub mod builder;
pub mod bus;
pub mod caps;
pub mod element;
pub mod error;
#[cfg(feature = "gstreamer")]
pub mod gst;
pub mod graph;
pub mod plan;
pub mod resolver;
pub mod session;
pub mod sim;
pub mod state;
