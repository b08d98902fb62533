use std::path::{Path, PathBuf};

use thiserror::Error;

pub const AUDIO_SINK_ENV: &str = "MKV_SPLIT_AUDIO_SINK";
pub const VIDEO_SINK_ENV: &str = "MKV_SPLIT_VIDEO_SINK";

const DEFAULT_AUDIO_SINK: &str = "autoaudiosink";
const DEFAULT_VIDEO_SINK: &str = "autovideosink";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Usage: mkv-split <input filename>")]
    Usage,
    #[error("{0} does not name a file")]
    NotAFile(PathBuf),
}

/// Where the remuxed elementary streams are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub audio: PathBuf,
    pub video: PathBuf,
}

impl OutputPaths {
    /// `dir/clip.webm` gives `dir/clip.mka` and `dir/clip.mkv`. Everything from
    /// the first `.` of the file name on is dropped. A name without a `.`, or one
    /// starting with it, is kept whole.
    pub fn derive(input: &Path) -> Result<Self, ConfigError> {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConfigError::NotAFile(input.to_path_buf()))?;
        let base = match file_name.find('.') {
            Some(0) | None => file_name.as_str(),
            Some(dot) => &file_name[..dot],
        };

        Ok(Self {
            audio: input.with_file_name(format!("{}.mka", base)),
            video: input.with_file_name(format!("{}.mkv", base)),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitConfig {
    pub input: PathBuf,
    pub outputs: OutputPaths,
    /// Element kind used for local audio playback.
    pub audio_sink: String,
    pub video_sink: String,
}

impl SplitConfig {
    /// Reads the positional arguments (without the program name) and the sink
    /// overrides from the process environment.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        Self::with_env(args, |key| std::env::var(key).ok())
    }

    pub fn with_env<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let (Some(input), None) = (args.next(), args.next()) else {
            return Err(ConfigError::Usage);
        };

        let input = PathBuf::from(input);
        let outputs = OutputPaths::derive(&input)?;
        let sink = |key: &str, default: &str| {
            env(key)
                .filter(|kind| !kind.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            audio_sink: sink(AUDIO_SINK_ENV, DEFAULT_AUDIO_SINK),
            video_sink: sink(VIDEO_SINK_ENV, DEFAULT_VIDEO_SINK),
            input,
            outputs,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
