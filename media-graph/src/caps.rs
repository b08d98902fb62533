use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

/// Negotiated format of a pad: a media type such as `audio/x-vorbis` plus
/// format fields (`rate`, `channels`, `width`, ...). Only exists once data
/// starts flowing through the pad.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caps {
    media_type: String,
    fields: BTreeMap<String, String>,
}

impl Caps {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn category(&self) -> MediaCategory {
        MediaCategory::from_media_type(&self.media_type)
    }
}

impl Display for Caps {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.media_type)?;
        for (key, value) in &self.fields {
            write!(f, ", {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Coarse category of an elementary stream, derived from its media type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Audio,
    Video,
    /// Anything else, keeping the raw media type (may be empty).
    Other(String),
}

impl MediaCategory {
    /// Substring match on the media type: `audio/x-vorbis` and
    /// `application/x-audio-stream` are both audio.
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.contains("audio") {
            MediaCategory::Audio
        } else if media_type.contains("video") {
            MediaCategory::Video
        } else {
            MediaCategory::Other(media_type.to_string())
        }
    }
}

impl Display for MediaCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaCategory::Audio => f.write_str("audio"),
            MediaCategory::Video => f.write_str("video"),
            MediaCategory::Other(media_type) if media_type.is_empty() => f.write_str("unknown"),
            MediaCategory::Other(media_type) => f.write_str(media_type),
        }
    }
}
