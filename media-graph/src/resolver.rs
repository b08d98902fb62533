//! Routes pads that a demuxer exposes at runtime into one of two branches.

use std::fmt::{Display, Formatter};

use crate::{
    caps::MediaCategory,
    element::{Element, Pad},
    error::LinkError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Audio,
    Video,
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Audio => write!(f, "audio"),
            Branch::Video => write!(f, "video"),
        }
    }
}

/// Audio goes to the audio branch. Video, and anything unrecognised, to the video
/// branch.
pub fn route(category: &MediaCategory) -> Branch {
    match category {
        MediaCategory::Audio => Branch::Audio,
        MediaCategory::Video => Branch::Video,
        MediaCategory::Other(_) => Branch::Video,
    }
}

/// What happened to one new pad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Both branches already have an input, or the new pad is linked itself.
    AlreadyLinked,
    /// The chosen branch already has an input; the pad stays unlinked.
    Duplicate { branch: Branch, media_type: String },
    Linked { branch: Branch, media_type: String },
    LinkFailed {
        branch: Branch,
        media_type: String,
        reason: LinkError,
    },
}

/// Pad-added handler state: the sink pads heading the audio and video branches.
/// Invoked from the framework's streaming thread, so it only reads pad state and
/// calls into the framework.
#[derive(Clone)]
pub struct BranchRouter<P: Pad> {
    audio: P,
    video: P,
}

impl<P: Pad> BranchRouter<P> {
    pub fn new(audio: P, video: P) -> Self {
        Self { audio, video }
    }

    pub fn branch_pad(&self, branch: Branch) -> &P {
        match branch {
            Branch::Audio => &self.audio,
            Branch::Video => &self.video,
        }
    }

    pub fn resolve<E>(&self, demuxer: &E, new_pad: &P) -> Resolution
    where
        E: Element<Pad = P>,
    {
        log::info!(
            "Received new pad '{}' from '{}'",
            new_pad.name(),
            demuxer.name()
        );

        if new_pad.is_linked() || (self.audio.is_linked() && self.video.is_linked()) {
            log::info!("We are already linked. Ignoring.");
            return Resolution::AlreadyLinked;
        }

        let (category, media_type) = match new_pad.current_caps() {
            Some(caps) => (caps.category(), caps.media_type().to_string()),
            None => (MediaCategory::Other(String::new()), String::new()),
        };
        let branch = route(&category);
        let sink = self.branch_pad(branch);

        if sink.is_linked() {
            log::info!(
                "{} branch already has an input, ignoring '{}' of type '{}'.",
                branch,
                new_pad.name(),
                media_type
            );
            return Resolution::Duplicate { branch, media_type };
        }

        match new_pad.link(sink) {
            Ok(()) => {
                log::info!("Link succeeded (type '{}').", media_type);
                Resolution::Linked { branch, media_type }
            }
            Err(reason) => {
                log::warn!("Type is '{}' but link failed: {}.", media_type, reason);
                Resolution::LinkFailed {
                    branch,
                    media_type,
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;
