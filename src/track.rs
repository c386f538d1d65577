use std::fmt;

use crate::id::{Ssrc, TrackId};

/// One SSRC pair within a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaSource {
    /// The primary SSRC carrying media.
    pub main: Ssrc,
    /// The associated RTX (retransmission) SSRC, if any.
    pub feedback: Option<Ssrc>,
}

impl MediaSource {
    /// Source without RTX.
    pub fn new(main: u32) -> Self {
        MediaSource {
            main: main.into(),
            feedback: None,
        }
    }

    /// Source with an RTX SSRC.
    pub fn with_feedback(main: u32, feedback: u32) -> Self {
        MediaSource {
            main: main.into(),
            feedback: Some(feedback.into()),
        }
    }

    /// The SSRCs of this source, main first.
    pub fn ssrcs(&self) -> impl Iterator<Item = Ssrc> {
        Some(self.main).into_iter().chain(self.feedback)
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.feedback {
            Some(fb) => write!(f, "{}/{}", self.main, fb),
            None => write!(f, "{}", self.main),
        }
    }
}

/// A named group of sources forming one logical media stream, i.e. a simulcast track.
///
/// There are deliberately no codec or header extension fields here. Those are
/// shared by every track in a [`VideoDescription`][crate::VideoDescription].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTrack {
    pub(crate) id: TrackId,
    pub(crate) content: Option<String>,
    pub(crate) sources: Vec<MediaSource>,
}

impl VideoTrack {
    pub(crate) fn new(id: TrackId, content: Option<String>, sources: Vec<MediaSource>) -> Self {
        VideoTrack {
            id,
            content,
            sources,
        }
    }

    /// The stream label.
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Content hint, i.e. `video` or `slides`.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Sources in simulcast layer order.
    pub fn sources(&self) -> &[MediaSource] {
        &self.sources
    }

    /// Every SSRC of the track, main and feedback, in source order.
    pub fn ssrcs(&self) -> impl Iterator<Item = Ssrc> + '_ {
        self.sources.iter().flat_map(|s| s.ssrcs())
    }

    /// Tells if the SSRC is used by this track in any role.
    pub fn has_ssrc(&self, ssrc: Ssrc) -> bool {
        self.ssrcs().any(|s| s == ssrc)
    }
}
