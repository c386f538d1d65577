use crate::builder::DescriptionBuilder;
use crate::config::DescriptionConfig;
use crate::ext::HeaderExtension;
use crate::format::PayloadType;
use crate::id::{ExtId, Pt, Ssrc};
use crate::track::VideoTrack;
use crate::validate::Parts;

/// The video description of one call.
///
/// Every track shares the one list of payload types and the one list of header
/// extensions, since the SFU forwards without transcoding. A `VideoDescription`
/// is only obtained from [`DescriptionBuilder::build()`] or by decoding, and is
/// immutable afterwards. Renegotiation goes via [`VideoDescription::to_builder()`]
/// and produces a new description.
///
/// The description remembers the [`DescriptionConfig`] it was built or decoded
/// under. [`validate()`][crate::validate()] and [`VideoDescription::to_builder()`]
/// use it. Two descriptions are equal when their contents are, regardless of config.
#[derive(Debug, Clone)]
pub struct VideoDescription {
    pub(crate) tracks: Vec<VideoTrack>,
    pub(crate) payload_types: Vec<PayloadType>,
    pub(crate) header_extensions: Vec<HeaderExtension>,
    config: DescriptionConfig,
}

impl VideoDescription {
    pub(crate) fn new(
        tracks: Vec<VideoTrack>,
        payload_types: Vec<PayloadType>,
        header_extensions: Vec<HeaderExtension>,
        config: DescriptionConfig,
    ) -> Self {
        VideoDescription {
            tracks,
            payload_types,
            header_extensions,
            config,
        }
    }

    /// The config this description was built or decoded under.
    pub fn config(&self) -> &DescriptionConfig {
        &self.config
    }

    /// Tracks in the order they were added.
    pub fn tracks(&self) -> &[VideoTrack] {
        &self.tracks
    }

    /// Payload types shared by all tracks.
    pub fn payload_types(&self) -> &[PayloadType] {
        &self.payload_types
    }

    /// Header extensions shared by all tracks.
    pub fn header_extensions(&self) -> &[HeaderExtension] {
        &self.header_extensions
    }

    /// Look up a track by stream label.
    pub fn track(&self, id: &str) -> Option<&VideoTrack> {
        self.tracks.iter().find(|t| &*t.id == id)
    }

    /// Look up a payload type by number.
    pub fn payload_type(&self, pt: Pt) -> Option<&PayloadType> {
        self.payload_types.iter().find(|p| p.pt == pt)
    }

    /// Look up a header extension by id.
    pub fn header_extension(&self, id: ExtId) -> Option<&HeaderExtension> {
        self.header_extensions.iter().find(|h| h.id == id)
    }

    /// Look up a header extension by uri.
    pub fn header_extension_by_uri(&self, uri: &str) -> Option<&HeaderExtension> {
        self.header_extensions.iter().find(|h| h.uri == uri)
    }

    /// The track an incoming SSRC belongs to, in either role.
    pub fn track_of_ssrc(&self, ssrc: Ssrc) -> Option<&VideoTrack> {
        self.tracks.iter().find(|t| t.has_ssrc(ssrc))
    }

    /// Every SSRC of the description, in track and source order.
    pub fn ssrcs(&self) -> impl Iterator<Item = Ssrc> + '_ {
        self.tracks.iter().flat_map(|t| t.ssrcs())
    }

    /// Start a renegotiation from this description, keeping its config.
    pub fn to_builder(&self) -> DescriptionBuilder {
        DescriptionBuilder::from_description(self, self.config.clone())
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        Parts {
            tracks: &self.tracks,
            payload_types: &self.payload_types,
            header_extensions: &self.header_extensions,
        }
    }
}

impl PartialEq for VideoDescription {
    fn eq(&self, other: &Self) -> bool {
        self.tracks == other.tracks
            && self.payload_types == other.payload_types
            && self.header_extensions == other.header_extensions
    }
}

impl Eq for VideoDescription {}
