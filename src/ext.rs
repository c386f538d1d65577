//! RTP header extension mappings.

use std::fmt;

use crate::id::ExtId;

/// Highest id usable with the one-byte header form.
///
/// See RFC 8285 Section 4.2. Id 15 is reserved.
pub const MAX_ID_ONE_BYTE_FORM: u8 = 14;

/// Highest id usable with the two-byte header form.
///
/// See RFC 8285 Section 4.3.
pub const MAX_ID_TWO_BYTE_FORM: u8 = 255;

/// One RTP header extension mapping, i.e. `a=extmap:3 urn:ietf:params:rtp-hdrext:ssrc-audio-level`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderExtension {
    /// Numeric id carried in the RTP packet.
    pub id: ExtId,
    /// The URI the id maps to.
    pub uri: String,
}

impl HeaderExtension {
    /// Creates a new mapping.
    pub fn new(id: u8, uri: impl Into<String>) -> Self {
        HeaderExtension {
            id: id.into(),
            uri: uri.into(),
        }
    }

    /// Creates a mapping for one of the well known extensions.
    pub fn known(id: u8, ext: Extension) -> Self {
        HeaderExtension::new(id, ext.as_uri())
    }

    /// The well known extension this mapping is for, if any.
    pub fn extension(&self) -> Option<Extension> {
        Extension::from_uri(&self.uri)
    }

    /// Tells if the id is in the allowed range. `0` is never allowed.
    pub fn is_valid_id(&self, two_byte_form: bool) -> bool {
        let max = if two_byte_form {
            MAX_ID_TWO_BYTE_FORM
        } else {
            MAX_ID_ONE_BYTE_FORM
        };
        *self.id >= 1 && *self.id <= max
    }
}

impl fmt::Display for HeaderExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.uri)
    }
}

/// Well known RTP header extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Extension {
    /// <http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time>
    AbsoluteSendTime,
    /// <urn:ietf:params:rtp-hdrext:ssrc-audio-level>
    AudioLevel,
    /// <urn:ietf:params:rtp-hdrext:toffset>
    TransmissionTimeOffset,
    /// <urn:3gpp:video-orientation>
    VideoOrientation,
    /// <http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01>
    TransportSequenceNumber,
    /// <http://www.webrtc.org/experiments/rtp-hdrext/playout-delay>
    PlayoutDelay,
    /// <http://www.webrtc.org/experiments/rtp-hdrext/video-content-type>
    VideoContentType,
    /// <http://www.webrtc.org/experiments/rtp-hdrext/video-timing>
    VideoTiming,
    /// <urn:ietf:params:rtp-hdrext:sdes:rtp-stream-id>
    RtpStreamId,
    /// <urn:ietf:params:rtp-hdrext:sdes:repaired-rtp-stream-id>
    RepairedRtpStreamId,
    /// <urn:ietf:params:rtp-hdrext:sdes:mid>
    RtpMid,
    /// <http://tools.ietf.org/html/draft-ietf-avtext-framemarking-07>
    FrameMarking,
    /// <http://www.webrtc.org/experiments/rtp-hdrext/color-space>
    ColorSpace,
}

/// Mapping of extension URI to our enum
const EXT_URI: &[(Extension, &str)] = &[
    (
        Extension::AbsoluteSendTime,
        "http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time",
    ),
    (
        Extension::AudioLevel,
        "urn:ietf:params:rtp-hdrext:ssrc-audio-level",
    ),
    (
        Extension::TransmissionTimeOffset,
        "urn:ietf:params:rtp-hdrext:toffset",
    ),
    (
        Extension::VideoOrientation, //
        "urn:3gpp:video-orientation",
    ),
    (
        Extension::TransportSequenceNumber,
        "http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01",
    ),
    (
        Extension::PlayoutDelay,
        "http://www.webrtc.org/experiments/rtp-hdrext/playout-delay",
    ),
    (
        Extension::VideoContentType,
        "http://www.webrtc.org/experiments/rtp-hdrext/video-content-type",
    ),
    (
        Extension::VideoTiming,
        "http://www.webrtc.org/experiments/rtp-hdrext/video-timing",
    ),
    (
        Extension::RtpStreamId,
        "urn:ietf:params:rtp-hdrext:sdes:rtp-stream-id",
    ),
    (
        Extension::RepairedRtpStreamId,
        "urn:ietf:params:rtp-hdrext:sdes:repaired-rtp-stream-id",
    ),
    (
        Extension::RtpMid, //
        "urn:ietf:params:rtp-hdrext:sdes:mid",
    ),
    (
        Extension::FrameMarking,
        "http://tools.ietf.org/html/draft-ietf-avtext-framemarking-07",
    ),
    (
        Extension::ColorSpace,
        "http://www.webrtc.org/experiments/rtp-hdrext/color-space",
    ),
];

impl Extension {
    /// Looks up a well known extension by URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        EXT_URI
            .iter()
            .find(|(_, spec)| *spec == uri)
            .map(|(t, _)| *t)
    }

    /// Represents the extension as an URI.
    pub fn as_uri(&self) -> &'static str {
        EXT_URI
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, spec)| *spec)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_uri())
    }
}
