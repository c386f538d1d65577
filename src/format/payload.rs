use std::collections::BTreeMap;
use std::fmt;

use crate::id::Pt;

use super::codec::Codec;

/// Highest RTP payload type number. The field is 7 bits in the RTP header.
pub const MAX_PT: u8 = 127;

/// One negotiated codec entry.
///
/// In SDP terms this is everything hanging off one payload type:
///
/// ```text
/// a=rtpmap:100 VP8/90000
/// a=rtcp-fb:100 nack
/// a=rtcp-fb:100 nack pli
/// a=rtpmap:96 rtx/90000
/// a=fmtp:96 apt=100
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadType {
    /// The payload type number.
    pub pt: Pt,

    /// Encoding name, i.e. `VP8` or `rtx`. Compared case-insensitively.
    pub encoding_name: String,

    /// Clock rate of the codec.
    pub clock_rate: u32,

    /// Number of channels (if any). Usually absent for video.
    pub channels: Option<u8>,

    /// Codec specific format parameters (the `a=fmtp` line).
    pub parameters: BTreeMap<String, String>,

    /// RTCP feedback mechanisms negotiated for this payload type.
    pub rtcp_fbs: Vec<RtcpFeedback>,
}

/// An RTCP feedback mechanism such as `nack pli` or `goog-remb`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RtcpFeedback {
    /// Feedback type, i.e. `nack`, `ccm`, `goog-remb`.
    pub typ: String,
    /// Optional subtype, i.e. `pli` for `nack pli`.
    pub subtype: Option<String>,
}

impl PayloadType {
    /// Creates a payload type without parameters or feedback.
    pub fn new(pt: u8, encoding_name: impl Into<String>, clock_rate: u32) -> Self {
        PayloadType {
            pt: pt.into(),
            encoding_name: encoding_name.into(),
            clock_rate,
            channels: None,
            parameters: BTreeMap::new(),
            rtcp_fbs: vec![],
        }
    }

    /// Set the number of channels.
    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Add a format parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Add an RTCP feedback mechanism.
    pub fn with_rtcp_fb(mut self, typ: impl Into<String>, subtype: Option<&str>) -> Self {
        self.rtcp_fbs.push(RtcpFeedback {
            typ: typ.into(),
            subtype: subtype.map(|s| s.to_string()),
        });
        self
    }

    /// The codec classification of the encoding name.
    pub fn codec(&self) -> Codec {
        self.encoding_name.as_str().into()
    }

    /// For an RTX payload type, the payload type it repairs (the `apt` parameter).
    ///
    /// `None` if the parameter is missing or not a number.
    pub fn apt(&self) -> Option<Pt> {
        let v = self.parameters.get("apt")?;
        v.trim().parse::<u8>().ok().map(Pt::from)
    }

    /// Tells if the payload type number fits the RTP header.
    pub fn is_valid_pt(&self) -> bool {
        *self.pt <= MAX_PT
    }

    /// Tells if both entries describe the same codec, regardless of the payload
    /// type number, format parameters and feedback.
    pub(crate) fn same_codec(&self, other: &PayloadType) -> bool {
        self.encoding_name.eq_ignore_ascii_case(&other.encoding_name)
            && self.clock_rate == other.clock_rate
            && self.channels == other.channels
    }

    /// Two entries for the same payload type number that cannot be reconciled
    /// without transcoding.
    pub(crate) fn conflicts_with(&self, other: &PayloadType) -> bool {
        self.pt == other.pt && !self.same_codec(other)
    }

    /// Same codec, but the details that don't make a conflict differ.
    pub(crate) fn diverges_from(&self, other: &PayloadType) -> bool {
        self.pt == other.pt
            && self.same_codec(other)
            && (self.parameters != other.parameters || self.rtcp_fbs != other.rtcp_fbs)
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.pt, self.encoding_name, self.clock_rate)?;
        if let Some(c) = self.channels {
            write!(f, "/{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Display for RtcpFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(s) => write!(f, "{} {}", self.typ, s),
            None => write!(f, "{}", self.typ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_codec_ignores_name_case() {
        let a = PayloadType::new(100, "VP8", 90_000);
        let b = PayloadType::new(100, "vp8", 90_000);
        assert!(a.same_codec(&b));
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn conflict_on_name_clock_or_channels() {
        let a = PayloadType::new(100, "VP8", 90_000);
        assert!(a.conflicts_with(&PayloadType::new(100, "H264", 90_000)));
        assert!(a.conflicts_with(&PayloadType::new(100, "VP8", 48_000)));
        assert!(a.conflicts_with(&PayloadType::new(100, "VP8", 90_000).with_channels(2)));

        // Different number is not a conflict, it's a different entry.
        assert!(!a.conflicts_with(&PayloadType::new(101, "H264", 90_000)));
    }

    #[test]
    fn divergent_parameters() {
        let a = PayloadType::new(100, "VP8", 90_000).with_rtcp_fb("nack", None);
        let b = PayloadType::new(100, "VP8", 90_000).with_rtcp_fb("nack", Some("pli"));
        assert!(a.diverges_from(&b));
        assert!(!a.diverges_from(&a.clone()));
    }

    #[test]
    fn apt_parameter() {
        let rtx = PayloadType::new(96, "rtx", 90_000).with_parameter("apt", "100");
        assert_eq!(rtx.apt(), Some(Pt::from(100_u8)));
        assert_eq!(rtx.codec(), Codec::Rtx);

        let broken = PayloadType::new(96, "rtx", 90_000).with_parameter("apt", "vp8");
        assert_eq!(broken.apt(), None);
    }

    #[test]
    fn display() {
        let pt = PayloadType::new(111, "opus", 48_000).with_channels(2);
        assert_eq!(pt.to_string(), "111 opus/48000/2");
        let fb = RtcpFeedback {
            typ: "nack".into(),
            subtype: Some("pli".into()),
        };
        assert_eq!(fb.to_string(), "nack pli");
    }
}
