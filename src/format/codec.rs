use std::fmt;

/// Codecs recognized by encoding name.
///
/// Payload types are kept with the encoding name the participant offered. This
/// classification is only used to check RTX association.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum Codec {
    Opus,
    PCMU,
    PCMA,
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    /// Technically not a codec, but negotiated as a payload type to carry
    /// retransmissions of another one.
    Rtx,
    /// Redundant coding.
    Red,
    /// Forward error correction.
    Ulpfec,
    Unknown,
}

impl<'a> From<&'a str> for Codec {
    fn from(v: &'a str) -> Self {
        let lc = v.to_ascii_lowercase();
        match &lc[..] {
            "opus" => Codec::Opus,
            "pcmu" => Codec::PCMU,
            "pcma" => Codec::PCMA,
            "h264" => Codec::H264,
            "h265" => Codec::H265,
            "vp8" => Codec::Vp8,
            "vp9" => Codec::Vp9,
            "av1" => Codec::Av1,
            "rtx" => Codec::Rtx, // resends
            "red" => Codec::Red,
            "ulpfec" => Codec::Ulpfec,
            _ => Codec::Unknown,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Opus => write!(f, "opus"),
            Codec::PCMU => write!(f, "PCMU"),
            Codec::PCMA => write!(f, "PCMA"),
            Codec::H264 => write!(f, "H264"),
            Codec::H265 => write!(f, "H265"),
            Codec::Vp8 => write!(f, "VP8"),
            Codec::Vp9 => write!(f, "VP9"),
            Codec::Av1 => write!(f, "AV1"),
            Codec::Rtx => write!(f, "rtx"),
            Codec::Red => write!(f, "red"),
            Codec::Ulpfec => write!(f, "ulpfec"),
            Codec::Unknown => write!(f, "unknown"),
        }
    }
}
