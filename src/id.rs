use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

macro_rules! num_id {
    ($id:ident, $t:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $id($t);

        impl Deref for $id {
            type Target = $t;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$t> for $id {
            fn from(v: $t) -> Self {
                $id(v)
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

num_id!(Ssrc, u32, "Synchronization source identifier of one RTP stream.");
num_id!(Pt, u8, "RTP payload type number.");
num_id!(ExtId, u8, "Numeric id of an RTP header extension mapping.");

impl Ssrc {
    /// Random SSRC, never 0.
    pub fn new() -> Self {
        Ssrc(fastrand::u32(1..))
    }

    /// Tells if this is the zero value, which is never a valid source.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Stream label identifying one [`VideoTrack`][crate::VideoTrack].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for TrackId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> From<&'a str> for TrackId {
    fn from(v: &'a str) -> Self {
        TrackId(v.to_string())
    }
}

impl From<String> for TrackId {
    fn from(v: String) -> Self {
        TrackId(v)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackId({})", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn random_ssrc_is_never_zero() {
        for _ in 0..1000 {
            assert!(!Ssrc::new().is_zero());
        }
    }

    #[test]
    fn track_id_debug_and_display() {
        let id: TrackId = "mic-cam".into();
        assert_eq!(id.to_string(), "mic-cam");
        assert_eq!(format!("{:?}", id), "TrackId(mic-cam)");
        assert_eq!(&*id, "mic-cam");
    }

    #[test]
    fn ids_are_transparent_on_the_wire() {
        let s = serde_json::to_string(&Ssrc::from(1001_u32)).unwrap();
        assert_eq!(s, "1001");
        let t: TrackId = serde_json::from_str("\"screen\"").unwrap();
        assert_eq!(t.as_str(), "screen");
    }
}
