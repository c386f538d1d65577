//! Invariant checks over a video description.
//!
//! The checks are grouped and always run in the same order:
//!
//! 1. payload types
//! 2. header extensions
//! 3. track ids
//! 4. SSRCs
//! 5. track contents
//!
//! Within a group, violations are reported in list order. This makes the
//! first violation of a description deterministic.

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::config::DescriptionConfig;
use crate::desc::VideoDescription;
use crate::ext::HeaderExtension;
use crate::format::{Codec, PayloadType};
use crate::id::{ExtId, Pt, Ssrc, TrackId};
use crate::track::VideoTrack;
use crate::util::Pii;

/// One violated invariant, naming the offending identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Violation {
    /// Payload type number outside 0..=127.
    #[error("payload type {0} is outside 0..=127")]
    InvalidPayloadType(Pt),

    /// Payload type without an encoding name.
    #[error("payload type {0} has an empty encoding name")]
    EmptyEncodingName(Pt),

    /// Payload type with a clock rate of 0.
    #[error("payload type {0} has a zero clock rate")]
    InvalidClockRate(Pt),

    /// Two entries for the same payload type number that describe different
    /// codecs, or the number is listed twice.
    #[error("conflicting payload type {pt}: {existing} vs {offered}")]
    ConflictingPayloadType {
        /// The payload type number.
        pt: Pt,
        /// The entry already present.
        existing: String,
        /// The entry that clashes with it.
        offered: String,
    },

    /// An `rtx` payload type without an `apt` parameter pointing to a media
    /// payload type of the description.
    #[error("rtx payload type {pt} repairs unknown payload type {apt:?}")]
    DanglingRtx {
        /// The rtx payload type.
        pt: Pt,
        /// The value of its `apt` parameter, if it could be read.
        apt: Option<Pt>,
    },

    /// Header extension id outside the allowed range.
    #[error("header extension id {0} is out of range")]
    InvalidHeaderExtensionId(ExtId),

    /// Header extension mapped to an empty uri.
    #[error("header extension {0} has an empty uri")]
    EmptyHeaderExtensionUri(ExtId),

    /// The id/uri map is not one-to-one.
    #[error("conflicting header extension: {existing} vs {offered}")]
    ConflictingHeaderExtension {
        /// The mapping already present.
        existing: HeaderExtension,
        /// The mapping reusing its id or uri.
        offered: HeaderExtension,
    },

    /// A track with an empty stream label.
    #[error("empty track id")]
    EmptyTrackId,

    /// Two tracks with the same stream label.
    #[error("duplicate track id: {0}")]
    DuplicateTrackId(TrackId),

    /// A main or feedback SSRC of value 0.
    #[error("track {0} has a zero ssrc")]
    ZeroSsrc(TrackId),

    /// The same SSRC used twice, in any role.
    ///
    /// `first` and `second` are the same track when the clash is within one track.
    #[error("ssrc {ssrc} used by both {first} and {second}")]
    SsrcCollision {
        /// The colliding SSRC.
        ssrc: Ssrc,
        /// The track that used it first.
        first: TrackId,
        /// The track that used it again.
        second: TrackId,
    },

    /// A track without sources.
    #[error("track {0} has no sources")]
    EmptyTrack(TrackId),

    /// No tracks, when the config requires at least one.
    #[error("description has no tracks")]
    NoTracks,
}

impl Violation {
    /// Name of the violated invariant.
    pub fn kind(&self) -> &'static str {
        use Violation::*;
        match self {
            InvalidPayloadType(_) => "InvalidPayloadType",
            EmptyEncodingName(_) => "EmptyEncodingName",
            InvalidClockRate(_) => "InvalidClockRate",
            ConflictingPayloadType { .. } => "ConflictingPayloadType",
            DanglingRtx { .. } => "DanglingRtx",
            InvalidHeaderExtensionId(_) => "InvalidHeaderExtensionId",
            EmptyHeaderExtensionUri(_) => "EmptyHeaderExtensionUri",
            ConflictingHeaderExtension { .. } => "ConflictingHeaderExtension",
            EmptyTrackId => "EmptyTrackId",
            DuplicateTrackId(_) => "DuplicateTrackId",
            ZeroSsrc(_) => "ZeroSsrc",
            SsrcCollision { .. } => "SsrcCollision",
            EmptyTrack(_) => "EmptyTrack",
            NoTracks => "NoTracks",
        }
    }

    /// Display form for logs. Stream labels are wrapped in [`Pii`].
    pub(crate) fn log(&self) -> LogViolation<'_> {
        LogViolation(self)
    }
}

pub(crate) struct LogViolation<'a>(&'a Violation);

impl fmt::Display for LogViolation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Violation::*;
        match self.0 {
            DuplicateTrackId(id) => write!(f, "duplicate track id: {}", Pii(id)),
            ZeroSsrc(id) => write!(f, "track {} has a zero ssrc", Pii(id)),
            SsrcCollision {
                ssrc,
                first,
                second,
            } => write!(f, "ssrc {} used by both {} and {}", ssrc, Pii(first), Pii(second)),
            EmptyTrack(id) => write!(f, "track {} has no sources", Pii(id)),
            v => write!(f, "{}", v),
        }
    }
}

/// Borrowed view of the three lists making up a description.
#[derive(Clone, Copy)]
pub(crate) struct Parts<'a> {
    pub tracks: &'a [VideoTrack],
    pub payload_types: &'a [PayloadType],
    pub header_extensions: &'a [HeaderExtension],
}

/// Checks descriptions against the invariants of a single call.
///
/// Validation is pure and idempotent.
#[derive(Debug, Clone, Default)]
pub struct DescriptionValidator {
    config: DescriptionConfig,
}

impl DescriptionValidator {
    /// Creates a validator for the config.
    pub fn new(config: DescriptionConfig) -> Self {
        DescriptionValidator { config }
    }

    /// The config used by this validator.
    pub fn config(&self) -> &DescriptionConfig {
        &self.config
    }

    /// All violations of the description. Empty means valid.
    pub fn validate(&self, desc: &VideoDescription) -> Vec<Violation> {
        self.check(desc.parts(), false)
    }

    /// The first violation in check order, if any.
    pub fn first(&self, desc: &VideoDescription) -> Option<Violation> {
        self.check(desc.parts(), true).into_iter().next()
    }

    pub(crate) fn check(&self, parts: Parts<'_>, short: bool) -> Vec<Violation> {
        let mut out = vec![];

        let groups: [&dyn Fn(&mut Vec<Violation>); 5] = [
            &|out: &mut Vec<Violation>| self.check_payload_types(parts.payload_types, out),
            &|out: &mut Vec<Violation>| self.check_header_extensions(parts.header_extensions, out),
            &|out: &mut Vec<Violation>| check_track_ids(parts.tracks, out),
            &|out: &mut Vec<Violation>| check_ssrcs(parts.tracks, out),
            &|out: &mut Vec<Violation>| self.check_track_contents(parts.tracks, out),
        ];

        for group in groups {
            group(&mut out);

            if short && !out.is_empty() {
                out.truncate(1);
                break;
            }
        }

        out
    }

    fn check_payload_types(&self, pts: &[PayloadType], out: &mut Vec<Violation>) {
        let mut seen: HashMap<Pt, &PayloadType> = HashMap::new();

        for p in pts {
            if let Some(v) = check_payload_type(p) {
                out.push(v);
                continue;
            }

            if let Some(existing) = seen.get(&p.pt) {
                out.push(Violation::ConflictingPayloadType {
                    pt: p.pt,
                    existing: existing.to_string(),
                    offered: p.to_string(),
                });
                continue;
            }

            seen.insert(p.pt, p);
        }

        if !self.config.require_rtx_association {
            return;
        }

        for p in pts.iter().filter(|p| p.codec() == Codec::Rtx) {
            let apt = p.apt();

            let repairs_media = apt
                .and_then(|apt| seen.get(&apt))
                .map(|other| other.codec() != Codec::Rtx)
                .unwrap_or(false);

            if !repairs_media {
                out.push(Violation::DanglingRtx { pt: p.pt, apt });
            }
        }
    }

    fn check_header_extensions(&self, exts: &[HeaderExtension], out: &mut Vec<Violation>) {
        let mut by_id: HashMap<ExtId, &HeaderExtension> = HashMap::new();
        let mut by_uri: HashMap<&str, &HeaderExtension> = HashMap::new();

        for h in exts {
            if let Some(v) = check_header_extension(h, self.config.two_byte_extensions) {
                out.push(v);
                continue;
            }

            let existing = by_id
                .get(&h.id)
                .or_else(|| by_uri.get(h.uri.as_str()))
                .copied();

            if let Some(existing) = existing {
                out.push(Violation::ConflictingHeaderExtension {
                    existing: existing.clone(),
                    offered: h.clone(),
                });
                continue;
            }

            by_id.insert(h.id, h);
            by_uri.insert(&h.uri, h);
        }
    }

    fn check_track_contents(&self, tracks: &[VideoTrack], out: &mut Vec<Violation>) {
        for t in tracks {
            if t.sources.is_empty() {
                out.push(Violation::EmptyTrack(t.id.clone()));
            }
        }

        if self.config.require_tracks && tracks.is_empty() {
            out.push(Violation::NoTracks);
        }
    }
}

/// Checks of a payload type on its own, without looking at the others.
pub(crate) fn check_payload_type(p: &PayloadType) -> Option<Violation> {
    if !p.is_valid_pt() {
        Some(Violation::InvalidPayloadType(p.pt))
    } else if p.encoding_name.trim().is_empty() {
        Some(Violation::EmptyEncodingName(p.pt))
    } else if p.clock_rate == 0 {
        Some(Violation::InvalidClockRate(p.pt))
    } else {
        None
    }
}

/// Checks of a header extension on its own, without looking at the others.
pub(crate) fn check_header_extension(h: &HeaderExtension, two_byte: bool) -> Option<Violation> {
    if !h.is_valid_id(two_byte) {
        Some(Violation::InvalidHeaderExtensionId(h.id))
    } else if h.uri.trim().is_empty() {
        Some(Violation::EmptyHeaderExtensionUri(h.id))
    } else {
        None
    }
}

fn check_track_ids(tracks: &[VideoTrack], out: &mut Vec<Violation>) {
    let mut seen: HashSet<&TrackId> = HashSet::new();

    for t in tracks {
        if t.id.is_empty() {
            out.push(Violation::EmptyTrackId);
            continue;
        }

        if !seen.insert(&t.id) {
            out.push(Violation::DuplicateTrackId(t.id.clone()));
        }
    }
}

// One SSRC namespace for the whole description, regardless of role.
fn check_ssrcs(tracks: &[VideoTrack], out: &mut Vec<Violation>) {
    let mut owner: HashMap<Ssrc, &TrackId> = HashMap::new();

    for t in tracks {
        let mut zero_reported = false;

        for ssrc in t.ssrcs() {
            if ssrc.is_zero() {
                if !zero_reported {
                    out.push(Violation::ZeroSsrc(t.id.clone()));
                    zero_reported = true;
                }
                continue;
            }

            if let Some(first) = owner.get(&ssrc) {
                out.push(Violation::SsrcCollision {
                    ssrc,
                    first: (*first).clone(),
                    second: t.id.clone(),
                });
                continue;
            }

            owner.insert(ssrc, &t.id);
        }
    }
}

/// Validates with the config the description was built or decoded under.
/// Returns all violations, empty means valid.
///
/// Use [`DescriptionValidator::validate()`] to check against another config.
pub fn validate(desc: &VideoDescription) -> Vec<Violation> {
    desc.config().validator().validate(desc)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::track::MediaSource;

    fn track(id: &str, sources: Vec<MediaSource>) -> VideoTrack {
        VideoTrack::new(id.into(), None, sources)
    }

    fn check(
        tracks: &[VideoTrack],
        payload_types: &[PayloadType],
        header_extensions: &[HeaderExtension],
    ) -> Vec<Violation> {
        let parts = Parts {
            tracks,
            payload_types,
            header_extensions,
        };
        DescriptionValidator::default().check(parts, false)
    }

    #[test]
    fn valid_parts() {
        let v = check(
            &[
                track("a", vec![MediaSource::with_feedback(1, 2)]),
                track("b", vec![MediaSource::new(3), MediaSource::new(4)]),
            ],
            &[
                PayloadType::new(100, "VP8", 90_000),
                PayloadType::new(96, "rtx", 90_000).with_parameter("apt", "100"),
            ],
            &[HeaderExtension::new(3, "urn:x")],
        );
        assert!(v.is_empty(), "{:?}", v);
    }

    #[test]
    fn duplicate_payload_type_reported_even_when_identical() {
        let v = check(
            &[],
            &[
                PayloadType::new(100, "VP8", 90_000),
                PayloadType::new(100, "VP8", 90_000),
            ],
            &[],
        );
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind(), "ConflictingPayloadType");
    }

    #[test]
    fn payload_type_out_of_range() {
        let v = check(&[], &[PayloadType::new(128, "VP8", 90_000)], &[]);
        assert_eq!(v, vec![Violation::InvalidPayloadType(Pt::from(128_u8))]);
    }

    #[test]
    fn dangling_rtx() {
        let v = check(
            &[],
            &[
                PayloadType::new(96, "rtx", 90_000).with_parameter("apt", "100"),
                PayloadType::new(97, "rtx", 90_000),
                PayloadType::new(98, "rtx", 90_000).with_parameter("apt", "96"),
            ],
            &[],
        );
        assert_eq!(
            v,
            vec![
                Violation::DanglingRtx {
                    pt: Pt::from(96_u8),
                    apt: Some(Pt::from(100_u8)),
                },
                Violation::DanglingRtx {
                    pt: Pt::from(97_u8),
                    apt: None,
                },
                // rtx repairing rtx is not media.
                Violation::DanglingRtx {
                    pt: Pt::from(98_u8),
                    apt: Some(Pt::from(96_u8)),
                },
            ]
        );
    }

    #[test]
    fn rtx_association_can_be_turned_off() {
        let parts = Parts {
            tracks: &[],
            payload_types: &[PayloadType::new(96, "rtx", 90_000)],
            header_extensions: &[],
        };
        let config = DescriptionConfig::new().set_require_rtx_association(false);
        assert!(config.validator().check(parts, false).is_empty());
    }

    #[test]
    fn header_extensions_must_be_bijective() {
        let v = check(
            &[],
            &[],
            &[
                HeaderExtension::new(3, "urn:a"),
                HeaderExtension::new(3, "urn:b"),
                HeaderExtension::new(4, "urn:a"),
                HeaderExtension::new(5, "urn:c"),
            ],
        );
        assert_eq!(v.len(), 2);
        assert!(v
            .iter()
            .all(|v| v.kind() == "ConflictingHeaderExtension"));
        match &v[1] {
            Violation::ConflictingHeaderExtension { existing, offered } => {
                assert_eq!(existing, &HeaderExtension::new(3, "urn:a"));
                assert_eq!(offered, &HeaderExtension::new(4, "urn:a"));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn header_extension_id_range() {
        let v = check(
            &[],
            &[],
            &[HeaderExtension::new(0, "urn:a"), HeaderExtension::new(15, "urn:b")],
        );
        assert_eq!(
            v,
            vec![
                Violation::InvalidHeaderExtensionId(ExtId::from(0_u8)),
                Violation::InvalidHeaderExtensionId(ExtId::from(15_u8)),
            ]
        );

        let parts = Parts {
            tracks: &[],
            payload_types: &[],
            header_extensions: &[HeaderExtension::new(15, "urn:b")],
        };
        let config = DescriptionConfig::new().set_two_byte_extensions(true);
        assert!(config.validator().check(parts, false).is_empty());
    }

    #[test]
    fn ssrc_collisions_regardless_of_role() {
        let v = check(
            &[
                track("a", vec![MediaSource::with_feedback(1, 2)]),
                // main collides with a's feedback
                track("b", vec![MediaSource::new(2)]),
                // feedback collides with a's main
                track("c", vec![MediaSource::with_feedback(3, 1)]),
                // within one source
                track("d", vec![MediaSource::with_feedback(4, 4)]),
            ],
            &[],
            &[],
        );
        let expected = |ssrc: u32, first: &str, second: &str| Violation::SsrcCollision {
            ssrc: ssrc.into(),
            first: first.into(),
            second: second.into(),
        };
        assert_eq!(
            v,
            vec![expected(2, "a", "b"), expected(1, "a", "c"), expected(4, "d", "d")]
        );
    }

    #[test]
    fn zero_ssrc_reported_once_per_track() {
        let v = check(
            &[track(
                "a",
                vec![MediaSource::with_feedback(0, 0), MediaSource::new(0)],
            )],
            &[],
            &[],
        );
        assert_eq!(v, vec![Violation::ZeroSsrc("a".into())]);
    }

    #[test]
    fn all_violations_in_group_order() {
        let v = check(
            &[
                track("a", vec![]),
                track("a", vec![MediaSource::new(7)]),
                track("b", vec![MediaSource::new(7)]),
            ],
            &[
                PayloadType::new(100, "VP8", 90_000),
                PayloadType::new(100, "H264", 90_000),
            ],
            &[HeaderExtension::new(1, "urn:a"), HeaderExtension::new(1, "urn:b")],
        );
        let kinds: Vec<_> = v.iter().map(|v| v.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "ConflictingPayloadType",
                "ConflictingHeaderExtension",
                "DuplicateTrackId",
                "SsrcCollision",
                "EmptyTrack",
            ]
        );
    }

    #[test]
    fn short_circuit_returns_first() {
        let parts = Parts {
            tracks: &[track("a", vec![]), track("a", vec![])],
            payload_types: &[],
            header_extensions: &[],
        };
        let v = DescriptionValidator::default().check(parts, true);
        assert_eq!(v, vec![Violation::DuplicateTrackId("a".into())]);
    }

    #[test]
    fn no_tracks_only_when_required() {
        assert!(check(&[], &[], &[]).is_empty());

        let parts = Parts {
            tracks: &[],
            payload_types: &[],
            header_extensions: &[],
        };
        let config = DescriptionConfig::new().set_require_tracks(true);
        assert_eq!(
            config.validator().check(parts, false),
            vec![Violation::NoTracks]
        );
    }

    #[test]
    fn malformed_values() {
        let v = check(
            &[
                track("", vec![MediaSource::new(1)]),
                track("", vec![MediaSource::new(2)]),
            ],
            &[
                PayloadType::new(100, "", 90_000),
                PayloadType::new(101, "VP8", 0),
            ],
            &[HeaderExtension::new(3, "")],
        );
        assert_eq!(
            v,
            vec![
                Violation::EmptyEncodingName(Pt::from(100_u8)),
                Violation::InvalidClockRate(Pt::from(101_u8)),
                Violation::EmptyHeaderExtensionUri(ExtId::from(3_u8)),
                Violation::EmptyTrackId,
                Violation::EmptyTrackId,
            ]
        );
    }

    #[test]
    fn range_is_checked_before_emptiness() {
        assert_eq!(
            check_payload_type(&PayloadType::new(128, "", 0)),
            Some(Violation::InvalidPayloadType(Pt::from(128_u8)))
        );
        assert_eq!(
            check_header_extension(&HeaderExtension::new(0, ""), false),
            Some(Violation::InvalidHeaderExtensionId(ExtId::from(0_u8)))
        );
        assert_eq!(
            check_payload_type(&PayloadType::new(100, " ", 90_000)),
            Some(Violation::EmptyEncodingName(Pt::from(100_u8)))
        );
    }

    #[test]
    fn log_form_wraps_track_ids() {
        let v = Violation::SsrcCollision {
            ssrc: 7_u32.into(),
            first: "alice-cam".into(),
            second: "bob-cam".into(),
        };

        #[cfg(feature = "pii")]
        assert_eq!(
            v.log().to_string(),
            "ssrc 7 used by both {REDACTED} and {REDACTED}"
        );

        #[cfg(not(feature = "pii"))]
        assert_eq!(v.log().to_string(), v.to_string());

        // nothing to redact
        let v = Violation::InvalidClockRate(Pt::from(100_u8));
        assert_eq!(v.log().to_string(), v.to_string());
    }

    #[cfg(feature = "pii")]
    #[test]
    fn log_form_redacts_every_track_id() {
        let id = TrackId::from("alice-cam");
        let all = [
            Violation::DuplicateTrackId(id.clone()),
            Violation::ZeroSsrc(id.clone()),
            Violation::EmptyTrack(id.clone()),
            Violation::SsrcCollision {
                ssrc: 7_u32.into(),
                first: id.clone(),
                second: id,
            },
        ];
        for v in all {
            assert!(!v.log().to_string().contains("alice"), "{}", v.kind());
        }
    }
}
