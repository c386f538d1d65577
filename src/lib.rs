//! Negotiation description for a Selective Forwarding Unit (SFU).
//!
//! An SFU forwards RTP packets between the participants of a call without
//! decoding or re-encoding them. For that to work, a call has exactly one set of
//! codecs (payload types) and one header extension id map, shared by every video
//! track. Each track on the other hand has its own sources: SSRCs for simulcast
//! layers and their retransmission (RTX) pairs.
//!
//! This crate models that description and guards its invariants:
//!
//! * Payload type numbers are unique and mean the same codec for everyone.
//! * Header extension ids and uris map one-to-one.
//! * Track ids are unique.
//! * No SSRC appears twice anywhere in the description, main or feedback.
//! * Every track has at least one source.
//!
//! # Two phases
//!
//! A [`DescriptionBuilder`] collects participant contributions. Every `add_*`
//! call either merges the whole contribution or rejects it with a [`Violation`]
//! and leaves the builder untouched.
//!
//! [`DescriptionBuilder::build()`] validates the accumulated state and hands out
//! an immutable [`VideoDescription`]. That is what the forwarding engine and the
//! serializer get to see; it can be shared freely between threads.
//!
//! ```
//! # use sfu_desc::*;
//! let mut builder = DescriptionBuilder::new();
//!
//! builder.add_payload_types([PayloadType::new(100, "VP8", 90_000)])?;
//! builder.add_header_extensions([HeaderExtension::known(3, Extension::AudioLevel)])?;
//! builder.add_track("mic-cam", Some("video"), vec![MediaSource::new(1001)])?;
//! builder.add_track("screen", Some("slides"), vec![MediaSource::new(2001)])?;
//!
//! // The screen share reusing the camera SSRC is caught.
//! let err = builder
//!     .add_track("late", None, vec![MediaSource::new(1001)])
//!     .unwrap_err();
//! assert_eq!(err.kind(), "SsrcCollision");
//!
//! let desc = builder.build()?;
//! assert!(validate(&desc).is_empty());
//!
//! let json = json::to_json(&desc)?;
//! assert_eq!(json::from_json(&json)?, desc);
//! # Ok::<(), DescError>(())
//! ```
//!
//! # Validation
//!
//! [`validate()`] and [`DescriptionValidator::validate()`] report every violation
//! of a description, not just the first. The order is fixed: payload types, header
//! extensions, track ids, SSRCs, track contents.
//!
//! A description remembers the [`DescriptionConfig`] it was built or decoded
//! under. [`validate()`] and [`VideoDescription::to_builder()`] use that config.
//!
//! # Logging
//!
//! The crate logs with [`tracing`]. Rejected contributions are logged at `warn`.
//! Stream labels are redacted from logs at `debug` and above when the `pii`
//! feature is enabled.

#![forbid(unsafe_code)]
#![allow(clippy::new_without_default)]
#![allow(clippy::manual_range_contains)]
#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

use thiserror::Error;

mod id;
pub use id::{ExtId, Pt, Ssrc, TrackId};

pub mod format;
pub use format::{Codec, PayloadType, RtcpFeedback, MAX_PT};

mod ext;
pub use ext::{Extension, HeaderExtension, MAX_ID_ONE_BYTE_FORM, MAX_ID_TWO_BYTE_FORM};

mod track;
pub use track::{MediaSource, VideoTrack};

mod desc;
pub use desc::VideoDescription;

mod validate;
pub use validate::{validate, DescriptionValidator, Violation};

mod builder;
pub use builder::{DescriptionBuilder, ParticipantOffer, TrackOffer};

mod config;
pub use config::DescriptionConfig;

pub mod json;

mod util;

/// Errors at the crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DescError {
    /// The description breaks an invariant.
    #[error("{0}")]
    Invalid(#[from] Violation),

    /// Malformed JSON, or JSON not shaped like a description.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A track carries its own codec or header extension list. Those only exist
    /// on the description level.
    #[error("track {0} has a track local codec or header extension list")]
    TrackLocalOverride(TrackId),
}
