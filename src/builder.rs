use std::collections::{HashMap, HashSet};

use crate::config::DescriptionConfig;
use crate::desc::VideoDescription;
use crate::ext::HeaderExtension;
use crate::format::PayloadType;
use crate::id::{Ssrc, TrackId};
use crate::track::{MediaSource, VideoTrack};
use crate::util::Pii;
use crate::validate::{check_header_extension, check_payload_type};
use crate::validate::{DescriptionValidator, Parts, Violation};

/// One participant's contribution to the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantOffer {
    /// Codecs the participant can send and receive.
    pub payload_types: Vec<PayloadType>,
    /// Header extension mappings the participant uses.
    pub header_extensions: Vec<HeaderExtension>,
    /// Tracks the participant sends.
    pub tracks: Vec<TrackOffer>,
}

/// A track as offered by a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOffer {
    /// Stream label.
    pub id: TrackId,
    /// Content hint.
    pub content: Option<String>,
    /// Sources in simulcast layer order.
    pub sources: Vec<MediaSource>,
}

impl TrackOffer {
    /// Creates a track offer.
    pub fn new(id: impl Into<TrackId>, content: Option<&str>, sources: Vec<MediaSource>) -> Self {
        TrackOffer {
            id: id.into(),
            content: content.map(|c| c.to_string()),
            sources,
        }
    }
}

/// Assembles a [`VideoDescription`] from participant contributions.
///
/// Each `add_*` call is all-or-nothing: either the whole contribution is merged,
/// or the builder is left untouched and the first violation is returned. That
/// lets the caller reject one participant's offer without aborting the call.
///
/// ```
/// # use sfu_desc::{DescriptionBuilder, HeaderExtension, MediaSource, PayloadType};
/// let mut builder = DescriptionBuilder::new();
///
/// builder.add_payload_types([PayloadType::new(100, "VP8", 90_000)])?;
/// builder.add_header_extensions([HeaderExtension::new(
///     3,
///     "urn:ietf:params:rtp-hdrext:ssrc-audio-level",
/// )])?;
/// builder.add_track("mic-cam", None, vec![MediaSource::new(1001)])?;
///
/// let desc = builder.build()?;
/// assert_eq!(desc.tracks().len(), 1);
/// # Ok::<(), sfu_desc::Violation>(())
/// ```
///
/// A builder serves one negotiation. It is not synchronized; callers with
/// contributions arriving in parallel must serialize access.
#[derive(Debug, Clone)]
pub struct DescriptionBuilder {
    validator: DescriptionValidator,
    tracks: Vec<VideoTrack>,
    payload_types: Vec<PayloadType>,
    header_extensions: Vec<HeaderExtension>,
    // Every SSRC in use, any role, to the track using it.
    ssrcs: HashMap<Ssrc, TrackId>,
}

impl DescriptionBuilder {
    /// Creates an empty builder with the default config.
    pub fn new() -> Self {
        Self::with_config(DescriptionConfig::default())
    }

    /// Creates an empty builder with a config.
    pub fn with_config(config: DescriptionConfig) -> Self {
        DescriptionBuilder {
            validator: DescriptionValidator::new(config),
            tracks: vec![],
            payload_types: vec![],
            header_extensions: vec![],
            ssrcs: HashMap::new(),
        }
    }

    /// Creates a builder holding everything in an existing description.
    ///
    /// Used for renegotiation, the description itself is not changed.
    pub fn from_description(desc: &VideoDescription, config: DescriptionConfig) -> Self {
        let mut b = Self::with_config(config);

        b.payload_types = desc.payload_types.clone();
        b.header_extensions = desc.header_extensions.clone();
        b.tracks = desc.tracks.clone();

        for t in &b.tracks {
            for ssrc in t.ssrcs() {
                b.ssrcs.insert(ssrc, t.id.clone());
            }
        }

        b
    }

    /// The config of this builder.
    pub fn config(&self) -> &DescriptionConfig {
        self.validator.config()
    }

    /// Tracks added so far.
    pub fn tracks(&self) -> &[VideoTrack] {
        &self.tracks
    }

    /// Payload types merged so far.
    pub fn payload_types(&self) -> &[PayloadType] {
        &self.payload_types
    }

    /// Header extensions merged so far.
    pub fn header_extensions(&self) -> &[HeaderExtension] {
        &self.header_extensions
    }

    /// Merge payload types into the shared set.
    ///
    /// An entry equal to one already present (same number, encoding name, clock
    /// rate and channels) is ignored, regardless of the order it is offered in.
    /// The same number for a different codec is a [`Violation::ConflictingPayloadType`].
    /// If only format parameters or feedback differ, the first offer wins.
    pub fn add_payload_types(
        &mut self,
        offered: impl IntoIterator<Item = PayloadType>,
    ) -> Result<(), Violation> {
        let mut added: Vec<PayloadType> = vec![];

        for p in offered {
            if let Some(v) = check_payload_type(&p) {
                warn!("Reject payload type {}: {}", p, v.log());
                return Err(v);
            }

            let existing = self
                .payload_types
                .iter()
                .chain(added.iter())
                .find(|e| e.pt == p.pt);

            match existing {
                Some(e) if e.conflicts_with(&p) => {
                    warn!("Reject conflicting payload type: {} vs {}", e, p);
                    return Err(Violation::ConflictingPayloadType {
                        pt: p.pt,
                        existing: e.to_string(),
                        offered: p.to_string(),
                    });
                }
                Some(e) => {
                    if e.diverges_from(&p) {
                        warn!("Payload type {} offered with other parameters, keeping first", p);
                    }
                }
                None => added.push(p),
            }
        }

        for p in &added {
            debug!("Add payload type: {}", p);
        }
        self.payload_types.extend(added);

        Ok(())
    }

    /// Merge header extensions into the shared id map.
    ///
    /// An id reused for another uri, or a uri reused with another id, is a
    /// [`Violation::ConflictingHeaderExtension`].
    pub fn add_header_extensions(
        &mut self,
        offered: impl IntoIterator<Item = HeaderExtension>,
    ) -> Result<(), Violation> {
        let two_byte = self.config().two_byte_extensions();
        let mut added: Vec<HeaderExtension> = vec![];

        for h in offered {
            if let Some(v) = check_header_extension(&h, two_byte) {
                warn!("Reject header extension {}: {}", h, v.log());
                return Err(v);
            }

            let existing = self
                .header_extensions
                .iter()
                .chain(added.iter())
                .find(|e| e.id == h.id || e.uri == h.uri);

            match existing {
                Some(e) if *e == h => {}
                Some(e) => {
                    warn!("Reject conflicting header extension: {} vs {}", e, h);
                    return Err(Violation::ConflictingHeaderExtension {
                        existing: e.clone(),
                        offered: h,
                    });
                }
                None => added.push(h),
            }
        }

        for h in &added {
            match h.extension() {
                Some(ext) => debug!("Add header extension: {} ({:?})", h, ext),
                None => debug!("Add header extension: {}", h),
            }
        }
        self.header_extensions.extend(added);

        Ok(())
    }

    /// Add a track.
    ///
    /// Rejects a duplicate track id, an empty source list, a zero SSRC and any
    /// SSRC, main or feedback, already used anywhere in the description or
    /// earlier in the same track.
    pub fn add_track(
        &mut self,
        id: impl Into<TrackId>,
        content: Option<&str>,
        sources: Vec<MediaSource>,
    ) -> Result<(), Violation> {
        let id: TrackId = id.into();

        if id.is_empty() {
            warn!("Reject track with empty id");
            return Err(Violation::EmptyTrackId);
        }

        if self.tracks.iter().any(|t| t.id == id) {
            warn!("Reject duplicate track id: {}", Pii(&id));
            return Err(Violation::DuplicateTrackId(id));
        }

        let mut own: HashSet<Ssrc> = HashSet::new();

        for ssrc in sources.iter().flat_map(|s| s.ssrcs()) {
            if ssrc.is_zero() {
                warn!("Reject zero ssrc in track: {}", Pii(&id));
                return Err(Violation::ZeroSsrc(id));
            }

            let first = if own.contains(&ssrc) {
                Some(id.clone())
            } else {
                self.ssrcs.get(&ssrc).cloned()
            };

            if let Some(first) = first {
                warn!(
                    "Reject ssrc {} in track {}, already used by {}",
                    ssrc,
                    Pii(&id),
                    Pii(&first)
                );
                return Err(Violation::SsrcCollision {
                    ssrc,
                    first,
                    second: id,
                });
            }

            own.insert(ssrc);
        }

        if sources.is_empty() {
            warn!("Reject track without sources: {}", Pii(&id));
            return Err(Violation::EmptyTrack(id));
        }

        debug!("Add track {} with {} sources", Pii(&id), sources.len());
        for s in &sources {
            trace!("Track {} source {}", id, s);
        }

        for ssrc in own {
            self.ssrcs.insert(ssrc, id.clone());
        }
        self.tracks
            .push(VideoTrack::new(id, content.map(|c| c.to_string()), sources));

        Ok(())
    }

    /// Apply a whole participant contribution, or nothing of it.
    pub fn add_offer(&mut self, offer: ParticipantOffer) -> Result<(), Violation> {
        let mut next = self.clone();

        next.add_payload_types(offer.payload_types)?;
        next.add_header_extensions(offer.header_extensions)?;
        for t in offer.tracks {
            next.add_track(t.id, t.content.as_deref(), t.sources)?;
        }

        *self = next;

        Ok(())
    }

    /// Remove a track, i.e. when a participant leaves. Its SSRCs become free.
    pub fn remove_track(&mut self, id: &str) -> Option<VideoTrack> {
        let idx = self.tracks.iter().position(|t| &*t.id == id)?;
        let track = self.tracks.remove(idx);

        for ssrc in track.ssrcs() {
            self.ssrcs.remove(&ssrc);
        }

        debug!("Remove track: {}", Pii(&track.id));

        Some(track)
    }

    /// Validate the accumulated state and produce an immutable description.
    ///
    /// The builder is left as is, so repeated calls give the same result.
    pub fn build(&self) -> Result<VideoDescription, Violation> {
        let parts = Parts {
            tracks: &self.tracks,
            payload_types: &self.payload_types,
            header_extensions: &self.header_extensions,
        };

        if let Some(v) = self.validator.check(parts, true).into_iter().next() {
            warn!("Description is invalid: {}", v.log());
            return Err(v);
        }

        info!(
            "Built description with {} tracks, {} payload types, {} header extensions",
            self.tracks.len(),
            self.payload_types.len(),
            self.header_extensions.len()
        );

        Ok(VideoDescription::new(
            self.tracks.clone(),
            self.payload_types.clone(),
            self.header_extensions.clone(),
            self.config().clone(),
        ))
    }
}

impl Default for DescriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
