//! JSON mapping of a [`VideoDescription`].
//!
//! ```json
//! {
//!   "streams": [
//!     { "id": "mic-cam", "content": "video", "sources": [{ "main": 1001, "feedback": 1002 }] }
//!   ],
//!   "payload-types": [
//!     { "id": 100, "name": "VP8", "clockrate": 90000, "rtcp-fbs": [{ "type": "nack" }] }
//!   ],
//!   "rtp-hdrexts": [
//!     { "id": 3, "uri": "urn:ietf:params:rtp-hdrext:ssrc-audio-level" }
//!   ]
//! }
//! ```
//!
//! Decoding always validates. Codec or header extension lists inside a stream
//! are rejected, they only exist on the description level.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::DescriptionConfig;
use crate::desc::VideoDescription;
use crate::ext::HeaderExtension;
use crate::format::{PayloadType, RtcpFeedback};
use crate::id::TrackId;
use crate::track::{MediaSource, VideoTrack};
use crate::util::Pii;
use crate::DescError;

#[derive(Debug, Serialize, Deserialize)]
struct WireDescription {
    #[serde(default)]
    streams: Vec<WireTrack>,
    #[serde(rename = "payload-types", default)]
    payload_types: Vec<WirePayloadType>,
    #[serde(rename = "rtp-hdrexts", default)]
    rtp_hdrexts: Vec<WireHeaderExtension>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireTrack {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default)]
    sources: Vec<WireSource>,

    // Only read to reject them.
    #[serde(
        rename = "payload-types",
        default,
        skip_serializing,
        deserialize_with = "present"
    )]
    payload_types: Option<IgnoredAny>,
    #[serde(
        rename = "rtp-hdrexts",
        default,
        skip_serializing,
        deserialize_with = "present"
    )]
    rtp_hdrexts: Option<IgnoredAny>,
}

// Some for any value of a present key, null included.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<IgnoredAny>, D::Error> {
    IgnoredAny::deserialize(d).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
struct WireSource {
    main: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feedback: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePayloadType {
    id: u8,
    name: String,
    clockrate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channels: Option<u8>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, String>,
    #[serde(rename = "rtcp-fbs", default, skip_serializing_if = "Vec::is_empty")]
    rtcp_fbs: Vec<WireRtcpFeedback>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireRtcpFeedback {
    #[serde(rename = "type")]
    typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireHeaderExtension {
    id: u8,
    uri: String,
}

/// Encode a description.
pub fn to_json(desc: &VideoDescription) -> Result<String, DescError> {
    Ok(serde_json::to_string(&WireDescription::from(desc))?)
}

/// Encode a description, indented.
pub fn to_json_pretty(desc: &VideoDescription) -> Result<String, DescError> {
    Ok(serde_json::to_string_pretty(&WireDescription::from(desc))?)
}

/// Decode and validate a description using the default config.
pub fn from_json(s: &str) -> Result<VideoDescription, DescError> {
    from_json_with(s, &DescriptionConfig::default())
}

/// Decode and validate a description.
pub fn from_json_with(s: &str, config: &DescriptionConfig) -> Result<VideoDescription, DescError> {
    let wire: WireDescription = serde_json::from_str(s)?;
    let desc = wire.into_description(config)?;

    if let Some(v) = config.validator().first(&desc) {
        warn!("Decoded description is invalid: {}", v.log());
        return Err(v.into());
    }

    Ok(desc)
}

impl WireDescription {
    fn into_description(self, config: &DescriptionConfig) -> Result<VideoDescription, DescError> {
        let mut tracks = Vec::with_capacity(self.streams.len());

        for t in self.streams {
            if t.payload_types.is_some() || t.rtp_hdrexts.is_some() {
                warn!("Reject track local codec or header extension list: {}", Pii(&t.id));
                return Err(DescError::TrackLocalOverride(t.id.into()));
            }

            let sources = t.sources.into_iter().map(MediaSource::from).collect();
            tracks.push(VideoTrack::new(TrackId::from(t.id), t.content, sources));
        }

        let payload_types = self
            .payload_types
            .into_iter()
            .map(PayloadType::from)
            .collect();

        let header_extensions = self
            .rtp_hdrexts
            .into_iter()
            .map(|h| HeaderExtension::new(h.id, h.uri))
            .collect();

        Ok(VideoDescription::new(
            tracks,
            payload_types,
            header_extensions,
            config.clone(),
        ))
    }
}

impl<'a> From<&'a VideoDescription> for WireDescription {
    fn from(d: &'a VideoDescription) -> Self {
        WireDescription {
            streams: d.tracks().iter().map(WireTrack::from).collect(),
            payload_types: d.payload_types().iter().map(WirePayloadType::from).collect(),
            rtp_hdrexts: d
                .header_extensions()
                .iter()
                .map(|h| WireHeaderExtension {
                    id: *h.id,
                    uri: h.uri.clone(),
                })
                .collect(),
        }
    }
}

impl<'a> From<&'a VideoTrack> for WireTrack {
    fn from(t: &'a VideoTrack) -> Self {
        WireTrack {
            id: t.id().to_string(),
            content: t.content().map(|c| c.to_string()),
            sources: t
                .sources()
                .iter()
                .map(|s| WireSource {
                    main: *s.main,
                    feedback: s.feedback.map(|f| *f),
                })
                .collect(),
            payload_types: None,
            rtp_hdrexts: None,
        }
    }
}

impl From<WireSource> for MediaSource {
    fn from(s: WireSource) -> Self {
        MediaSource {
            main: s.main.into(),
            // 0 is how the legacy API spells "no feedback".
            feedback: s.feedback.filter(|f| *f != 0).map(Into::into),
        }
    }
}

impl<'a> From<&'a PayloadType> for WirePayloadType {
    fn from(p: &'a PayloadType) -> Self {
        WirePayloadType {
            id: *p.pt,
            name: p.encoding_name.clone(),
            clockrate: p.clock_rate,
            channels: p.channels,
            parameters: p.parameters.clone(),
            rtcp_fbs: p
                .rtcp_fbs
                .iter()
                .map(|f| WireRtcpFeedback {
                    typ: f.typ.clone(),
                    subtype: f.subtype.clone(),
                })
                .collect(),
        }
    }
}

impl From<WirePayloadType> for PayloadType {
    fn from(p: WirePayloadType) -> Self {
        PayloadType {
            pt: p.id.into(),
            encoding_name: p.name,
            clock_rate: p.clockrate,
            channels: p.channels,
            parameters: p.parameters,
            rtcp_fbs: p
                .rtcp_fbs
                .into_iter()
                .map(|f| RtcpFeedback {
                    typ: f.typ,
                    subtype: f.subtype,
                })
                .collect(),
        }
    }
}
