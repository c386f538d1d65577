#![allow(unused)]
use std::sync::Once;

use sfu_desc::{Extension, HeaderExtension, MediaSource, PayloadType, TrackOffer};

pub fn init_log() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    static START: Once = Once::new();

    START.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(env_filter)
            .init();
    });
}

pub fn vp8() -> PayloadType {
    PayloadType::new(100, "VP8", 90_000)
        .with_rtcp_fb("nack", None)
        .with_rtcp_fb("nack", Some("pli"))
        .with_rtcp_fb("goog-remb", None)
}

pub fn vp8_rtx() -> PayloadType {
    PayloadType::new(96, "rtx", 90_000).with_parameter("apt", "100")
}

pub fn h264() -> PayloadType {
    PayloadType::new(102, "H264", 90_000)
        .with_parameter("packetization-mode", "1")
        .with_parameter("profile-level-id", "42e01f")
}

pub fn audio_level() -> HeaderExtension {
    HeaderExtension::known(3, Extension::AudioLevel)
}

pub fn abs_send_time() -> HeaderExtension {
    HeaderExtension::known(2, Extension::AbsoluteSendTime)
}

/// A three layer simulcast track with RTX, SSRCs starting at `base`.
pub fn simulcast(id: &str, base: u32) -> TrackOffer {
    TrackOffer::new(
        id,
        Some("video"),
        vec![
            MediaSource::with_feedback(base, base + 1),
            MediaSource::with_feedback(base + 2, base + 3),
            MediaSource::with_feedback(base + 4, base + 5),
        ],
    )
}
