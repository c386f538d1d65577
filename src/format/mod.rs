//! Codec entries shared by every track of a call.

mod codec;
mod payload;

pub use codec::Codec;
pub use payload::{PayloadType, RtcpFeedback, MAX_PT};
