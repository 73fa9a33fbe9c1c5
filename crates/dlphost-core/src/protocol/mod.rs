//! Wire protocol: length-prefixed framing and the message envelope.

pub mod envelope;
pub mod frame;
