//! Native messaging frame header (panic-free).
//!
//! One frame = 4-byte little-endian unsigned length prefix + that many
//! bytes of UTF-8 JSON. The prefix excludes itself.
//!
//! Parsing rules:
//! - Never index (`buf[0]`) — always use `Buf` and `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use bytes::Buf;

use crate::error::{DlpError, Result};

/// Upper bound on a single message body (1 MiB, matching Chrome's native
/// messaging limit).
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Length prefix size in bytes.
pub const HEADER_LEN: usize = 4;

/// Decode and validate a frame length from a header buffer.
///
/// A zero or oversized length is `InvalidFrameLength`; the caller must not
/// attempt to read a body for it. A short header is `TruncatedMessage`.
pub fn decode_length(mut header: impl Buf) -> Result<usize> {
    if header.remaining() < HEADER_LEN {
        return Err(DlpError::TruncatedMessage);
    }
    let len = header.get_u32_le();
    if len == 0 || len as usize > MAX_MESSAGE_SIZE {
        return Err(DlpError::InvalidFrameLength(len));
    }
    Ok(len as usize)
}

/// Encode the length header for a payload.
///
/// Oversized payloads fail with `MessageTooLarge` before any bytes are
/// produced, so the stream stays frame-aligned for the next write.
pub fn encode_length(payload_len: usize) -> Result<[u8; HEADER_LEN]> {
    if payload_len > MAX_MESSAGE_SIZE {
        return Err(DlpError::MessageTooLarge(payload_len));
    }
    Ok((payload_len as u32).to_le_bytes())
}
