//! Frame header codec tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use dlphost_core::protocol::frame::{decode_length, encode_length, HEADER_LEN, MAX_MESSAGE_SIZE};

#[test]
fn header_is_little_endian() {
    let len = decode_length(&[0x02, 0x00, 0x00, 0x00][..]).unwrap();
    assert_eq!(len, 2);

    // 0x0102 little-endian
    let len = decode_length(&[0x02, 0x01, 0x00, 0x00][..]).unwrap();
    assert_eq!(len, 258);
}

#[test]
fn encode_then_decode_round_trips() {
    for len in [1usize, 42, 4096, MAX_MESSAGE_SIZE] {
        let header = encode_length(len).unwrap();
        assert_eq!(header.len(), HEADER_LEN);
        assert_eq!(decode_length(&header[..]).unwrap(), len);
    }
}

#[test]
fn zero_length_is_invalid() {
    let err = decode_length(&[0u8; 4][..]).expect_err("zero length must fail");
    assert_eq!(err.code(), "INVALID_FRAME_LENGTH");
}

#[test]
fn oversized_length_is_invalid() {
    let too_big = (MAX_MESSAGE_SIZE as u32 + 1).to_le_bytes();
    let err = decode_length(&too_big[..]).expect_err("oversized length must fail");
    assert_eq!(err.code(), "INVALID_FRAME_LENGTH");

    // u32::MAX covers the "negative i32" headers a confused peer might send.
    let err = decode_length(&u32::MAX.to_le_bytes()[..]).expect_err("must fail");
    assert_eq!(err.code(), "INVALID_FRAME_LENGTH");
}

#[test]
fn max_length_is_valid() {
    let header = (MAX_MESSAGE_SIZE as u32).to_le_bytes();
    assert_eq!(decode_length(&header[..]).unwrap(), MAX_MESSAGE_SIZE);
}

#[test]
fn short_header_is_truncation() {
    let err = decode_length(&[0x01, 0x00][..]).expect_err("short header must fail");
    assert_eq!(err.code(), "TRUNCATED_MESSAGE");
}

#[test]
fn encode_rejects_oversized_payload() {
    let err = encode_length(MAX_MESSAGE_SIZE + 1).expect_err("must fail");
    assert_eq!(err.code(), "MESSAGE_TOO_LARGE");
}
