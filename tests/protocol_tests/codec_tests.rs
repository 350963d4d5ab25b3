//! Codec Tests
//!
//! Tests for packet encoding/decoding and stream framing.

use std::io::Cursor;

use rcon_client::protocol::{
    decode_packet, encode_packet, read_packet, write_packet, Packet, PacketType,
    AUTH_FAILURE_ID, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
};
use rcon_client::RconError;

/// Build a raw frame with an arbitrary size field
fn raw_frame(size: i32, request_id: i32, packet_type: i32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&size.to_le_bytes());
    bytes.extend_from_slice(&request_id.to_le_bytes());
    bytes.extend_from_slice(&packet_type.to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_auth() {
    let packet = Packet::new(1, PacketType::AUTH, "pw");
    let encoded = encode_packet(&packet);

    // Expected: [0C 00 00 00][01 00 00 00][03 00 00 00][p w][00 00]
    //           size(12)     id(1)        type(3)      payload terminators
    assert_eq!(encoded.len(), 4 + 12);
    assert_eq!(&encoded[0..4], &[0x0C, 0x00, 0x00, 0x00]);
    assert_eq!(&encoded[4..8], &[0x01, 0x00, 0x00, 0x00]);
    assert_eq!(&encoded[8..12], &[0x03, 0x00, 0x00, 0x00]);
    assert_eq!(&encoded[12..14], b"pw");
    assert_eq!(&encoded[14..16], &[0x00, 0x00]);
}

#[test]
fn test_wire_format_exec_command() {
    let packet = Packet::new(0x0102_0304, PacketType::EXEC_COMMAND, "list");
    let encoded = encode_packet(&packet);

    // Little-endian id and type 2
    assert_eq!(&encoded[4..8], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&encoded[8..12], &[0x02, 0x00, 0x00, 0x00]);
    assert_eq!(&encoded[12..16], b"list");
}

#[test]
fn test_size_field_counts_utf8_bytes() {
    // 'é' and '§' are two bytes each in UTF-8
    let packet = Packet::new(7, PacketType::EXEC_COMMAND, "say §aé");
    let encoded = encode_packet(&packet);

    let size = i32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
    assert_eq!(size as usize, 10 + "say §aé".len());
    assert_eq!(size as usize, packet.frame_size());
    assert_eq!(encoded.len(), 4 + size as usize);
}

#[test]
fn test_empty_payload_is_minimum_frame() {
    let packet = Packet::new(3, PacketType::AUTH_RESPONSE, "");
    let encoded = encode_packet(&packet);

    assert_eq!(encoded.len(), 14);
    assert_eq!(&encoded[0..4], &10i32.to_le_bytes());

    let decoded = decode_packet(&encoded).unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn test_negative_request_id_encodes() {
    let packet = Packet::new(AUTH_FAILURE_ID, PacketType::AUTH_RESPONSE, "");
    let encoded = encode_packet(&packet);

    assert_eq!(&encoded[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
    assert!(decode_packet(&encoded).unwrap().is_auth_failure());
}

#[test]
#[should_panic(expected = "NUL")]
fn test_encode_rejects_nul_payload() {
    let packet = Packet::new(1, PacketType::EXEC_COMMAND, "say a\0b");
    let _ = encode_packet(&packet);
}

#[test]
#[should_panic(expected = "MAX_PAYLOAD_SIZE")]
fn test_encode_rejects_oversized_payload() {
    let packet = Packet::new(1, PacketType::EXEC_COMMAND, "x".repeat(MAX_PAYLOAD_SIZE + 1));
    let _ = encode_packet(&packet);
}

#[test]
fn test_largest_payload_roundtrip() {
    let packet = Packet::new(1, PacketType::EXEC_RESPONSE, "x".repeat(MAX_PAYLOAD_SIZE));
    let encoded = encode_packet(&packet);

    let size = i32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
    assert_eq!(size as usize, MAX_FRAME_SIZE);

    let decoded = decode_packet(&encoded).unwrap();
    assert_eq!(decoded.payload.len(), MAX_PAYLOAD_SIZE);
    assert_eq!(decoded, packet);
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_fields() {
    let bytes = raw_frame(15, 42, 0, b"hello");
    let packet = decode_packet(&bytes).unwrap();

    assert_eq!(packet.request_id, 42);
    assert_eq!(packet.packet_type, PacketType::RESPONSE_VALUE);
    assert_eq!(packet.payload, "hello");
}

#[test]
fn test_decode_ignores_terminator_values() {
    let mut bytes = raw_frame(13, 5, 2, b"abc");
    let len = bytes.len();
    bytes[len - 2] = b'x';
    bytes[len - 1] = b'y';

    let packet = decode_packet(&bytes).unwrap();
    assert_eq!(packet.payload, "abc");
}

#[test]
fn test_decode_invalid_utf8_is_lossy() {
    let bytes = raw_frame(12, 1, 2, &[0x68, 0xFF]);
    let packet = decode_packet(&bytes).unwrap();

    assert_eq!(packet.payload, "h\u{FFFD}");
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let mut bytes = raw_frame(11, 9, 2, b"a");
    bytes.extend_from_slice(&raw_frame(11, 10, 2, b"b"));

    let packet = decode_packet(&bytes).unwrap();
    assert_eq!(packet.request_id, 9);
    assert_eq!(packet.payload, "a");
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_incomplete_header() {
    let result = decode_packet(&[0x0A, 0x00]);
    assert!(matches!(result, Err(RconError::Protocol(_))));
    assert!(result.unwrap_err().to_string().contains("Incomplete header"));
}

#[test]
fn test_incomplete_frame() {
    // Size field says 20 bytes but only 14 follow
    let mut bytes = raw_frame(10, 1, 2, b"");
    bytes[0] = 20;

    let result = decode_packet(&bytes);
    assert!(matches!(result, Err(RconError::Protocol(_))));
    assert!(result.unwrap_err().to_string().contains("Incomplete frame"));
}

#[test]
fn test_size_below_minimum_rejected() {
    let bytes = raw_frame(9, 1, 2, b"");
    let result = decode_packet(&bytes);

    assert!(matches!(result, Err(RconError::Protocol(_))));
    assert!(result.unwrap_err().to_string().contains("below the minimum"));
}

#[test]
fn test_negative_size_rejected() {
    let bytes = raw_frame(-4, 1, 2, b"");
    assert!(matches!(decode_packet(&bytes), Err(RconError::Protocol(_))));
}

#[test]
fn test_oversized_frame_rejected() {
    let bytes = raw_frame(MAX_FRAME_SIZE as i32 + 1, 1, 2, b"");
    let result = decode_packet(&bytes);

    assert!(matches!(result, Err(RconError::Protocol(_))));
    assert!(result.unwrap_err().to_string().contains("too large"));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_packet() {
    let packet = Packet::new(2, PacketType::EXEC_COMMAND, "time set day");

    let mut buffer = Vec::new();
    write_packet(&mut buffer, &packet).unwrap();

    let mut cursor = Cursor::new(buffer);
    let decoded = read_packet(&mut cursor).unwrap();

    assert_eq!(decoded, packet);
}

#[test]
fn test_stream_multiple_packets() {
    let packets = vec![
        Packet::new(1, PacketType::AUTH, "secret"),
        Packet::new(2, PacketType::EXEC_COMMAND, "list"),
        Packet::new(3, PacketType::EXEC_COMMAND, ""),
        Packet::new(4, PacketType::EXEC_COMMAND, "say done"),
    ];

    let mut buffer = Vec::new();
    for packet in &packets {
        write_packet(&mut buffer, packet).unwrap();
    }

    // Each read consumes exactly one frame
    let mut cursor = Cursor::new(buffer);
    for expected in &packets {
        let decoded = read_packet(&mut cursor).unwrap();
        assert_eq!(&decoded, expected);
    }
}

#[test]
fn test_stream_eof_before_header_is_connection_error() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    let result = read_packet(&mut cursor);

    assert!(matches!(result, Err(RconError::Connection(_))));
}

#[test]
fn test_stream_eof_inside_header_is_protocol_error() {
    // Two of the four size bytes, then end of stream
    let mut cursor = Cursor::new(vec![0x0A, 0x00]);
    let result = read_packet(&mut cursor);

    assert!(matches!(result, Err(RconError::Protocol(_))), "got {:?}", result);
    assert!(result.unwrap_err().to_string().contains("Truncated frame header"));
}

#[test]
fn test_stream_eof_inside_frame_is_protocol_error() {
    let mut bytes = raw_frame(15, 1, 2, b"hello");
    bytes.truncate(10);

    let mut cursor = Cursor::new(bytes);
    let result = read_packet(&mut cursor);

    assert!(matches!(result, Err(RconError::Protocol(_))));
    assert!(result.unwrap_err().to_string().contains("Truncated"));
}

#[test]
fn test_stream_rejects_bad_size_without_reading_body() {
    let bytes = raw_frame(3, 1, 2, b"");
    let mut cursor = Cursor::new(bytes);

    assert!(matches!(read_packet(&mut cursor), Err(RconError::Protocol(_))));
    // Only the size field was consumed
    assert_eq!(cursor.position(), 4);
}
