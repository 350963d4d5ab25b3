//! Protocol codec
//!
//! Encoding and decoding functions for the RCON wire format.
//!
//! ## Wire Format
//!
//! All integers are little-endian.
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────┬──────┬──────┐
//! │ Size (4) │  Id (4)  │ Type (4) │ Payload (UTF-8) │ 0x00 │ 0x00 │
//! └──────────┴──────────┴──────────┴─────────────────┴──────┴──────┘
//!            └──────────────────── size bytes ──────────────────────┘
//! ```
//!
//! `size = 10 + payload bytes`. The two terminator bytes are written on
//! encode and skipped, unchecked, on decode.

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::packet::{Packet, PacketType, PACKET_OVERHEAD};
use crate::error::{RconError, Result};

/// Size field width
pub const HEADER_SIZE: usize = 4;

/// Largest accepted value of the size field (16 MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Largest payload that still fits in `MAX_FRAME_SIZE`
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - PACKET_OVERHEAD;

// =============================================================================
// Packet Encoding/Decoding
// =============================================================================

/// Encode a packet to bytes
///
/// Format: size (4) + request_id (4) + type (4) + payload + 0x00 0x00
///
/// # Panics
///
/// Panics if the payload contains a NUL byte or is longer than
/// `MAX_PAYLOAD_SIZE` bytes. Such a payload cannot be framed; callers
/// must reject it before encoding.
pub fn encode_packet(packet: &Packet) -> Bytes {
    assert!(
        !packet.payload.contains('\0'),
        "RCON payload must not contain NUL bytes"
    );
    assert!(
        packet.payload.len() <= MAX_PAYLOAD_SIZE,
        "RCON payload exceeds MAX_PAYLOAD_SIZE"
    );

    let payload = packet.payload.as_bytes();
    let size = PACKET_OVERHEAD + payload.len();

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + size);
    buf.put_i32_le(size as i32);
    buf.put_i32_le(packet.request_id);
    buf.put_i32_le(packet.packet_type.value());
    buf.put_slice(payload);
    buf.put_u8(0);
    buf.put_u8(0);

    buf.freeze()
}

/// Decode one packet from the front of `bytes`
///
/// Bytes after the first frame are ignored.
pub fn decode_packet(bytes: &[u8]) -> Result<Packet> {
    if bytes.len() < HEADER_SIZE {
        return Err(RconError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let size = validate_size(header.get_i32_le())?;

    let body = &bytes[HEADER_SIZE..];
    if body.len() < size {
        return Err(RconError::Protocol(format!(
            "Incomplete frame: expected {} bytes, got {}",
            size,
            body.len()
        )));
    }

    Ok(decode_body(&body[..size]))
}

/// Check a size field before anything is allocated for it
fn validate_size(size: i32) -> Result<usize> {
    if size < PACKET_OVERHEAD as i32 {
        return Err(RconError::Protocol(format!(
            "Frame size {} is below the minimum of {}",
            size, PACKET_OVERHEAD
        )));
    }

    let size = size as usize;
    if size > MAX_FRAME_SIZE {
        return Err(RconError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            size, MAX_FRAME_SIZE
        )));
    }

    Ok(size)
}

/// Split a validated frame body into its fields
///
/// `body.len()` is the size field, so at least `PACKET_OVERHEAD`.
fn decode_body(mut body: &[u8]) -> Packet {
    let request_id = body.get_i32_le();
    let packet_type = PacketType::from(body.get_i32_le());

    let payload_len = body.len() - 2;
    let payload = String::from_utf8_lossy(&body[..payload_len]).into_owned();

    Packet {
        request_id,
        packet_type,
        payload,
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete packet from a stream
///
/// Blocks until the frame is complete or an error occurs. A stream that
/// ends before the first byte of the size field is a closed connection;
/// one that ends anywhere after it is a truncated frame.
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    let header = read_header(reader)?;
    let size = validate_size(i32::from_le_bytes(header))?;

    let mut body = vec![0u8; size];
    reader.read_exact(&mut body).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => RconError::Protocol(format!(
            "Truncated frame: stream closed before {} bytes were read",
            size
        )),
        _ => RconError::from_io(e, "failed to read frame body"),
    })?;

    Ok(decode_body(&body))
}

/// Read the size field, counting bytes so a partial header is told
/// apart from a clean close
fn read_header<R: Read>(reader: &mut R) -> Result<[u8; HEADER_SIZE]> {
    let mut header = [0u8; HEADER_SIZE];
    let mut filled = 0;

    while filled < HEADER_SIZE {
        match reader.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => {
                return Err(RconError::Connection("connection closed by peer".to_string()))
            }
            Ok(0) => {
                return Err(RconError::Protocol(format!(
                    "Truncated frame header: stream closed after {} of {} bytes",
                    filled, HEADER_SIZE
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RconError::from_io(e, "failed to read frame header")),
        }
    }

    Ok(header)
}

/// Write a packet to a stream and flush it
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet);
    writer
        .write_all(&bytes)
        .map_err(|e| RconError::from_io(e, "failed to write frame"))?;
    writer
        .flush()
        .map_err(|e| RconError::from_io(e, "failed to flush frame"))?;
    Ok(())
}
