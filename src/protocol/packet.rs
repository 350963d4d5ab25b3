//! Packet definitions
//!
//! The in-memory form of one RCON frame.

use std::fmt;

/// Bytes of a frame counted by the size field besides the payload:
/// request id (4) + type (4) + two NUL terminators (2)
pub const PACKET_OVERHEAD: usize = 10;

/// Request id a server echoes in its AUTH response to reject the password
pub const AUTH_FAILURE_ID: i32 = -1;

/// Packet type field
///
/// A newtype rather than an enum: the protocol reuses value 2 for both
/// `EXEC_COMMAND` and `AUTH_RESPONSE`, so types are compared by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketType(pub i32);

impl PacketType {
    /// Client → server: authenticate with the payload as password
    pub const AUTH: PacketType = PacketType(3);

    /// Server → client: outcome of an AUTH request
    pub const AUTH_RESPONSE: PacketType = PacketType(2);

    /// Client → server: run the payload as a console command
    pub const EXEC_COMMAND: PacketType = PacketType(2);

    /// Server → client: command output, in this client's framing
    pub const EXEC_RESPONSE: PacketType = PacketType(2);

    /// Server → client: command output as sent by Source-engine servers
    pub const RESPONSE_VALUE: PacketType = PacketType(0);

    /// Raw wire value
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            3 => write!(f, "AUTH"),
            2 => write!(f, "EXEC_COMMAND/AUTH_RESPONSE"),
            0 => write!(f, "RESPONSE_VALUE"),
            other => write!(f, "PacketType({})", other),
        }
    }
}

impl From<i32> for PacketType {
    fn from(value: i32) -> Self {
        PacketType(value)
    }
}

/// A single RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Caller-assigned sequence number, echoed by the server
    pub request_id: i32,

    /// Packet type
    pub packet_type: PacketType,

    /// UTF-8 text, without the trailing terminators
    pub payload: String,
}

impl Packet {
    /// Create a packet
    pub fn new(request_id: i32, packet_type: PacketType, payload: impl Into<String>) -> Self {
        Self {
            request_id,
            packet_type,
            payload: payload.into(),
        }
    }

    /// Value of the size field for this packet (`10 + payload bytes`)
    pub fn frame_size(&self) -> usize {
        PACKET_OVERHEAD + self.payload.len()
    }

    /// True if the server rejected authentication with this packet
    pub fn is_auth_failure(&self) -> bool {
        self.request_id == AUTH_FAILURE_ID
    }
}
