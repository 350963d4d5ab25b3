//! Protocol Module
//!
//! Defines the Source RCON wire protocol.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬──────────┬──────────┬───────────────┬────────────┐
//! │ Size (4) │  Id (4)  │ Type (4) │ Payload (N)   │ 0x00 0x00  │
//! └──────────┴──────────┴──────────┴───────────────┴────────────┘
//! ```
//!
//! ### Packet Types
//! - 3: AUTH          - Payload: password
//! - 2: EXEC_COMMAND  - Payload: command text
//! - 2: AUTH_RESPONSE / EXEC_RESPONSE (server replies)
//!
//! ### Authentication
//! The server echoes the AUTH request id on success and replies with
//! id `-1` when the password is wrong.

mod packet;
mod codec;

pub use packet::{Packet, PacketType, AUTH_FAILURE_ID, PACKET_OVERHEAD};
pub use codec::{
    encode_packet, decode_packet,
    read_packet, write_packet,
    HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
};
