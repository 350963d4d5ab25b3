//! Network Module
//!
//! TCP client side of the RCON protocol.
//!
//! ## Architecture
//! - One blocking socket per `Connection`
//! - Handshake runs inside construction
//! - `SharedConnection` serializes round trips behind a mutex

mod connection;
mod shared;

pub use connection::{Connection, ConnectionState};
pub use shared::SharedConnection;
