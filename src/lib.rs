//! # rcon-client
//!
//! A minimal synchronous client for the Source RCON protocol:
//! - Length-prefixed, little-endian packet framing
//! - Password handshake on connect
//! - Blocking command round trips with bounded timeouts
//! - Deterministic socket release (explicit `close` or drop)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Caller (alerts, backups, CLI)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ open / run / close
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                              │
//! │     (unauthenticated → authenticated → closed)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Packet
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Packet Codec                              │
//! │          [size][id][type][payload][0x00 0x00]                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                  TCP socket
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use rcon_client::Connection;
//!
//! let mut conn = Connection::open("127.0.0.1", 25575, "secret")?;
//! let reply = conn.run("list")?;
//! println!("{}", reply);
//! conn.close();
//! # Ok::<(), rcon_client::RconError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::Config;
pub use network::{Connection, ConnectionState, SharedConnection};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rcon-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
