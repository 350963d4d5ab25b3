//! Shared Connection
//!
//! A connection handle that can be used from several threads.

use parking_lot::Mutex;

use super::connection::{Connection, ConnectionState};
use crate::config::Config;
use crate::error::Result;

/// Thread-safe wrapper around a [`Connection`]
///
/// The lock is held for each full round trip, so frames from different
/// callers never interleave on the socket and request ids stay in order.
pub struct SharedConnection {
    inner: Mutex<Connection>,
}

impl SharedConnection {
    /// Wrap an authenticated connection
    pub fn new(connection: Connection) -> Self {
        Self {
            inner: Mutex::new(connection),
        }
    }

    /// Connect and authenticate using the settings in `config`
    pub fn connect(config: &Config) -> Result<Self> {
        Connection::connect(config).map(Self::new)
    }

    /// Run a command, blocking other callers until the reply arrives
    pub fn run(&self, command: &str) -> Result<String> {
        self.inner.lock().run(command)
    }

    /// Close the underlying connection (idempotent)
    pub fn close(&self) {
        self.inner.lock().close();
    }

    /// Current lifecycle state of the underlying connection
    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state()
    }

    /// Request id of the last packet sent
    pub fn last_request_id(&self) -> i32 {
        self.inner.lock().last_request_id()
    }

    /// Unwrap the connection
    pub fn into_inner(self) -> Connection {
        self.inner.into_inner()
    }
}

impl From<Connection> for SharedConnection {
    fn from(connection: Connection) -> Self {
        Self::new(connection)
    }
}
