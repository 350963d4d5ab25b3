//! RCON Connection
//!
//! Owns one TCP socket to an RCON endpoint, performs the authentication
//! handshake and runs commands over it.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::{Config, DEFAULT_TIMEOUT_MS};
use crate::error::{RconError, Result};
use crate::protocol::{read_packet, write_packet, Packet, PacketType, MAX_PAYLOAD_SIZE};

/// Lifecycle state of a [`Connection`]
///
/// Transitions only move forward:
/// `Unauthenticated → Authenticated → Closed`, or
/// `Unauthenticated → Closed` when the handshake fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket open, handshake not yet confirmed
    Unauthenticated,

    /// Ready to run commands
    Authenticated,

    /// Socket released; no further I/O
    Closed,
}

/// Buffered halves of the socket
struct Transport {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

/// An authenticated RCON connection
///
/// Not safe to share between threads without external locking; see
/// [`SharedConnection`](super::SharedConnection). The socket is released
/// on [`close`](Connection::close) or when the value is dropped.
pub struct Connection {
    /// Socket halves, `None` once closed
    transport: Option<Transport>,

    state: ConnectionState,

    /// Id of the last packet sent; 0 before the first
    last_request_id: i32,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect and authenticate with the default timeouts
    pub fn open(host: &str, port: u16, password: &str) -> Result<Self> {
        let timeout = Duration::from_millis(DEFAULT_TIMEOUT_MS);
        Self::open_with_timeouts(host, port, password, timeout, timeout)
    }

    /// Connect and authenticate using the settings in `config`
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::open_with_timeouts(
            &config.host,
            config.port,
            &config.password,
            config.connect_timeout(),
            config.io_timeout(),
        )
    }

    /// Connect to `host:port` and authenticate with `password`
    ///
    /// `connect_timeout` bounds the TCP handshake; `io_timeout` bounds
    /// every later read and write. On authentication failure the socket
    /// is closed before the error is returned.
    pub fn open_with_timeouts(
        host: &str,
        port: u16,
        password: &str,
        connect_timeout: Duration,
        io_timeout: Duration,
    ) -> Result<Self> {
        check_payload(password, "password")?;

        let stream = connect_stream(host, port, connect_timeout)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| format!("{}:{}", host, port));

        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(io_timeout))?;
        stream.set_write_timeout(Some(io_timeout))?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;

        let mut connection = Self {
            transport: Some(Transport {
                reader: BufReader::new(read_stream),
                writer: BufWriter::new(stream),
            }),
            state: ConnectionState::Unauthenticated,
            last_request_id: 0,
            peer_addr,
        };

        tracing::debug!("Connected to {}", connection.peer_addr);

        if let Err(e) = connection.authenticate(password) {
            tracing::debug!("Authentication with {} failed: {}", connection.peer_addr, e);
            connection.close();
            return Err(e);
        }

        Ok(connection)
    }

    /// Send the AUTH packet and check the echoed request id
    fn authenticate(&mut self, password: &str) -> Result<()> {
        let request_id = self.next_request_id()?;
        let response = self.round_trip(Packet::new(request_id, PacketType::AUTH, password))?;

        if response.is_auth_failure() {
            return Err(RconError::Authentication(
                "server rejected the password".to_string(),
            ));
        }
        if response.request_id != request_id {
            return Err(RconError::Authentication(format!(
                "response id {} does not match request id {}",
                response.request_id, request_id
            )));
        }

        self.state = ConnectionState::Authenticated;
        tracing::debug!("Authenticated with {}", self.peer_addr);
        Ok(())
    }

    /// Run a console command and return the server's reply verbatim
    ///
    /// Blocks until one response packet is read or the I/O timeout
    /// elapses. A transport, timeout or protocol failure closes the
    /// connection; later calls fail with [`RconError::State`].
    pub fn run(&mut self, command: &str) -> Result<String> {
        match self.state {
            ConnectionState::Authenticated => {}
            ConnectionState::Unauthenticated => {
                return Err(RconError::State(
                    "connection is not authenticated".to_string(),
                ))
            }
            ConnectionState::Closed => {
                return Err(RconError::State("connection is closed".to_string()))
            }
        }
        check_payload(command, "command")?;

        let request_id = self.next_request_id()?;
        let response =
            match self.round_trip(Packet::new(request_id, PacketType::EXEC_COMMAND, command)) {
                Ok(response) => response,
                Err(e) => {
                    // No frame-boundary recovery after a partial exchange
                    tracing::debug!("Command on {} failed: {}", self.peer_addr, e);
                    self.close();
                    return Err(e);
                }
            };

        if response.request_id != request_id {
            tracing::debug!(
                "Response id {} from {} does not match request id {}",
                response.request_id,
                self.peer_addr,
                request_id
            );
        }

        Ok(response.payload)
    }

    /// Release the socket
    ///
    /// Idempotent: closing a closed connection does nothing.
    pub fn close(&mut self) {
        if let Some(transport) = self.transport.take() {
            let _ = transport.writer.get_ref().shutdown(Shutdown::Both);
            tracing::debug!("Closed connection to {}", self.peer_addr);
        }
        self.state = ConnectionState::Closed;
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True while commands can be run
    pub fn is_authenticated(&self) -> bool {
        self.state == ConnectionState::Authenticated
    }

    /// Request id of the last packet sent (0 if none)
    pub fn last_request_id(&self) -> i32 {
        self.last_request_id
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Advance the per-connection id counter; ids are never reused
    fn next_request_id(&mut self) -> Result<i32> {
        self.last_request_id = self
            .last_request_id
            .checked_add(1)
            .ok_or_else(|| RconError::State("request id space exhausted".to_string()))?;
        Ok(self.last_request_id)
    }

    /// Write one packet and read one back
    fn round_trip(&mut self, packet: Packet) -> Result<Packet> {
        let transport = self
            .transport
            .as_mut()
            .ok_or_else(|| RconError::State("connection is closed".to_string()))?;

        tracing::trace!(
            "-> {} id={} type={:?} len={}",
            self.peer_addr,
            packet.request_id,
            packet.packet_type,
            packet.payload.len()
        );
        write_packet(&mut transport.writer, &packet)?;

        let response = read_packet(&mut transport.reader)?;
        tracing::trace!(
            "<- {} id={} type={:?} len={}",
            self.peer_addr,
            response.request_id,
            response.packet_type,
            response.payload.len()
        );

        Ok(response)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer_addr", &self.peer_addr)
            .field("state", &self.state)
            .field("last_request_id", &self.last_request_id)
            .finish()
    }
}

/// Reject text that cannot be framed
fn check_payload(text: &str, what: &str) -> Result<()> {
    if text.contains('\0') {
        return Err(RconError::InvalidInput(format!(
            "{} must not contain NUL bytes",
            what
        )));
    }
    if text.len() > MAX_PAYLOAD_SIZE {
        return Err(RconError::InvalidInput(format!(
            "{} is {} bytes, longer than the {} byte limit",
            what,
            text.len(),
            MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

/// Resolve `host:port` and connect to the first address that accepts
fn connect_stream(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        RconError::Connection(format!("failed to resolve {}:{}: {}", host, port, e))
    })?;

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(e) => RconError::from_io(e, &format!("failed to connect to {}:{}", host, port)),
        None => RconError::Connection(format!("no addresses found for {}:{}", host, port)),
    })
}
