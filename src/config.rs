//! Configuration for the RCON client
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::time::Duration;

use crate::error::{RconError, Result};

/// Environment variable names read by [`Config::from_env`]
pub const ENV_HOST: &str = "RCON_HOST";
pub const ENV_PORT: &str = "RCON_PORT";
pub const ENV_PASSWORD: &str = "RCON_PASSWORD";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "RCON_CONNECT_TIMEOUT_MS";
pub const ENV_IO_TIMEOUT_MS: &str = "RCON_IO_TIMEOUT_MS";

/// Conventional RCON port of a Minecraft server
pub const DEFAULT_PORT: u16 = 25575;

/// Default bound for connect and for each socket read (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Connection settings for one RCON endpoint
#[derive(Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server RCON port
    pub port: u16,

    /// Plaintext password sent as the AUTH payload
    pub password: String,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// Bound on the TCP handshake (milliseconds)
    pub connect_timeout_ms: u64,

    /// Bound on every socket read and write (milliseconds)
    pub io_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            password: String::new(),
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            io_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// Keeps the password out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("io_timeout_ms", &self.io_timeout_ms)
            .finish()
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a config from `RCON_*` environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a config from an arbitrary key lookup over the defaults
    ///
    /// Missing keys keep their default; present but unparsable numbers
    /// are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_number(ENV_PORT, &port)?;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            config.password = password;
        }
        if let Some(ms) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout_ms = parse_number(ENV_CONNECT_TIMEOUT_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_IO_TIMEOUT_MS) {
            config.io_timeout_ms = parse_number(ENV_IO_TIMEOUT_MS, &ms)?;
        }

        Ok(config)
    }

    /// Check that the config can be used to open a connection
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(RconError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(RconError::Config("port must not be 0".to_string()));
        }
        if self.password.is_empty() {
            return Err(RconError::Config("password is not configured".to_string()));
        }
        // std rejects a zero socket timeout
        if self.connect_timeout_ms == 0 {
            return Err(RconError::Config(
                "connect timeout must be greater than 0".to_string(),
            ));
        }
        if self.io_timeout_ms == 0 {
            return Err(RconError::Config(
                "I/O timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` of the endpoint
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RconError::Config(format!("{} is not a valid number: {:?}", key, value)))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server RCON port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the RCON password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read/write timeout (in milliseconds)
    pub fn io_timeout_ms(mut self, ms: u64) -> Self {
        self.config.io_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
