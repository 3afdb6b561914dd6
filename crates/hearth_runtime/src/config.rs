//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [driver]
//! idle_quantum_ms = 2
//! heartbeat_ms = 2000
//! starting_location = "main"
//!
//! [listener]
//! bind = "0.0.0.0:50000"
//! greeting = "Welcome to Hearth."
//! max_line_len = 1024
//! enter_timeout_ms = 5000
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use hearth_foundation::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the whole server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Driver (scheduler) settings.
    pub driver: DriverConfig,
    /// Line listener settings.
    pub listener: ListenerConfig,
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the text is not valid TOML or has fields
    /// of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

/// Settings for the driver loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Sleep between passes when the queue is empty, in milliseconds.
    pub idle_quantum_ms: u64,
    /// Interval between heartbeats, in milliseconds.
    pub heartbeat_ms: u64,
    /// Tag of the starting location new players arrive in.
    pub starting_location: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            idle_quantum_ms: 2,
            heartbeat_ms: 2000,
            starting_location: "main".to_string(),
        }
    }
}

impl DriverConfig {
    /// Builder method to set the idle sleep.
    #[must_use]
    pub fn with_idle_quantum(mut self, quantum: Duration) -> Self {
        self.idle_quantum_ms = duration_ms(quantum);
        self
    }

    /// Builder method to set the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat_ms = duration_ms(interval);
        self
    }

    /// Builder method to set the starting location tag.
    #[must_use]
    pub fn with_starting_location(mut self, tag: impl Into<String>) -> Self {
        self.starting_location = tag.into();
        self
    }

    /// Idle sleep as a `Duration`.
    #[must_use]
    pub fn idle_quantum(&self) -> Duration {
        Duration::from_millis(self.idle_quantum_ms)
    }

    /// Heartbeat interval as a `Duration`.
    #[must_use]
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }
}

/// Settings for the line-oriented TCP listener.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to accept connections on.
    pub bind: SocketAddr,
    /// Text sent to each new connection before asking for a name.
    pub greeting: String,
    /// Longest accepted input line in bytes; longer lines are cut.
    pub max_line_len: usize,
    /// How long a new connection waits for its body, in milliseconds.
    pub enter_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 50000)),
            greeting: "Welcome to Hearth.".to_string(),
            max_line_len: 1024,
            enter_timeout_ms: 5000,
        }
    }
}

impl ListenerConfig {
    /// Builder method to set the bind address.
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Builder method to set the greeting.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Builder method to set the maximum line length.
    #[must_use]
    pub fn with_max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    /// Builder method to set how long a connection waits to enter.
    #[must_use]
    pub fn with_enter_timeout(mut self, timeout: Duration) -> Self {
        self.enter_timeout_ms = duration_ms(timeout);
        self
    }

    /// Entry wait as a `Duration`.
    #[must_use]
    pub fn enter_timeout(&self) -> Duration {
        Duration::from_millis(self.enter_timeout_ms)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
