// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration: defaults, optional TOML file, environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bq_protocol::{DEFAULT_CHUNK_SIZE, MAX_MESSAGE_SIZE};
use serde::Deserialize;
use thiserror::Error;

use crate::env;

/// Default server port
pub const DEFAULT_PORT: u16 = 15001;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not determine the acting user")]
    NoUser,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Server used when `connect` is given an empty address
    pub server: Option<String>,
    /// Port used when the address does not name one
    pub port: u16,
    /// Acting user sent in every request header
    pub user: Option<String>,
    pub connect_timeout_ms: u64,
    /// Read/write timeout on the socket; `None` blocks indefinitely
    pub io_timeout_ms: Option<u64>,
    /// Largest script chunk sent in one frame
    pub script_chunk_size: usize,
    /// Largest encoded request accepted by the encoder
    pub max_message_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: DEFAULT_PORT,
            user: None,
            connect_timeout_ms: 5_000,
            io_timeout_ms: None,
            script_chunk_size: DEFAULT_CHUNK_SIZE,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the config file (if any) and the environment.
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::conf_file() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Environment variables override file values
    fn apply_env(&mut self) {
        if let Some(server) = env::server() {
            self.server = Some(server);
        }
        if let Some(port) = env::port() {
            self.port = port;
        }
        if let Some(user) = env::user() {
            self.user = Some(user);
        }
        if let Some(timeout) = env::timeout_connect_ms() {
            self.connect_timeout_ms = timeout.as_millis() as u64;
        }
        if let Some(timeout) = env::timeout_io_ms() {
            self.io_timeout_ms = Some(timeout.as_millis() as u64);
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Acting user: configured user, else the login name
    pub fn resolve_user(&self) -> Result<String, ConfigError> {
        self.user
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(env::login_name)
            .ok_or(ConfigError::NoUser)
    }
}

/// Host and port of a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    /// Parse `host`, `host:port`, or `[v6addr]:port`.
    ///
    /// Returns `None` for an empty host or an unparsable port.
    pub fn parse(address: &str, default_port: u16) -> Option<Self> {
        let address = address.trim();
        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let (host, tail) = rest.split_once(']')?;
            match tail.strip_prefix(':') {
                Some(port) => (host, port.parse().ok()?),
                None if tail.is_empty() => (host, default_port),
                None => return None,
            }
        } else {
            match address.split_once(':') {
                Some((host, port)) if !port.contains(':') => (host, port.parse().ok()?),
                Some(_) => (address, default_port),
                None => (address, default_port),
            }
        };

        if host.is_empty() {
            return None;
        }
        Some(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
