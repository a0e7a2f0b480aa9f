// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client error taxonomy

use bq_protocol::ProtocolError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::table::ConnectionHandle;

/// Numeric error codes reported alongside a [`ClientError`]
pub mod codes {
    /// Arguments failed a precondition check
    pub const INVALID_REQUEST: i32 = 15004;
    /// Local resource exhaustion
    pub const SYSTEM: i32 = 15010;
    /// Wire-level failure
    pub const PROTOCOL: i32 = 15031;
    /// Handle does not name a live connection
    pub const NO_CONNECTION: i32 = 15033;
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid connection handle: {0}")]
    InvalidConnection(ConnectionHandle),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("System error: {0}")]
    System(String),

    #[error("Server error {code}: {}", message.as_deref().unwrap_or("(no message)"))]
    Server { code: i32, message: Option<String> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn invalid(what: &str) -> Self {
        ClientError::InvalidRequest(what.to_string())
    }

    /// Numeric code for this error; server errors carry the server's code.
    pub fn code(&self) -> i32 {
        match self {
            ClientError::InvalidRequest(_) => codes::INVALID_REQUEST,
            ClientError::InvalidConnection(_) => codes::NO_CONNECTION,
            ClientError::Protocol(_) => codes::PROTOCOL,
            ClientError::System(_) | ClientError::Config(_) => codes::SYSTEM,
            ClientError::Server { code, .. } => *code,
        }
    }

    /// Whether the failure happened on the wire or in the local environment
    /// after the request was under way (as opposed to validation or lookup).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Protocol(_) | ClientError::System(_))
    }
}

/// Fixed description for each wire failure.
///
/// Kept static so that reporting the failure needs exactly one fallible
/// allocation: the owned copy handed to the connection.
pub(crate) fn describe(err: &ProtocolError) -> &'static str {
    match err {
        ProtocolError::Io(_) => "transport I/O failure",
        ProtocolError::Json(_) => "malformed message",
        ProtocolError::MessageTooLarge { .. } => "message exceeds maximum size",
        ProtocolError::ConnectionClosed => "connection closed by server",
        ProtocolError::Timeout => "transport timed out",
        ProtocolError::ScriptOutOfOrder { .. } => "script chunk out of order",
    }
}

/// Reserve an owned buffer for `len` bytes of diagnostic text.
///
/// Returns `None` instead of aborting when the allocation cannot be made.
pub(crate) fn reserve_text(len: usize) -> Option<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(len).ok()?;
    Some(owned)
}

/// Copy `text` into a freshly owned string, or `None` if that allocation fails.
pub(crate) fn capture_text(text: &str) -> Option<String> {
    let mut owned = reserve_text(text.len())?;
    owned.push_str(text);
    Some(owned)
}

/// Error for a wire step given the outcome of capturing its description.
///
/// A failed capture escalates to `System`: the environment cannot even
/// report the protocol failure reliably.
pub(crate) fn wire_error(captured: Option<&String>) -> ClientError {
    match captured {
        Some(text) => ClientError::Protocol(text.clone()),
        None => ClientError::System("unable to record error text".to_string()),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
