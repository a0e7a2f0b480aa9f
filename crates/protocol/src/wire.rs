// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format encoding/decoding for batch requests and replies.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

use std::io::{ErrorKind, Read, Write};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{BatchReply, BatchRequest};

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout")]
    Timeout,

    #[error("Script chunk out of order: expected {expected}, got {got}")]
    ScriptOutOfOrder { expected: u32, got: u32 },
}

/// Maximum message size (200 MB)
pub const MAX_MESSAGE_SIZE: usize = 200 * 1024 * 1024;

/// Encode a message to JSON bytes (without length prefix)
///
/// Use with `write_message()` which handles the length-prefix wire format.
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    encode_with_limit(msg, MAX_MESSAGE_SIZE)
}

/// Encode a message, rejecting payloads larger than `max` bytes
pub fn encode_with_limit<T: Serialize>(msg: &T, max: usize) -> Result<Vec<u8>, ProtocolError> {
    let json = serde_json::to_vec(msg)?;

    if json.len() > max {
        return Err(ProtocolError::MessageTooLarge {
            size: json.len(),
            max,
        });
    }

    Ok(json)
}

/// Decode a message from wire format
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn map_read_error(e: std::io::Error) -> ProtocolError {
    match e.kind() {
        ErrorKind::UnexpectedEof => ProtocolError::ConnectionClosed,
        ErrorKind::WouldBlock | ErrorKind::TimedOut => ProtocolError::Timeout,
        _ => ProtocolError::Io(e),
    }
}

/// Read a length-prefixed message from a blocking reader
pub fn read_message<R: Read>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    // Read length prefix
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).map_err(map_read_error)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    // Read payload
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(map_read_error)?;
    Ok(buf)
}

/// Write a length-prefixed message to a blocking writer and flush it
pub fn write_message<W: Write>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError> {
    let len = data.len();
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    writer.write_all(&(len as u32).to_be_bytes())?;
    writer.write_all(data)?;
    writer.flush()?;
    Ok(())
}

/// Read and decode one request (server side)
pub fn read_request<R: Read>(reader: &mut R) -> Result<BatchRequest, ProtocolError> {
    let bytes = read_message(reader)?;
    decode(&bytes)
}

/// Encode and write one reply (server side)
pub fn write_reply<W: Write>(writer: &mut W, reply: &BatchReply) -> Result<(), ProtocolError> {
    let data = encode(reply)?;
    write_message(writer, &data)
}

/// Read and decode one reply (client side)
pub fn read_reply<R: Read>(reader: &mut R) -> Result<BatchReply, ProtocolError> {
    let bytes = read_message(reader)?;
    decode(&bytes)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
