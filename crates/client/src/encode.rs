// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request validation and encoding

use bq_protocol::{encode_with_limit, BatchRequest, Command, RequestBody, RequestHeader};

use crate::connection::ConnectionGuard;
use crate::error::ClientError;

/// One request to be sent: operation name, command code, body, extend string
pub(crate) struct Call<'a> {
    /// Operation name used in logs and error text
    pub op: &'static str,
    pub command: Command,
    pub body: RequestBody,
    pub extend: Option<&'a str>,
}

impl<'a> Call<'a> {
    pub fn new(op: &'static str, command: Command, body: RequestBody) -> Self {
        Self {
            op,
            command,
            body,
            extend: None,
        }
    }

    pub fn extend(mut self, extend: Option<&'a str>) -> Self {
        self.extend = extend;
        self
    }
}

/// Reject a missing or empty required string argument
pub(crate) fn require<'a>(value: &'a str, what: &str) -> Result<&'a str, ClientError> {
    if value.is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} is required", what)));
    }
    Ok(value)
}

/// Encode `call` behind a header for `user` and flush it on the connection.
///
/// Failures are recorded on the connection and no reply is read. A failed
/// flush closes the connection.
pub(crate) fn write_request(
    guard: &mut ConnectionGuard<'_>,
    user: &str,
    call: Call<'_>,
    max_message_size: usize,
) -> Result<(), ClientError> {
    let op = call.op;
    let request = BatchRequest::new(RequestHeader::new(call.command, user), call.body, call.extend);

    let frame =
        encode_with_limit(&request, max_message_size).map_err(|e| guard.fail(op, "encode", &e))?;
    guard.send(&frame).map_err(|e| guard.abort(op, "flush", &e))
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
