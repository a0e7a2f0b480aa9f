// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reply decoding and validation.
//!
//! Every operation declares a [`Shape`]: the reply discriminants it accepts
//! and how the payload is taken out of an accepted reply. Anything outside
//! the accepted set is a protocol violation.

use bq_protocol::{decode, BatchReply, BatchStatus, ReplyBody, ReplyChoice};
use ReplyChoice::{Commit, Locate, Null, Queue, RdyToCommit, Select, Status, Text};

use crate::connection::ConnectionGuard;
use crate::error::{capture_text, ClientError};

/// Accepted reply discriminants and payload extraction for one operation
pub(crate) struct Shape<T> {
    pub name: &'static str,
    pub accepts: &'static [ReplyChoice],
    /// `None` when an accepted reply carries no payload for this shape
    pub extract: fn(BatchReply) -> Option<T>,
}

fn ack(_: BatchReply) -> Option<()> {
    Some(())
}

fn code(reply: BatchReply) -> Option<i32> {
    Some(reply.code)
}

fn auxcode(reply: BatchReply) -> Option<i32> {
    Some(reply.auxcode)
}

fn location(reply: BatchReply) -> Option<String> {
    match reply.body {
        ReplyBody::Locate { location } => Some(location),
        _ => None,
    }
}

fn queued(reply: BatchReply) -> Option<String> {
    match reply.body {
        ReplyBody::Queue { job_id } => Some(job_id),
        _ => None,
    }
}

fn ready(reply: BatchReply) -> Option<String> {
    match reply.body {
        ReplyBody::RdyToCommit { job_id } => Some(job_id),
        _ => None,
    }
}

fn committed(reply: BatchReply) -> Option<String> {
    match reply.body {
        ReplyBody::Commit { job_id } => Some(job_id),
        _ => None,
    }
}

fn job_ids(reply: BatchReply) -> Option<Vec<String>> {
    match reply.body {
        ReplyBody::Select { job_ids } => Some(job_ids),
        ReplyBody::Null => Some(Vec::new()),
        _ => None,
    }
}

fn status(reply: BatchReply) -> Option<Vec<BatchStatus>> {
    match reply.body {
        ReplyBody::Status { objects } => Some(objects),
        ReplyBody::Null => Some(Vec::new()),
        _ => None,
    }
}

fn text(reply: BatchReply) -> Option<String> {
    match reply.body {
        ReplyBody::Text { text } => Some(text),
        _ => None,
    }
}

/// Plain acknowledgement
pub(crate) const ACK: Shape<()> = Shape {
    name: "ack",
    accepts: &[Null, Text],
    extract: ack,
};

/// Acknowledgement returning the reply status code
pub(crate) const STATUS_CODE: Shape<i32> = Shape {
    name: "status code",
    accepts: &[Null, Text],
    extract: code,
};

/// Acknowledgement returning the auxiliary code
pub(crate) const AUX_CODE: Shape<i32> = Shape {
    name: "aux code",
    accepts: &[Null, Text],
    extract: auxcode,
};

pub(crate) const LOCATION: Shape<String> = Shape {
    name: "location",
    accepts: &[Null, Text, Locate],
    extract: location,
};

pub(crate) const QUEUED: Shape<String> = Shape {
    name: "queued job id",
    accepts: &[Null, Text, Queue],
    extract: queued,
};

pub(crate) const READY: Shape<String> = Shape {
    name: "ready job id",
    accepts: &[Null, Text, RdyToCommit],
    extract: ready,
};

pub(crate) const COMMITTED: Shape<String> = Shape {
    name: "committed job id",
    accepts: &[Null, Text, Commit],
    extract: committed,
};

pub(crate) const JOB_IDS: Shape<Vec<String>> = Shape {
    name: "job id list",
    accepts: &[Null, Text, Select],
    extract: job_ids,
};

pub(crate) const STATUS: Shape<Vec<BatchStatus>> = Shape {
    name: "status list",
    accepts: &[Null, Text, Status],
    extract: status,
};

pub(crate) const TEXT: Shape<String> = Shape {
    name: "text",
    accepts: &[Null, Text],
    extract: text,
};

/// Read exactly one reply and validate it against `shape`.
///
/// A read or decode failure closes the connection.
pub(crate) fn read_reply<T>(
    guard: &mut ConnectionGuard<'_>,
    op: &'static str,
    shape: &Shape<T>,
) -> Result<T, ClientError> {
    let bytes = guard.receive().map_err(|e| guard.abort(op, "read", &e))?;
    let reply: BatchReply = decode(&bytes).map_err(|e| guard.abort(op, "decode", &e))?;
    drop(bytes);
    accept(guard, op, reply, shape)
}

/// Owned copy of a server's error text for the connection's last error
fn server_text(
    op: &'static str,
    code: i32,
    text: Option<&str>,
    capture: fn(&str) -> Option<String>,
) -> Option<String> {
    let text = text?;
    let captured = capture(text);
    if captured.is_none() {
        tracing::warn!(op, code, len = text.len(), "server error text not recorded");
    }
    captured
}

/// Validate a decoded reply and move its payload out.
///
/// The reply is consumed on every path.
pub(crate) fn accept<T>(
    guard: &ConnectionGuard<'_>,
    op: &'static str,
    reply: BatchReply,
    shape: &Shape<T>,
) -> Result<T, ClientError> {
    let choice = reply.body.choice();
    if !shape.accepts.contains(&choice) {
        tracing::warn!(op, %choice, expected = shape.name, "unexpected reply choice");
        return Err(guard.violation(&format!("{}: unexpected reply choice {}", op, choice)));
    }

    if reply.code != 0 {
        let message = match reply.body {
            ReplyBody::Text { text } => Some(text),
            _ => None,
        };
        guard.record(
            reply.code,
            server_text(op, reply.code, message.as_deref(), capture_text),
        );
        tracing::debug!(op, code = reply.code, "server reported error");
        return Err(ClientError::Server {
            code: reply.code,
            message,
        });
    }

    match (shape.extract)(reply) {
        Some(payload) => Ok(payload),
        None => {
            tracing::warn!(op, %choice, expected = shape.name, "reply carried no payload");
            Err(guard.violation(&format!("{}: {} reply carried no {}", op, choice, shape.name)))
        }
    }
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
