// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch reply envelope

use serde::{Deserialize, Serialize};

use crate::BatchStatus;

/// Reply from server to client.
///
/// `code` is zero on success; a non-zero code is the server's own error and
/// usually comes with a `Text` body describing it. `auxcode` carries an
/// auxiliary integer (task exit value for py-spawn).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReply {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub auxcode: i32,
    pub body: ReplyBody,
}

impl BatchReply {
    pub fn ok(body: ReplyBody) -> Self {
        Self {
            code: 0,
            auxcode: 0,
            body,
        }
    }

    /// Error reply with a `Text` body
    pub fn error(code: i32, text: impl Into<String>) -> Self {
        Self {
            code,
            auxcode: 0,
            body: ReplyBody::Text { text: text.into() },
        }
    }

    pub fn with_auxcode(mut self, auxcode: i32) -> Self {
        self.auxcode = auxcode;
        self
    }

    /// Diagnostic text carried by the reply, if any
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ReplyBody::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Discriminant-specific reply payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice")]
pub enum ReplyBody {
    Null,
    Queue { job_id: String },
    RdyToCommit { job_id: String },
    Commit { job_id: String },
    Select { job_ids: Vec<String> },
    Status { objects: Vec<BatchStatus> },
    Text { text: String },
    Locate { location: String },
}

/// Payload-free discriminant of a [`ReplyBody`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyChoice {
    Null,
    Queue,
    RdyToCommit,
    Commit,
    Select,
    Status,
    Text,
    Locate,
}

impl ReplyBody {
    pub fn choice(&self) -> ReplyChoice {
        match self {
            ReplyBody::Null => ReplyChoice::Null,
            ReplyBody::Queue { .. } => ReplyChoice::Queue,
            ReplyBody::RdyToCommit { .. } => ReplyChoice::RdyToCommit,
            ReplyBody::Commit { .. } => ReplyChoice::Commit,
            ReplyBody::Select { .. } => ReplyChoice::Select,
            ReplyBody::Status { .. } => ReplyChoice::Status,
            ReplyBody::Text { .. } => ReplyChoice::Text,
            ReplyBody::Locate { .. } => ReplyChoice::Locate,
        }
    }
}

impl std::fmt::Display for ReplyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
