// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bq-protocol: batch request/reply types and wire framing
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

pub mod attribute;
pub mod command;
pub mod reply;
pub mod request;
pub mod script;
pub mod wire;

pub use attribute::{Attribute, BatchOp, BatchStatus};
pub use command::{Command, UnknownCommand};
pub use reply::{BatchReply, ReplyBody, ReplyChoice};
pub use request::{
    BatchRequest, FileOption, ManagerCommand, ObjectType, RequestBody, RequestHeader,
    ShutdownManner, PROTOCOL_REVISION, PROTOCOL_TYPE,
};
pub use script::{script_frames, ScriptAssembler, DEFAULT_CHUNK_SIZE};
pub use wire::{
    decode, encode, encode_with_limit, read_message, read_reply, read_request, write_message,
    write_reply, ProtocolError, MAX_MESSAGE_SIZE,
};
