// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job script framing.
//!
//! A script is sent as a sequence of `JobScript` requests, each carrying a
//! sequence number and a chunk of bytes. The receiver appends chunks in
//! sequence order and ends up with the exact original byte string no matter
//! where the sender chose to cut.

use crate::{ProtocolError, RequestBody};

/// Default chunk size for script frames (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Split a script into `JobScript` request bodies of at most `chunk_size` bytes.
///
/// An empty script produces no frames. A `chunk_size` of zero is treated as 1.
pub fn script_frames<'a>(
    job_id: &'a str,
    script: &'a [u8],
    chunk_size: usize,
) -> impl Iterator<Item = RequestBody> + 'a {
    script
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(move |(seq, chunk)| RequestBody::JobScript {
            job_id: job_id.to_string(),
            seq: seq as u32,
            data: chunk.to_vec(),
        })
}

/// Reassembles a script from its frames on the receiving side.
#[derive(Debug, Default)]
pub struct ScriptAssembler {
    next_seq: u32,
    data: Vec<u8>,
}

impl ScriptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the chunk with sequence number `seq`.
    ///
    /// Chunks must arrive in order starting at zero.
    pub fn push(&mut self, seq: u32, chunk: &[u8]) -> Result<(), ProtocolError> {
        if seq != self.next_seq {
            return Err(ProtocolError::ScriptOutOfOrder {
                expected: self.next_seq,
                got: seq,
            });
        }
        self.data.extend_from_slice(chunk);
        self.next_seq += 1;
        Ok(())
    }

    /// Number of chunks accepted so far
    pub fn chunks(&self) -> u32 {
        self.next_seq
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
