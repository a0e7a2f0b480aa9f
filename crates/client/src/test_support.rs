// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory server double for exercising the RPC cycle without sockets
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use bq_protocol::{
    decode, encode, BatchReply, BatchRequest, ProtocolError, ReplyBody, RequestBody,
};
use parking_lot::Mutex;

use crate::transport::Transport;

/// What the fake server does in response to one request
#[derive(Debug, Clone)]
pub enum Step {
    /// Send this reply
    Reply(BatchReply),
    /// Send these bytes as the reply frame
    Raw(Vec<u8>),
    /// Fail the client's read with a reset
    FailRead,
}

type Handler = Box<dyn FnMut(&BatchRequest) -> BatchReply + Send>;

#[derive(Default)]
struct FakeServerState {
    requests: Vec<BatchRequest>,
    frames_written: usize,
    bytes_written: usize,
    scripted: VecDeque<Step>,
    handler: Option<Handler>,
    outbox: VecDeque<Step>,
    fail_writes: bool,
    read_delay: Option<Duration>,
    shutdowns: usize,
}

/// Fake batch server.
///
/// Requests written to a [`FakeTransport`] are decoded and recorded. Each one
/// that expects a reply takes the next scripted [`Step`], else the handler's
/// reply, else a plain `Null` acknowledgement.
#[derive(Clone, Default)]
pub struct FakeServer {
    inner: Arc<Mutex<FakeServerState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport connected to this server
    pub fn transport(&self) -> Box<dyn Transport> {
        Box::new(FakeTransport {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Queue a reply for the next request
    pub fn reply(&self, reply: BatchReply) -> &Self {
        self.inner.lock().scripted.push_back(Step::Reply(reply));
        self
    }

    /// Queue a reply body with a zero code
    pub fn reply_body(&self, body: ReplyBody) -> &Self {
        self.reply(BatchReply::ok(body))
    }

    /// Queue an arbitrary step for the next request
    pub fn step(&self, step: Step) -> &Self {
        self.inner.lock().scripted.push_back(step);
        self
    }

    /// Answer requests with `handler` once scripted steps run out
    pub fn handle_with(
        &self,
        handler: impl FnMut(&BatchRequest) -> BatchReply + Send + 'static,
    ) -> &Self {
        self.inner.lock().handler = Some(Box::new(handler));
        self
    }

    /// Make every write fail with a broken pipe
    pub fn fail_writes(&self, fail: bool) -> &Self {
        self.inner.lock().fail_writes = fail;
        self
    }

    /// Sleep this long before each reply is delivered
    pub fn delay_replies(&self, delay: Duration) -> &Self {
        self.inner.lock().read_delay = Some(delay);
        self
    }

    /// All requests received, in order
    pub fn requests(&self) -> Vec<BatchRequest> {
        self.inner.lock().requests.clone()
    }

    /// Requests received, skipping the initial connect
    pub fn calls(&self) -> Vec<BatchRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.header.command != bq_protocol::Command::Connect)
            .collect()
    }

    pub fn last_request(&self) -> Option<BatchRequest> {
        self.inner.lock().requests.last().cloned()
    }

    pub fn bytes_written(&self) -> usize {
        self.inner.lock().bytes_written
    }

    pub fn frames_written(&self) -> usize {
        self.inner.lock().frames_written
    }

    /// Replies produced but not yet read by the client
    pub fn pending_replies(&self) -> usize {
        self.inner.lock().outbox.len()
    }

    pub fn shutdowns(&self) -> usize {
        self.inner.lock().shutdowns
    }

    /// Reassembled script bytes from all `JobScript` requests received
    pub fn script(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut assembler = bq_protocol::ScriptAssembler::new();
        for request in self.inner.lock().requests.iter() {
            if let RequestBody::JobScript { seq, data, .. } = &request.body {
                assembler.push(*seq, data)?;
            }
        }
        Ok(assembler.finish())
    }
}

/// Client side of a [`FakeServer`]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeServerState>>,
}

impl Transport for FakeTransport {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), ProtocolError> {
        let mut state = self.inner.lock();
        if state.fail_writes {
            return Err(ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "fake server write failure",
            )));
        }
        state.frames_written += 1;
        state.bytes_written += frame.len();

        let request: BatchRequest = decode(frame)?;
        let expects_reply = request.header.command.expects_reply();
        state.requests.push(request.clone());
        if !expects_reply {
            return Ok(());
        }

        let step = match state.scripted.pop_front() {
            Some(step) => step,
            None => match state.handler.as_mut() {
                Some(handler) => Step::Reply(handler(&request)),
                None => Step::Reply(BatchReply::ok(ReplyBody::Null)),
            },
        };
        state.outbox.push_back(step);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let delay = self.inner.lock().read_delay;
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let step = self.inner.lock().outbox.pop_front();
        match step {
            Some(Step::Reply(reply)) => encode(&reply),
            Some(Step::Raw(bytes)) => Ok(bytes),
            Some(Step::FailRead) => Err(ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "fake server read failure",
            ))),
            None => Err(ProtocolError::ConnectionClosed),
        }
    }

    fn shutdown(&mut self) {
        self.inner.lock().shutdowns += 1;
    }
}
