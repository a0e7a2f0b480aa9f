// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connection state and lock discipline.
//!
//! A [`Connection`] owns its transport behind a mutex. Holding a
//! [`ConnectionGuard`] is the only way to write a request or read a reply, so
//! at most one request/reply cycle is in flight per connection. The guard
//! releases the lock when dropped, on every exit path.

use std::sync::atomic::{AtomicU64, Ordering};

use bq_protocol::ProtocolError;
use parking_lot::{Mutex, MutexGuard};

use crate::error::{capture_text, describe, wire_error, ClientError};
use crate::table::ConnectionHandle;
use crate::transport::Transport;

/// Last error recorded on a connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastError {
    /// Zero when the last call succeeded
    pub code: i32,
    pub text: Option<String>,
}

/// Lock acquisition counters for one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStats {
    pub acquired: u64,
    pub released: u64,
}

impl LockStats {
    pub fn is_balanced(&self) -> bool {
        self.acquired == self.released
    }
}

struct Channel {
    transport: Box<dyn Transport>,
    closed: bool,
}

/// One live client-to-server session
pub struct Connection {
    handle: ConnectionHandle,
    server: String,
    channel: Mutex<Channel>,
    // Written only while `channel` is held; read without it.
    last_error: Mutex<LastError>,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl Connection {
    pub(crate) fn new(
        handle: ConnectionHandle,
        server: String,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            handle,
            server,
            channel: Mutex::new(Channel {
                transport,
                closed: false,
            }),
            last_error: Mutex::new(LastError::default()),
            acquired: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    pub fn handle(&self) -> ConnectionHandle {
        self.handle
    }

    /// Server this connection was opened to
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Block until the connection is free, then hold it until the guard drops.
    ///
    /// Acquiring twice on the same thread deadlocks.
    pub fn lock(&self) -> ConnectionGuard<'_> {
        let channel = self.channel.lock();
        self.acquired.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            conn: self,
            channel,
        }
    }

    /// Whether some thread currently holds the connection
    pub fn is_locked(&self) -> bool {
        self.channel.is_locked()
    }

    pub fn lock_stats(&self) -> LockStats {
        LockStats {
            acquired: self.acquired.load(Ordering::SeqCst),
            released: self.released.load(Ordering::SeqCst),
        }
    }

    /// Snapshot of the last error.
    ///
    /// Best effort: a concurrent call on the same connection may replace it
    /// at any moment.
    pub fn last_error(&self) -> LastError {
        self.last_error.lock().clone()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("handle", &self.handle)
            .field("server", &self.server)
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Exclusive hold on a connection for one request/reply cycle
pub struct ConnectionGuard<'a> {
    conn: &'a Connection,
    channel: MutexGuard<'a, Channel>,
}

impl ConnectionGuard<'_> {
    pub fn handle(&self) -> ConnectionHandle {
        self.conn.handle
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.channel.closed
    }

    /// Write one frame and flush it
    pub(crate) fn send(&mut self, frame: &[u8]) -> Result<(), ProtocolError> {
        self.channel.transport.write_frame(frame)
    }

    /// Block until one reply frame arrives
    pub(crate) fn receive(&mut self) -> Result<Vec<u8>, ProtocolError> {
        self.channel.transport.read_frame()
    }

    /// Shut the transport down; later holders see the connection as closed.
    pub(crate) fn close(&mut self) {
        if !self.channel.closed {
            self.channel.transport.shutdown();
            self.channel.closed = true;
        }
    }

    /// Overwrite the connection's last error
    pub(crate) fn record(&self, code: i32, text: Option<String>) {
        *self.conn.last_error.lock() = LastError { code, text };
    }

    pub(crate) fn clear_error(&self) {
        self.record(0, None);
    }

    /// Record a failed wire step and build the error returned to the caller.
    pub(crate) fn fail(
        &self,
        op: &'static str,
        stage: &'static str,
        err: &ProtocolError,
    ) -> ClientError {
        tracing::error!(op, stage, handle = %self.conn.handle, error = %err, "wire failure");
        let captured = capture_text(describe(err));
        let error = wire_error(captured.as_ref());
        self.record(error.code(), captured);
        error
    }

    /// Record a failure that leaves the stream out of step, then close.
    ///
    /// A reply may still be owed or half read, so the connection cannot
    /// carry another request.
    pub(crate) fn abort(
        &mut self,
        op: &'static str,
        stage: &'static str,
        err: &ProtocolError,
    ) -> ClientError {
        let error = self.fail(op, stage, err);
        self.close();
        error
    }

    /// Record a reply that does not fit the operation and build the error.
    pub(crate) fn violation(&self, detail: &str) -> ClientError {
        let captured = capture_text(detail);
        let error = wire_error(captured.as_ref());
        self.record(error.code(), captured);
        error
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        self.conn.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
