// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client handle, per-thread context, and the request/reply cycle

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::Arc;

use bq_protocol::{Command, RequestBody};

use crate::config::{ClientConfig, ServerAddress};
use crate::connection::{Connection, ConnectionGuard};
use crate::decode::{self, Shape};
use crate::encode::{self, Call};
use crate::error::ClientError;
use crate::table::{ConnectionHandle, ConnectionTable};
use crate::transport::{TcpTransport, Transport};

/// Shared client state: configuration and the connection table.
///
/// Cheap to clone; every clone sees the same connections.
#[derive(Clone)]
pub struct Client {
    table: Arc<ConnectionTable>,
    config: Arc<ClientConfig>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            table: Arc::new(ConnectionTable::new()),
            config: Arc::new(config),
        }
    }

    /// Client configured from the config file and environment
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(ClientConfig::load()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn table(&self) -> &ConnectionTable {
        &self.table
    }

    /// Create the calling thread's context.
    ///
    /// Resolves the acting user once. Creating more than one context per
    /// thread is harmless.
    pub fn context(&self) -> Result<Context, ClientError> {
        let user = self.config.resolve_user()?;
        Ok(Context {
            table: Arc::clone(&self.table),
            config: Arc::clone(&self.config),
            user,
            _not_sync: PhantomData,
        })
    }
}

/// Per-thread calling context.
///
/// Every remote operation is a method on `Context`. It can be moved to
/// another thread but not shared between threads; give each thread its own.
pub struct Context {
    table: Arc<ConnectionTable>,
    config: Arc<ClientConfig>,
    user: String,
    _not_sync: PhantomData<Cell<()>>,
}

impl Context {
    /// User named in every request header
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Server used for an empty address
    pub fn default_server(&self) -> Option<String> {
        self.config.server.clone()
    }

    /// Open a TCP connection to `server` and send the connect request.
    ///
    /// `server` is `host`, `host:port`, or empty for the default server.
    pub fn connect(
        &self,
        server: &str,
        extend: Option<&str>,
    ) -> Result<ConnectionHandle, ClientError> {
        let server = match server.trim() {
            "" => self.default_server().ok_or_else(|| {
                ClientError::invalid("no server given and no default server configured")
            })?,
            named => named.to_string(),
        };
        let address = ServerAddress::parse(&server, self.config.port).ok_or_else(|| {
            ClientError::InvalidRequest(format!("invalid server address: {}", server))
        })?;

        let transport = TcpTransport::connect(
            &address,
            self.config.connect_timeout(),
            self.config.io_timeout(),
        )
        .map_err(|e| {
            tracing::error!(server = %address, error = %e, "connect failed");
            ClientError::Protocol(format!("cannot connect to {}: {}", address, e))
        })?;

        self.connect_with_transport(&address.to_string(), Box::new(transport), extend)
    }

    /// Register an already open transport and send the connect request.
    ///
    /// The connection is dropped again if the server rejects the request.
    pub fn connect_with_transport(
        &self,
        server: &str,
        transport: Box<dyn Transport>,
        extend: Option<&str>,
    ) -> Result<ConnectionHandle, ClientError> {
        let handle = self.table.insert(server, transport)?;
        let call = Call::new("connect", Command::Connect, RequestBody::Empty).extend(extend);
        match self.transact(handle, call, &decode::ACK) {
            Ok(()) => {
                tracing::info!(%handle, server, user = %self.user, "connected");
                Ok(handle)
            }
            Err(e) => {
                if let Some(conn) = self.table.remove(handle) {
                    conn.lock().close();
                }
                Err(e)
            }
        }
    }

    /// Send the disconnect request, close the transport, and forget the handle.
    ///
    /// The disconnect request is best effort; the handle is released even if
    /// it cannot be delivered.
    pub fn disconnect(&self, handle: ConnectionHandle) -> Result<(), ClientError> {
        let conn = self.table.get(handle)?;
        {
            let mut guard = conn.lock();
            if !guard.is_closed() {
                let call = Call::new("disconnect", Command::Disconnect, RequestBody::Empty);
                if let Err(e) =
                    encode::write_request(&mut guard, &self.user, call, self.config.max_message_size)
                {
                    tracing::debug!(%handle, error = %e, "disconnect request not delivered");
                }
                guard.close();
            }
        }
        self.table.remove(handle);
        tracing::info!(%handle, server = conn.server(), "disconnected");
        Ok(())
    }

    /// Last error text recorded on `handle`.
    ///
    /// Best effort: a concurrent call on the same handle may replace it.
    pub fn last_error_message(&self, handle: ConnectionHandle) -> Option<String> {
        self.table.get(handle).ok()?.last_error().text
    }

    /// Last error code recorded on `handle`; zero after a successful call.
    pub fn last_error_code(&self, handle: ConnectionHandle) -> Option<i32> {
        Some(self.table.get(handle).ok()?.last_error().code)
    }

    /// Take the connection's lock, refusing a connection already closed.
    pub(crate) fn acquire<'c>(
        &self,
        conn: &'c Connection,
    ) -> Result<ConnectionGuard<'c>, ClientError> {
        let guard = conn.lock();
        if guard.is_closed() {
            return Err(ClientError::InvalidConnection(conn.handle()));
        }
        Ok(guard)
    }

    /// Run one full request/reply cycle on `handle`.
    pub(crate) fn transact<T>(
        &self,
        handle: ConnectionHandle,
        call: Call<'_>,
        shape: &Shape<T>,
    ) -> Result<T, ClientError> {
        self.with_connection(handle, |guard| self.cycle(guard, call, shape))
    }

    /// Hold `handle` for the duration of `f`, which may run several cycles.
    pub(crate) fn with_connection<T>(
        &self,
        handle: ConnectionHandle,
        f: impl FnOnce(&mut ConnectionGuard<'_>) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let conn = self.table.get(handle)?;
        let mut guard = self.acquire(&conn)?;
        f(&mut guard)
    }

    /// Request/reply cycle on an already held connection
    pub(crate) fn cycle<T>(
        &self,
        guard: &mut ConnectionGuard<'_>,
        call: Call<'_>,
        shape: &Shape<T>,
    ) -> Result<T, ClientError> {
        let op = call.op;
        tracing::debug!(op, handle = %guard.handle(), command = %call.command, "request");
        guard.clear_error();
        encode::write_request(guard, &self.user, call, self.config.max_message_size)?;
        decode::read_reply(guard, op, shape)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
