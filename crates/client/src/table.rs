// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of live connections keyed by handle

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::transport::Transport;

/// Opaque, non-negative identifier of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionHandle(pub i32);

impl std::fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection table.
///
/// Lookups take a shared read lock only long enough to clone the `Arc`, so
/// calls on distinct handles never contend beyond that. Handles are not
/// reused for the lifetime of the table.
#[derive(Default)]
pub struct ConnectionTable {
    connections: RwLock<HashMap<ConnectionHandle, Arc<Connection>>>,
    next: AtomicI32,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport and return its handle
    pub fn insert(
        &self,
        server: impl Into<String>,
        transport: Box<dyn Transport>,
    ) -> Result<ConnectionHandle, ClientError> {
        let id = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(|_| ClientError::System("connection handles exhausted".to_string()))?;
        let handle = ConnectionHandle(id);
        let conn = Arc::new(Connection::new(handle, server.into(), transport));
        self.connections.write().insert(handle, conn);
        Ok(handle)
    }

    /// Look up a live connection
    pub fn get(&self, handle: ConnectionHandle) -> Result<Arc<Connection>, ClientError> {
        self.connections
            .read()
            .get(&handle)
            .cloned()
            .ok_or(ClientError::InvalidConnection(handle))
    }

    pub fn remove(&self, handle: ConnectionHandle) -> Option<Arc<Connection>> {
        self.connections.write().remove(&handle)
    }

    pub fn contains(&self, handle: ConnectionHandle) -> bool {
        self.connections.read().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of all live connections, sorted
    pub fn handles(&self) -> Vec<ConnectionHandle> {
        let mut handles: Vec<_> = self.connections.read().keys().copied().collect();
        handles.sort();
        handles
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
