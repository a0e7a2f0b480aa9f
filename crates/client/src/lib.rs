// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! bq-client: blocking RPC client for the batch server
//!
//! Create a [`Client`], take a [`Context`] per thread, and call operations on
//! connection handles obtained from [`Context::connect`].

pub mod config;
pub mod connection;
pub mod context;
mod decode;
mod encode;
mod env;
pub mod error;
mod ops_admin;
mod ops_job;
mod ops_stat;
pub mod table;
pub mod transport;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ClientConfig, ConfigError, ServerAddress, DEFAULT_PORT};
pub use connection::{Connection, LastError, LockStats};
pub use context::{Client, Context};
pub use error::{codes, ClientError};
pub use ops_job::{DEFAULT_HOLD_TYPE, HOLD_TYPES};
pub use table::{ConnectionHandle, ConnectionTable};
pub use transport::{TcpTransport, Transport};

pub use bq_protocol::{
    Attribute, BatchOp, BatchStatus, FileOption, ManagerCommand, ObjectType, ShutdownManner,
};

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{FakeServer, FakeTransport, Step};
