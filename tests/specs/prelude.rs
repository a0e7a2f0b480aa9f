//! Test helpers for behavioral specifications.
//!
//! Provides clients bound to fake servers, both in-memory and over TCP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bq_client::{Client, ClientConfig, ConnectionHandle, Context, FakeServer};
use bq_protocol::{read_request, write_reply, BatchReply, BatchRequest, ReplyBody};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Route client logs to the test harness (honors RUST_LOG)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client acting as `alice` with default settings
pub fn client() -> Client {
    client_with(ClientConfig::default())
}

pub fn client_with(config: ClientConfig) -> Client {
    init_tracing();
    Client::new(ClientConfig {
        user: Some("alice".to_string()),
        ..config
    })
}

/// Connect `ctx` to an in-memory server
pub fn connect_fake(ctx: &Context, server: &FakeServer) -> ConnectionHandle {
    ctx.connect_with_transport("fake", server.transport(), None).unwrap()
}

/// Poll `condition` until it holds or `timeout_ms` passes
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

type Handler = dyn Fn(&BatchRequest) -> BatchReply + Send + Sync;

/// Batch server on a loopback TCP port.
///
/// Each accepted connection is served on its own thread until the client
/// hangs up. Requests are recorded in arrival order.
pub struct TcpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<BatchRequest>>>,
    hangups: Arc<Mutex<usize>>,
}

impl TcpServer {
    /// Start a server answering every request with `Null`
    pub fn start() -> Self {
        Self::with_handler(|_| BatchReply::ok(ReplyBody::Null))
    }

    pub fn with_handler(
        handler: impl Fn(&BatchRequest) -> BatchReply + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let hangups = Arc::new(Mutex::new(0));
        let handler: Arc<Handler> = Arc::new(handler);

        let accepted_requests = Arc::clone(&requests);
        let accepted_hangups = Arc::clone(&hangups);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let requests = Arc::clone(&accepted_requests);
                let hangups = Arc::clone(&accepted_hangups);
                let handler = Arc::clone(&handler);
                std::thread::spawn(move || {
                    serve(stream, &*handler, &requests);
                    *hangups.lock().unwrap() += 1;
                });
            }
        });

        Self {
            addr,
            requests,
            hangups,
        }
    }

    /// `host:port` string accepted by `Context::connect`
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn requests(&self) -> Vec<BatchRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Connections the client has closed
    pub fn hangups(&self) -> usize {
        *self.hangups.lock().unwrap()
    }
}

fn serve(stream: TcpStream, handler: &Handler, requests: &Mutex<Vec<BatchRequest>>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(stream);

    while let Ok(request) = read_request(&mut reader) {
        let expects_reply = request.header.command.expects_reply();
        let reply = handler(&request);
        requests.lock().unwrap().push(request);
        if expects_reply && write_reply(&mut writer, &reply).is_err() {
            break;
        }
    }
}
