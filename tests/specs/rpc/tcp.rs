//! End-to-end over a real TCP socket.

use bq_client::{Attribute, ClientConfig, ClientError};
use bq_protocol::{BatchReply, Command, ReplyBody, RequestBody, ScriptAssembler};

use crate::prelude::*;

fn batch_server() -> TcpServer {
    TcpServer::with_handler(|request| match (&request.header.command, &request.body) {
        (Command::LocateJob, RequestBody::JobId { job_id }) if job_id == "gone.server" => {
            BatchReply::error(15001, "Unknown Job Id gone.server")
        }
        (Command::LocateJob, _) => BatchReply::ok(ReplyBody::Locate {
            location: "node07".to_string(),
        }),
        (Command::QueueJob, _) => BatchReply::ok(ReplyBody::Queue {
            job_id: "77.server".to_string(),
        }),
        (Command::RdyToCommit, RequestBody::JobId { job_id }) => {
            BatchReply::ok(ReplyBody::RdyToCommit {
                job_id: job_id.clone(),
            })
        }
        (Command::Commit, RequestBody::JobId { job_id }) => BatchReply::ok(ReplyBody::Commit {
            job_id: job_id.clone(),
        }),
        (Command::SelectJobs, _) => BatchReply::ok(ReplyBody::Select {
            job_ids: vec!["1.server".to_string(), "2.server".to_string()],
        }),
        _ => BatchReply::ok(ReplyBody::Null),
    })
}

#[test]
fn connect_call_and_disconnect_over_tcp() {
    let server = batch_server();
    let client = client_with(ClientConfig {
        io_timeout_ms: Some(5_000),
        ..ClientConfig::default()
    });
    let ctx = client.context().unwrap();

    let handle = ctx.connect(&server.address(), Some("bq-specs")).unwrap();
    assert_eq!(ctx.locate_job(handle, "5.server", None).unwrap(), "node07");
    assert_eq!(
        ctx.select_jobs(handle, &[], None).unwrap(),
        vec!["1.server".to_string(), "2.server".to_string()]
    );
    ctx.disconnect(handle).unwrap();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || server.hangups() == 1));
    let commands: Vec<Command> = server
        .requests()
        .iter()
        .map(|r| r.header.command)
        .collect();
    similar_asserts::assert_eq!(
        commands,
        vec![
            Command::Connect,
            Command::LocateJob,
            Command::SelectJobs,
            Command::Disconnect,
        ]
    );
    let connect = &server.requests()[0];
    assert_eq!(connect.header.user, "alice");
    assert_eq!(connect.extend.as_deref(), Some("bq-specs"));
    assert!(client.table().is_empty());
}

#[test]
fn submit_over_tcp_delivers_the_exact_script() {
    let server = batch_server();
    let client = client_with(ClientConfig {
        script_chunk_size: 100,
        ..ClientConfig::default()
    });
    let ctx = client.context().unwrap();
    let handle = ctx.connect(&server.address(), None).unwrap();
    let script = "#!/bin/sh\n".to_string() + &"echo line\n".repeat(300);

    let job_id = ctx
        .submit(
            handle,
            &[Attribute::new("Job_Name", "lines")],
            script.as_bytes(),
            "workq",
            None,
        )
        .unwrap();

    assert_eq!(job_id, "77.server");
    let mut assembler = ScriptAssembler::new();
    for request in server.requests() {
        if let RequestBody::JobScript { job_id, seq, data } = request.body {
            assert_eq!(job_id, "77.server");
            assembler.push(seq, &data).unwrap();
        }
    }
    assert_eq!(assembler.finish(), script.into_bytes());
    ctx.disconnect(handle).unwrap();
}

#[test]
fn server_error_over_tcp_keeps_connection_open() {
    let server = batch_server();
    let client = client();
    let ctx = client.context().unwrap();
    let handle = ctx.connect(&server.address(), None).unwrap();

    let err = ctx.locate_job(handle, "gone.server", None).unwrap_err();
    assert!(matches!(err, ClientError::Server { code: 15001, .. }));

    assert_eq!(ctx.locate_job(handle, "6.server", None).unwrap(), "node07");
    ctx.disconnect(handle).unwrap();
}

#[test]
fn empty_address_uses_default_server() {
    let server = TcpServer::start();
    let client = client_with(ClientConfig {
        server: Some(server.address()),
        ..ClientConfig::default()
    });
    let ctx = client.context().unwrap();

    let handle = ctx.connect("", None).unwrap();

    assert_eq!(
        client.table().get(handle).unwrap().server(),
        server.address()
    );
    ctx.disconnect(handle).unwrap();
}

#[test]
fn timed_out_reply_is_never_handed_to_the_next_call() {
    let server = TcpServer::with_handler(|request| {
        let location = match &request.body {
            RequestBody::JobId { job_id } => {
                if job_id == "slow.server" {
                    std::thread::sleep(std::time::Duration::from_millis(400));
                }
                format!("at-{}", job_id)
            }
            _ => String::new(),
        };
        BatchReply::ok(ReplyBody::Locate { location })
    });
    let client = client_with(ClientConfig {
        io_timeout_ms: Some(100),
        ..ClientConfig::default()
    });
    let ctx = client.context().unwrap();
    let handle = ctx.connect(&server.address(), None).unwrap();

    let err = ctx.locate_job(handle, "slow.server", None).unwrap_err();
    assert!(matches!(err, ClientError::Protocol(_)));

    let err = ctx.locate_job(handle, "fast.server", None).unwrap_err();
    assert!(matches!(err, ClientError::InvalidConnection(h) if h == handle));

    assert!(wait_for(SPEC_WAIT_MAX_MS, || server.hangups() == 1));
    let asked: Vec<Command> = server
        .requests()
        .iter()
        .map(|r| r.header.command)
        .collect();
    assert_eq!(asked, vec![Command::Connect, Command::LocateJob]);

    ctx.disconnect(handle).unwrap();
    assert!(client.table().is_empty());
}
