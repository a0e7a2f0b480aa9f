//! Job control operations against a scripted server.

use bq_client::{ClientError, FakeServer, ManagerCommand, ObjectType, ShutdownManner};
use bq_protocol::{BatchReply, BatchStatus, Command, ReplyBody};

use crate::prelude::*;

#[test]
fn every_call_sends_the_acting_user() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);

    ctx.hold_job(handle, "1.server", None, None).unwrap();
    ctx.release_job(handle, "1.server", None, None).unwrap();
    ctx.rerun_job(handle, "1.server", None).unwrap();
    ctx.stat_server(handle, &[], None).unwrap();
    ctx.terminate(handle, ShutdownManner::Quick, None).unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 6);
    assert!(requests.iter().all(|r| r.header.user == "alice"));
    let commands: Vec<Command> = requests.iter().map(|r| r.header.command).collect();
    similar_asserts::assert_eq!(
        commands,
        vec![
            Command::Connect,
            Command::HoldJob,
            Command::ReleaseJob,
            Command::RerunJob,
            Command::StatusServer,
            Command::Shutdown,
        ]
    );
}

#[test]
fn stat_job_returns_objects() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    server.reply_body(ReplyBody::Status {
        objects: vec![BatchStatus {
            name: "1.server".to_string(),
            attributes: vec![bq_client::Attribute::new("job_state", "R")],
            text: None,
        }],
    });

    let status = ctx.stat_job(handle, "1.server", &[], None).unwrap();

    assert_eq!(status.len(), 1);
    assert_eq!(status[0].get("job_state", None), Some("R"));
}

#[test]
fn manager_error_is_reported_verbatim() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    server.reply(BatchReply::error(15007, "Unauthorized Request"));

    let err = ctx
        .manager(
            handle,
            ManagerCommand::Delete,
            ObjectType::Queue,
            "workq",
            &[],
            None,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Server { code: 15007, message: Some(ref m) } if m == "Unauthorized Request"
    ));
}
