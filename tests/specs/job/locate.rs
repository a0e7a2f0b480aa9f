//! Locating a job returns the server that holds it.

use bq_client::{ClientError, FakeServer};
use bq_protocol::{Command, ReplyBody, RequestBody};

use crate::prelude::*;

#[test]
fn locate_returns_location_from_reply() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    server.reply_body(ReplyBody::Locate {
        location: "node07".to_string(),
    });

    let location = ctx.locate_job(handle, "123.server", None).unwrap();

    assert_eq!(location, "node07");
    let calls = server.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].header.command, Command::LocateJob);
    assert_eq!(
        calls[0].body,
        RequestBody::JobId {
            job_id: "123.server".to_string()
        }
    );
}

#[test]
fn locate_with_empty_id_does_no_io() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    let conn = client.table().get(handle).unwrap();
    let frames = server.frames_written();
    let stats = conn.lock_stats();

    let err = ctx.locate_job(handle, "", None).unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(server.frames_written(), frames);
    assert_eq!(conn.lock_stats(), stats);
}

#[test]
fn locate_rejects_status_reply() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    server.reply_body(ReplyBody::Status {
        objects: Vec::new(),
    });

    let err = ctx.locate_job(handle, "123.server", None).unwrap_err();

    assert!(matches!(err, ClientError::Protocol(_)));
    assert!(ctx
        .last_error_message(handle)
        .unwrap()
        .contains("unexpected reply choice Status"));
}
