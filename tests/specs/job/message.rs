//! Appending a message to a job's output file.

use bq_client::{ClientError, FakeServer, FileOption};
use bq_protocol::{BatchReply, ReplyBody, RequestBody};

use crate::prelude::*;

#[test]
fn empty_message_is_rejected_without_io() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    let bytes = server.bytes_written();

    let err = ctx
        .message_job(handle, "123.server", FileOption::Stdout, "", None)
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(server.bytes_written(), bytes);
    assert!(server.calls().is_empty());
}

#[test]
fn message_acknowledged_with_null_returns_zero() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    server.reply_body(ReplyBody::Null);

    let status = ctx
        .message_job(handle, "123.server", FileOption::Stdout, "hello", None)
        .unwrap();

    assert_eq!(status, 0);
    similar_asserts::assert_eq!(
        server.calls()[0].body,
        RequestBody::Message {
            job_id: "123.server".to_string(),
            file: FileOption::Stdout,
            message: "hello".to_string(),
        }
    );
}

#[test]
fn message_to_finished_job_reports_server_error() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    let handle = connect_fake(&ctx, &server);
    server.reply(BatchReply::error(15001, "Unknown Job Id 123.server"));

    let err = ctx
        .message_job(handle, "123.server", FileOption::Both, "hello", None)
        .unwrap_err();

    assert_eq!(err.code(), 15001);
    assert_eq!(ctx.last_error_code(handle), Some(15001));
    assert_eq!(
        ctx.last_error_message(handle).as_deref(),
        Some("Unknown Job Id 123.server")
    );
}
