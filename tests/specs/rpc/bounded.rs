//! Long-lived connections do not accumulate state.

use bq_client::FakeServer;
use bq_protocol::{BatchReply, Command, ReplyBody, RequestBody};

use crate::prelude::*;

#[test]
fn ten_thousand_calls_keep_connection_state_bounded() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();
    // Every third job is unknown to the server.
    server.handle_with(|request| match (&request.header.command, &request.body) {
        (Command::DeleteJob, RequestBody::Manage { object_name, .. })
            if object_name.starts_with("missing") =>
        {
            BatchReply::error(15001, format!("Unknown Job Id {}", object_name))
        }
        _ => BatchReply::ok(ReplyBody::Null),
    });
    let handle = connect_fake(&ctx, &server);

    let mut failures = 0;
    for i in 0..10_000 {
        let job_id = if i % 3 == 0 {
            format!("missing{}.server", i)
        } else {
            format!("{}.server", i)
        };
        if ctx.delete_job(handle, &job_id, None).is_err() {
            failures += 1;
            let text = ctx.last_error_message(handle).unwrap();
            assert_eq!(text, format!("Unknown Job Id {}", job_id));
        } else {
            assert_eq!(ctx.last_error_message(handle), None);
        }
    }

    assert_eq!(failures, 3_334);
    assert_eq!(server.pending_replies(), 0);
    let conn = client.table().get(handle).unwrap();
    let stats = conn.lock_stats();
    assert_eq!(stats.acquired, 10_001);
    assert!(stats.is_balanced());
    assert_eq!(client.table().len(), 1);
}

#[test]
fn connect_disconnect_cycles_leave_table_empty() {
    let client = client();
    let ctx = client.context().unwrap();
    let server = FakeServer::new();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        let handle = connect_fake(&ctx, &server);
        assert!(seen.insert(handle), "handle {} reused", handle);
        ctx.disconnect(handle).unwrap();
    }

    assert!(client.table().is_empty());
    assert_eq!(server.shutdowns(), 500);
    assert_eq!(server.pending_replies(), 0);
}
