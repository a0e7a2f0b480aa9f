// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server administration and reservations

use bq_protocol::{Attribute, Command, ManagerCommand, ObjectType, RequestBody, ShutdownManner};

use crate::context::Context;
use crate::decode;
use crate::encode::{require, Call};
use crate::error::ClientError;
use crate::table::ConnectionHandle;

impl Context {
    /// Create, delete, set, or unset attributes on a server object
    pub fn manager(
        &self,
        handle: ConnectionHandle,
        command: ManagerCommand,
        object_type: ObjectType,
        object_name: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let body = RequestBody::Manage {
            command,
            object_type,
            object_name: object_name.to_string(),
            attributes: attributes.to_vec(),
        };
        let call = Call::new("manager", Command::Manager, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Ask the server to shut down
    pub fn terminate(
        &self,
        handle: ConnectionHandle,
        manner: ShutdownManner,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let body = RequestBody::Shutdown { manner };
        let call = Call::new("terminate", Command::Shutdown, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Request a reservation; returns the reservation id.
    pub fn submit_resv(
        &self,
        handle: ConnectionHandle,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<String, ClientError> {
        let body = RequestBody::QueueJob {
            job_id: String::new(),
            destination: String::new(),
            attributes: attributes.to_vec(),
        };
        let call = Call::new("submit_resv", Command::SubmitResv, body).extend(extend);
        self.transact(handle, call, &decode::TEXT)
    }

    pub fn delete_resv(
        &self,
        handle: ConnectionHandle,
        resv_id: &str,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let resv_id = require(resv_id, "reservation id")?;
        let body = RequestBody::Manage {
            command: ManagerCommand::Delete,
            object_type: ObjectType::Reservation,
            object_name: resv_id.to_string(),
            attributes: Vec::new(),
        };
        let call = Call::new("delete_resv", Command::DeleteResv, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }
}

#[cfg(test)]
#[path = "ops_admin_tests.rs"]
mod tests;
