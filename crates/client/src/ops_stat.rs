// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selection and status queries

use bq_protocol::{Attribute, BatchStatus, Command, RequestBody};

use crate::context::Context;
use crate::decode;
use crate::encode::Call;
use crate::error::ClientError;
use crate::table::ConnectionHandle;

impl Context {
    /// Ids of the jobs matching `criteria`
    pub fn select_jobs(
        &self,
        handle: ConnectionHandle,
        criteria: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<String>, ClientError> {
        let body = RequestBody::Select {
            criteria: criteria.to_vec(),
            attributes: Vec::new(),
        };
        let call = Call::new("select_jobs", Command::SelectJobs, body).extend(extend);
        self.transact(handle, call, &decode::JOB_IDS)
    }

    /// Status of the jobs matching `criteria`, restricted to `attributes`
    pub fn select_status(
        &self,
        handle: ConnectionHandle,
        criteria: &[Attribute],
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        let body = RequestBody::Select {
            criteria: criteria.to_vec(),
            attributes: attributes.to_vec(),
        };
        let call = Call::new("select_status", Command::SelStat, body).extend(extend);
        self.transact(handle, call, &decode::STATUS)
    }

    /// Status of one job, or of all jobs when `id` is empty
    pub fn stat_job(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_job", Command::StatusJob, id, attributes, extend)
    }

    pub fn stat_queue(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_queue", Command::StatusQueue, id, attributes, extend)
    }

    pub fn stat_node(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_node", Command::StatusNode, id, attributes, extend)
    }

    pub fn stat_vnode(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_vnode", Command::StatusVnode, id, attributes, extend)
    }

    pub fn stat_host(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_host", Command::StatusHost, id, attributes, extend)
    }

    pub fn stat_resv(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_resv", Command::StatusResv, id, attributes, extend)
    }

    pub fn stat_hook(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_hook", Command::StatusHook, id, attributes, extend)
    }

    pub fn stat_resource(
        &self,
        handle: ConnectionHandle,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_resource", Command::StatusResource, id, attributes, extend)
    }

    pub fn stat_server(
        &self,
        handle: ConnectionHandle,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_server", Command::StatusServer, "", attributes, extend)
    }

    pub fn stat_sched(
        &self,
        handle: ConnectionHandle,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        self.stat(handle, "stat_sched", Command::StatusSched, "", attributes, extend)
    }

    fn stat(
        &self,
        handle: ConnectionHandle,
        op: &'static str,
        command: Command,
        id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, ClientError> {
        let body = RequestBody::Status {
            id: id.to_string(),
            attributes: attributes.to_vec(),
        };
        self.transact(handle, Call::new(op, command, body).extend(extend), &decode::STATUS)
    }
}

#[cfg(test)]
#[path = "ops_stat_tests.rs"]
mod tests;
