// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission and job control operations

use bq_protocol::{
    script_frames, Attribute, Command, FileOption, ManagerCommand, ObjectType, RequestBody,
};

use crate::context::Context;
use crate::decode;
use crate::encode::{require, Call};
use crate::error::ClientError;
use crate::table::ConnectionHandle;

/// Attribute naming the hold types for hold and release
pub const HOLD_TYPES: &str = "Hold_Types";

/// Hold type used when none is given (user hold)
pub const DEFAULT_HOLD_TYPE: &str = "u";

fn manage_job(command: ManagerCommand, job_id: &str, attributes: Vec<Attribute>) -> RequestBody {
    RequestBody::Manage {
        command,
        object_type: ObjectType::Job,
        object_name: job_id.to_string(),
        attributes,
    }
}

fn hold_types(hold_type: Option<&str>) -> Vec<Attribute> {
    let hold_type = hold_type.filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HOLD_TYPE);
    vec![Attribute::new(HOLD_TYPES, hold_type)]
}

impl Context {
    /// Submit a job: queue it, send the script, and commit.
    ///
    /// All steps run under one hold of the connection. `destination` may be
    /// empty for the server's default queue. Returns the committed job id.
    pub fn submit(
        &self,
        handle: ConnectionHandle,
        attributes: &[Attribute],
        script: &[u8],
        destination: &str,
        extend: Option<&str>,
    ) -> Result<String, ClientError> {
        let chunk_size = self.config().script_chunk_size;
        self.with_connection(handle, |guard| {
            let queue = RequestBody::QueueJob {
                job_id: String::new(),
                destination: destination.to_string(),
                attributes: attributes.to_vec(),
            };
            let job_id = self.cycle(
                guard,
                Call::new("submit", Command::QueueJob, queue).extend(extend),
                &decode::QUEUED,
            )?;

            for frame in script_frames(&job_id, script, chunk_size) {
                self.cycle(
                    guard,
                    Call::new("submit", Command::JobScript, frame).extend(extend),
                    &decode::ACK,
                )?;
            }

            let ready = RequestBody::JobId {
                job_id: job_id.clone(),
            };
            self.cycle(
                guard,
                Call::new("submit", Command::RdyToCommit, ready).extend(extend),
                &decode::READY,
            )?;

            let commit = RequestBody::JobId { job_id };
            self.cycle(
                guard,
                Call::new("submit", Command::Commit, commit).extend(extend),
                &decode::COMMITTED,
            )
        })
    }

    /// Apply attribute changes to a job
    pub fn alter_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        attributes: &[Attribute],
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = manage_job(ManagerCommand::Set, job_id, attributes.to_vec());
        let call = Call::new("alter_job", Command::ModifyJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    pub fn delete_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = manage_job(ManagerCommand::Delete, job_id, Vec::new());
        let call = Call::new("delete_job", Command::DeleteJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Place a hold on a job; `hold_type` defaults to a user hold.
    pub fn hold_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        hold_type: Option<&str>,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = manage_job(ManagerCommand::Set, job_id, hold_types(hold_type));
        let call = Call::new("hold_job", Command::HoldJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Release a hold on a job; `hold_type` defaults to a user hold.
    pub fn release_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        hold_type: Option<&str>,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = manage_job(ManagerCommand::Set, job_id, hold_types(hold_type));
        let call = Call::new("release_job", Command::ReleaseJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Run a job now, optionally on the given execution location
    pub fn run_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        location: Option<&str>,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        self.run(handle, "run_job", Command::RunJob, job_id, location, extend)
    }

    /// Like [`Context::run_job`], but the server replies before the job starts.
    pub fn async_run_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        location: Option<&str>,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        self.run(handle, "async_run_job", Command::AsyncRunJob, job_id, location, extend)
    }

    fn run(
        &self,
        handle: ConnectionHandle,
        op: &'static str,
        command: Command,
        job_id: &str,
        location: Option<&str>,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = RequestBody::Run {
            job_id: job_id.to_string(),
            location: location.unwrap_or_default().to_string(),
        };
        self.transact(handle, Call::new(op, command, body).extend(extend), &decode::ACK)
    }

    /// Append `message` to a job's output file.
    ///
    /// Returns the reply status, which is zero on success.
    pub fn message_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        file: FileOption,
        message: &str,
        extend: Option<&str>,
    ) -> Result<i32, ClientError> {
        let job_id = require(job_id, "job id")?;
        let message = require(message, "message")?;
        let body = RequestBody::Message {
            job_id: job_id.to_string(),
            file,
            message: message.to_string(),
        };
        let call = Call::new("message_job", Command::MessageJob, body).extend(extend);
        self.transact(handle, call, &decode::STATUS_CODE)
    }

    /// Spawn a task inside a running job; returns the task's exit status.
    pub fn py_spawn(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        argv: &[String],
        envp: &[String],
    ) -> Result<i32, ClientError> {
        let job_id = require(job_id, "job id")?;
        if argv.is_empty() {
            return Err(ClientError::invalid("argv is required"));
        }
        let body = RequestBody::PySpawn {
            job_id: job_id.to_string(),
            argv: argv.to_vec(),
            envp: envp.to_vec(),
        };
        self.transact(handle, Call::new("py_spawn", Command::PySpawn, body), &decode::AUX_CODE)
    }

    pub fn signal_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        signal: &str,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let signal = require(signal, "signal")?;
        let body = RequestBody::Signal {
            job_id: job_id.to_string(),
            signal: signal.to_string(),
        };
        let call = Call::new("signal_job", Command::SignalJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Move a job to another queue; an empty destination means the default queue.
    pub fn move_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        destination: &str,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = RequestBody::Move {
            job_id: job_id.to_string(),
            destination: destination.to_string(),
        };
        let call = Call::new("move_job", Command::MoveJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Swap the queue positions of two jobs
    pub fn order_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        other_job_id: &str,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let other_job_id = require(other_job_id, "second job id")?;
        let body = RequestBody::Order {
            job_id: job_id.to_string(),
            other_job_id: other_job_id.to_string(),
        };
        let call = Call::new("order_job", Command::OrderJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    pub fn rerun_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        extend: Option<&str>,
    ) -> Result<(), ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = RequestBody::JobId {
            job_id: job_id.to_string(),
        };
        let call = Call::new("rerun_job", Command::RerunJob, body).extend(extend);
        self.transact(handle, call, &decode::ACK)
    }

    /// Ask the server where a job currently lives
    pub fn locate_job(
        &self,
        handle: ConnectionHandle,
        job_id: &str,
        extend: Option<&str>,
    ) -> Result<String, ClientError> {
        let job_id = require(job_id, "job id")?;
        let body = RequestBody::JobId {
            job_id: job_id.to_string(),
        };
        let call = Call::new("locate_job", Command::LocateJob, body).extend(extend);
        self.transact(handle, call, &decode::LOCATION)
    }
}

#[cfg(test)]
#[path = "ops_job_tests.rs"]
mod tests;
