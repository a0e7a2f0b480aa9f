// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch request envelope

use serde::{Deserialize, Serialize};

use crate::{Attribute, Command};

/// Protocol type tag carried in every header
pub const PROTOCOL_TYPE: u32 = 2;

/// Protocol version carried in every header
pub const PROTOCOL_REVISION: u32 = 1;

/// Request header: command code plus the acting credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub protocol: u32,
    pub version: u32,
    pub command: Command,
    pub user: String,
}

impl RequestHeader {
    pub fn new(command: Command, user: impl Into<String>) -> Self {
        Self {
            protocol: PROTOCOL_TYPE,
            version: PROTOCOL_REVISION,
            command,
            user: user.into(),
        }
    }
}

/// Sub-command of a manager request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerCommand {
    Create,
    Delete,
    Set,
    Unset,
    List,
    Print,
}

/// Object kind a manager request operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Server,
    Queue,
    Job,
    Node,
    Reservation,
    Resource,
    Sched,
    Hook,
}

/// Which job output file a message is appended to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOption {
    #[default]
    Stdout,
    Stderr,
    Both,
}

/// How the server should shut down on terminate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownManner {
    /// Stop accepting work, let running jobs finish
    #[default]
    Delay,
    /// Checkpoint or requeue running jobs, then stop
    Immediate,
    /// Stop now without touching running jobs
    Quick,
}

/// Operation-specific request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    /// Connect, disconnect
    Empty,

    /// Locate, rerun, ready-to-commit, commit
    JobId { job_id: String },

    /// Manager request and the job/reservation requests built on it
    /// (delete, hold, release, alter, delete reservation)
    Manage {
        command: ManagerCommand,
        object_type: ObjectType,
        object_name: String,
        #[serde(default)]
        attributes: Vec<Attribute>,
    },

    /// First step of a job submission
    QueueJob {
        /// Empty for new jobs; the server assigns the identifier
        job_id: String,
        destination: String,
        attributes: Vec<Attribute>,
    },

    /// One chunk of a job script
    JobScript { job_id: String, seq: u32, data: Vec<u8> },

    /// Append a message to a job's output file
    Message {
        job_id: String,
        file: FileOption,
        message: String,
    },

    /// Spawn a task inside a running job
    PySpawn {
        job_id: String,
        argv: Vec<String>,
        envp: Vec<String>,
    },

    /// Run or async-run a job
    Run {
        job_id: String,
        #[serde(default)]
        location: String,
    },

    Signal { job_id: String, signal: String },

    Move { job_id: String, destination: String },

    /// Swap the queue positions of two jobs
    Order { job_id: String, other_job_id: String },

    /// Select jobs, optionally returning status for each match
    Select {
        criteria: Vec<Attribute>,
        #[serde(default)]
        attributes: Vec<Attribute>,
    },

    /// All stat-family requests
    Status {
        id: String,
        #[serde(default)]
        attributes: Vec<Attribute>,
    },

    Shutdown { manner: ShutdownManner },
}

/// Complete request: header, body, and trailing extend string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub header: RequestHeader,
    pub body: RequestBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<String>,
}

impl BatchRequest {
    pub fn new(header: RequestHeader, body: RequestBody, extend: Option<&str>) -> Self {
        Self {
            header,
            body,
            extend: extend.map(String::from),
        }
    }

    pub fn command(&self) -> Command {
        self.header.command
    }
}
