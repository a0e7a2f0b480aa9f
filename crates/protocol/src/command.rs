// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch request command codes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Command code carried in every request header.
///
/// One discriminant per remote operation. The header serializes the numeric
/// code, which is what the server dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Command {
    Connect = 0,
    QueueJob = 1,
    JobScript = 3,
    RdyToCommit = 4,
    Commit = 5,
    DeleteJob = 6,
    HoldJob = 7,
    LocateJob = 8,
    Manager = 9,
    MessageJob = 10,
    ModifyJob = 11,
    MoveJob = 12,
    ReleaseJob = 13,
    RerunJob = 14,
    RunJob = 15,
    SelectJobs = 16,
    Shutdown = 17,
    SignalJob = 18,
    StatusJob = 19,
    StatusQueue = 20,
    StatusServer = 21,
    AsyncRunJob = 23,
    OrderJob = 50,
    SelStat = 51,
    StatusNode = 58,
    Disconnect = 59,
    SubmitResv = 70,
    DeleteResv = 71,
    StatusResv = 72,
    StatusResource = 82,
    StatusHook = 83,
    StatusSched = 84,
    PySpawn = 85,
    StatusHost = 86,
    StatusVnode = 87,
}

/// Command code with no matching [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown command code {0}")]
pub struct UnknownCommand(pub u16);

impl Command {
    pub const ALL: [Command; 35] = [
        Command::Connect,
        Command::QueueJob,
        Command::JobScript,
        Command::RdyToCommit,
        Command::Commit,
        Command::DeleteJob,
        Command::HoldJob,
        Command::LocateJob,
        Command::Manager,
        Command::MessageJob,
        Command::ModifyJob,
        Command::MoveJob,
        Command::ReleaseJob,
        Command::RerunJob,
        Command::RunJob,
        Command::SelectJobs,
        Command::Shutdown,
        Command::SignalJob,
        Command::StatusJob,
        Command::StatusQueue,
        Command::StatusServer,
        Command::AsyncRunJob,
        Command::OrderJob,
        Command::SelStat,
        Command::StatusNode,
        Command::Disconnect,
        Command::SubmitResv,
        Command::DeleteResv,
        Command::StatusResv,
        Command::StatusResource,
        Command::StatusHook,
        Command::StatusSched,
        Command::PySpawn,
        Command::StatusHost,
        Command::StatusVnode,
    ];

    /// Numeric command code sent on the wire.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether the server sends a reply for this command.
    ///
    /// Disconnect is fire-and-forget: the server closes the socket.
    pub fn expects_reply(self) -> bool {
        !matches!(self, Command::Disconnect)
    }
}

impl From<Command> for u16 {
    fn from(command: Command) -> u16 {
        command.code()
    }
}

impl TryFrom<u16> for Command {
    type Error = UnknownCommand;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Command::ALL
            .into_iter()
            .find(|command| command.code() == code)
            .ok_or(UnknownCommand(code))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
