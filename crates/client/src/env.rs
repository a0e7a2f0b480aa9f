// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the client crate.

use std::path::PathBuf;
use std::time::Duration;

// --- Duration helper (private) ---

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

// --- Config file ---

/// Resolve config file: BQ_CONF_FILE > XDG_CONFIG_HOME/bq/client.toml > ~/.config/bq/client.toml
pub fn conf_file() -> Option<PathBuf> {
    if let Some(path) = non_empty("BQ_CONF_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("bq").join("client.toml"))
}

// --- Server ---

pub fn server() -> Option<String> {
    non_empty("BQ_SERVER")
}

pub fn port() -> Option<u16> {
    std::env::var("BQ_PORT").ok().and_then(|s| s.parse().ok())
}

// --- Credential ---

pub fn user() -> Option<String> {
    non_empty("BQ_USER")
}

/// Login name of the invoking user: USER > LOGNAME
pub fn login_name() -> Option<String> {
    non_empty("USER").or_else(|| non_empty("LOGNAME"))
}

// --- Timeouts ---

pub fn timeout_connect_ms() -> Option<Duration> {
    parse_duration_ms("BQ_TIMEOUT_CONNECT_MS")
}

pub fn timeout_io_ms() -> Option<Duration> {
    parse_duration_ms("BQ_TIMEOUT_IO_MS")
}
