// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_TIMEOUT_SECS};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace holding the PeerCluster objects
    pub namespace: String,
    pub ready_poll_interval: Duration,
    pub ready_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let namespace =
            env::var("PEER_NAMESPACE").context("PEER_NAMESPACE environment variable not set")?;

        Ok(Config {
            namespace,
            ready_poll_interval: secs_from_env("READY_POLL_INTERVAL_SECS", POLL_INTERVAL_SECS)?,
            ready_timeout: secs_from_env("READY_TIMEOUT_SECS", POLL_TIMEOUT_SECS)?,
        })
    }
}

fn secs_from_env(key: &str, default: u64) -> Result<Duration> {
    let secs = match env::var(key) {
        Ok(value) => parse_secs(key, &value)?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, value))?;
    anyhow::ensure!(secs > 0, "{} must be greater than zero", key);
    Ok(secs)
}
