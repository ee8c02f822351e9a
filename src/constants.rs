// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Readiness polling configuration
pub mod crd {
    /// Default interval in seconds between readiness probes
    pub const POLL_INTERVAL_SECS: u64 = 3;
    /// Default total readiness wait in seconds
    pub const POLL_TIMEOUT_SECS: u64 = 30;
}
