// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities: raw resource access, bounded retry, and CRD readiness.

pub mod client;
pub mod crd;
pub mod retry;

pub use client::{ResourceClient, WatchCloser, WatchStream};
pub use crd::wait_for_peer_cluster_crd;
pub use retry::{attempts_for, retry, Probe, RetryError};
