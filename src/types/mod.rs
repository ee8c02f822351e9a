// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource types: the PeerCluster custom resource and list envelopes.

pub mod collection;
pub mod peer_cluster;

pub use collection::ResourceCollection;
pub use peer_cluster::{PeerCluster, PeerClusterSpec, PeerClusterStatus};
