// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::error::{PeerSyncError, Result};
use crate::kubernetes::client::ResourceClient;
use crate::kubernetes::retry::{attempts_for, retry, Probe, RetryError};
use crate::types::PeerCluster;
use std::time::Duration;
use tracing::{info, warn};

/// Wait until the PeerCluster collection in `namespace` answers a list request.
///
/// The collection is registered asynchronously, so a 404 means "not yet" and is polled
/// again every `interval`, up to `floor(timeout / interval)` attempts. Any other error
/// stops the wait and is returned as is.
pub async fn wait_for_peer_cluster_crd(
    client: &ResourceClient<PeerCluster>,
    namespace: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<()> {
    if interval.is_zero() {
        return Err(PeerSyncError::Validation(
            "poll interval must be greater than zero".to_string(),
        ));
    }
    let max_attempts = attempts_for(timeout, interval);

    let result = retry(interval, max_attempts, move || async move {
        match client.list(namespace).await {
            Ok(_) => Ok(Probe::Ready(())),
            Err(e) if e.is_not_found() => {
                info!(
                    "PeerCluster collection in namespace {} not yet available, waiting {:?}...",
                    namespace, interval
                );
                Ok(Probe::Pending)
            }
            Err(e) => Err(e),
        }
    })
    .await;

    match result {
        Ok(()) => {
            info!("PeerCluster collection in namespace {} is available", namespace);
            Ok(())
        }
        Err(RetryError::Aborted(e)) => {
            warn!("Error checking for PeerCluster collection: {}", e);
            Err(e)
        }
        Err(RetryError::Timeout { attempts }) => Err(PeerSyncError::Timeout { attempts }),
        Err(RetryError::NoAttempts) => Err(PeerSyncError::Validation(format!(
            "timeout {:?} is shorter than poll interval {:?}",
            timeout, interval
        ))),
    }
}
