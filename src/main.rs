// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use futures::StreamExt;
use kube::{Client, ResourceExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use peersync::config::Config;
use peersync::kubernetes::{wait_for_peer_cluster_crd, ResourceClient};
use peersync::types::PeerCluster;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting peersync");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: namespace={}", config.namespace);

    // Create Kubernetes client
    let client = Client::try_default().await?;
    let peers: ResourceClient<PeerCluster> = ResourceClient::new(client);
    info!("Connected to Kubernetes cluster");

    info!("Waiting for PeerCluster collection to become available...");
    wait_for_peer_cluster_crd(
        &peers,
        &config.namespace,
        config.ready_poll_interval,
        config.ready_timeout,
    )
    .await?;

    let list = peers.list(&config.namespace).await?;
    for cluster in list.iter() {
        info!(
            "PeerCluster {} (resourceVersion={}, size={}, phase={})",
            cluster.name_any(),
            cluster.resource_version().unwrap_or_default(),
            cluster.spec.size,
            cluster.phase().unwrap_or("unknown")
        );
    }

    // Resume from the list cursor so no change after the list is missed
    let mut stream = peers.watch(&config.namespace, list.resource_version()).await?;
    let closer = stream.closer();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, closing watch");
            closer.close();
        }
    });

    info!(
        "Watching PeerClusters in {} from resourceVersion {:?}",
        config.namespace,
        list.resource_version()
    );
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => info!("Received {} bytes of watch events", bytes.len()),
            Err(e) => {
                warn!("Watch stream failed: {}", e);
                return Err(e.into());
            }
        }
    }

    info!("Watch stream ended");
    Ok(())
}
