// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Pool membership helpers

use gd2_client::convergence::{wait_for_peers_connected, wait_for_peers_detached};
use gd2_client::{Hosts, PeerSelector, PollPolicy};

use crate::cluster::Cluster;
use crate::error::Result;

/// Probe every server not yet in `mnode`'s pool.
///
/// With `validate`, waits under [`PollPolicy::PEERS`] until all of them
/// are connected.
pub async fn peer_probe_servers(
    cluster: &Cluster,
    mnode: &str,
    servers: impl Into<Hosts>,
    validate: bool,
) -> Result<bool> {
    let servers: Hosts = servers.into();
    let servers = servers.without(mnode);
    let client = cluster.client(mnode).await?;

    let Some(pool) = client.get_pool().await? else {
        tracing::error!(mnode, "unable to get nodes from the pool list, failing peer probe");
        return Ok(false);
    };

    for server in servers.iter() {
        if PeerSelector::resolve(server).await.find(&pool).is_some() {
            continue;
        }
        let result = client.peer_probe(server).await?;
        if !result.is_ok() {
            tracing::error!(mnode, server, status = %result.status, "failed to peer probe");
            return Ok(false);
        }
        tracing::info!(mnode, server, "peer probed");
    }

    if validate && !wait_for_peers_connected(&client, &servers, PollPolicy::PEERS).await {
        return Ok(false);
    }
    Ok(true)
}

/// Detach every server other than `mnode` from the pool.
///
/// With `validate`, waits under [`PollPolicy::PEERS`] until none remain.
pub async fn peer_detach_servers(
    cluster: &Cluster,
    mnode: &str,
    servers: impl Into<Hosts>,
    validate: bool,
) -> Result<bool> {
    let servers: Hosts = servers.into();
    let servers = servers.without(mnode);
    let client = cluster.client(mnode).await?;

    for server in servers.iter() {
        let result = client.peer_detach(server).await?;
        if !result.is_ok() {
            tracing::error!(mnode, server, status = %result.status, "failed to peer detach");
            return Ok(false);
        }
    }

    if validate && !wait_for_peers_detached(&client, &servers, PollPolicy::PEERS).await {
        tracing::error!(mnode, "validation after peer detach failed");
        return Ok(false);
    }
    Ok(true)
}
