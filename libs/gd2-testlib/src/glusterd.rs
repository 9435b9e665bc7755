// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! glusterd2 service control

use std::collections::BTreeMap;

use gd2_client::Hosts;

use crate::cluster::Cluster;

/// Service state across a set of servers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlusterdState {
    /// Running everywhere
    Running,
    /// Not running on at least one server
    Stopped,
    /// Reported stopped on some server while its process is still alive
    StoppedWithPid,
}

/// Start glusterd2 wherever it is not already running
pub async fn start_glusterd(cluster: &Cluster, servers: impl Into<Hosts>) -> bool {
    cluster
        .run_on_all(
            servers,
            "pgrep glusterd2 || systemctl start glusterd2",
            "start glusterd2",
        )
        .await
}

pub async fn stop_glusterd(cluster: &Cluster, servers: impl Into<Hosts>) -> bool {
    cluster
        .run_on_all(servers, "systemctl stop glusterd2", "stop glusterd2")
        .await
}

pub async fn restart_glusterd(cluster: &Cluster, servers: impl Into<Hosts>) -> bool {
    cluster
        .run_on_all(servers, "systemctl restart glusterd2", "restart glusterd2")
        .await
}

/// Aggregate service state of `servers`.
///
/// A live process on a server whose unit is not running takes precedence
/// over a plain stop.
pub async fn is_glusterd_running(cluster: &Cluster, servers: impl Into<Hosts>) -> GlusterdState {
    let servers: Hosts = servers.into();
    let status = cluster
        .run_parallel(&servers, "systemctl status glusterd2")
        .await;
    let pids = cluster.run_parallel(&servers, "pidof glusterd2").await;

    let mut state = GlusterdState::Running;
    for (server, result) in status {
        if result.as_ref().is_ok_and(|o| o.success()) {
            continue;
        }
        tracing::error!(server = %server, "glusterd2 is not running");
        let pid_alive = pids
            .get(&server)
            .is_some_and(|r| r.as_ref().is_ok_and(|o| o.success()));
        if pid_alive {
            tracing::error!(server = %server, "glusterd2 process is alive but the service is not running");
            state = GlusterdState::StoppedWithPid;
        } else if state == GlusterdState::Running {
            state = GlusterdState::Stopped;
        }
    }
    state
}

/// glusterd2 process ids per node.
///
/// The flag is true only if every node runs exactly one glusterd2. Nodes
/// without a process map to an empty list.
pub async fn get_glusterd_pids(
    cluster: &Cluster,
    nodes: impl Into<Hosts>,
) -> (bool, BTreeMap<String, Vec<u32>>) {
    let mut all_single = true;
    let mut pids = BTreeMap::new();

    for (node, result) in cluster.run_parallel(nodes, "pidof glusterd2").await {
        let found: Vec<u32> = match result {
            Ok(output) if output.success() => output
                .stdout
                .split_whitespace()
                .filter_map(|pid| pid.parse().ok())
                .collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::error!(node = %node, error = %e, "unable to query glusterd2 pid");
                Vec::new()
            }
        };
        match found.len() {
            1 => tracing::info!(node = %node, pid = found[0], "glusterd2 process found"),
            0 => {
                tracing::error!(node = %node, "no glusterd2 process found");
                all_single = false;
            }
            _ => {
                tracing::error!(node = %node, pids = ?found, "more than one glusterd2 process found");
                all_single = false;
            }
        }
        pids.insert(node, found);
    }
    (all_single, pids)
}
