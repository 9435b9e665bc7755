// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Brick state helpers
//!
//! Bricks are named `host:path` throughout. Online and offline checks use
//! set semantics: every named brick must be in the wanted state, other
//! bricks of the volume are not looked at.

use std::collections::BTreeSet;

use gd2_client::convergence::wait_for_bricks_online;
use gd2_client::{BrickStatus, PollPolicy, shell_quote};
use rand::seq::IndexedRandom;

use crate::cluster::Cluster;
use crate::error::{Error, Result};

/// How [`bring_bricks_online`] revives bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringOnline {
    /// Restart glusterd2 on every node hosting one of the bricks
    GlusterdRestart,
    /// Force-start the volume, which starts every stopped brick
    VolumeStartForce,
}

impl BringOnline {
    pub const ALL: &'static [BringOnline] =
        &[BringOnline::GlusterdRestart, BringOnline::VolumeStartForce];
}

/// How [`bring_bricks_offline`] stops bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringOffline {
    /// Signal the brick process, escalating to SIGKILL
    ServiceKill,
}

impl BringOffline {
    pub const ALL: &'static [BringOffline] = &[BringOffline::ServiceKill];
}

/// Split `host:path`
pub fn split_brick(brick: &str) -> Result<(&str, &str)> {
    match brick.split_once(':') {
        Some((host, path)) if !host.is_empty() && path.starts_with('/') => Ok((host, path)),
        _ => Err(Error::config(format!(
            "brick '{}' is not in host:/path form",
            brick
        ))),
    }
}

/// Every brick of `volname` as `host:path`; `None` if the volume is unknown.
pub async fn get_all_bricks(cluster: &Cluster, mnode: &str, volname: &str) -> Result<Option<Vec<String>>> {
    let client = cluster.client(mnode).await?;
    match client.get_volume_info(volname).await? {
        Some(info) => Ok(Some(info.brick_list())),
        None => {
            tracing::error!(volname, "unable to get the volinfo");
            Ok(None)
        }
    }
}

async fn brick_statuses(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
) -> Result<Option<Vec<BrickStatus>>> {
    let client = cluster.client(mnode).await?;
    match client.get_brick_statuses(volname).await? {
        Some(statuses) if !statuses.is_empty() => Ok(Some(statuses)),
        _ => {
            tracing::error!(volname, "unable to get brick status");
            Ok(None)
        }
    }
}

fn bricks_in_state(statuses: &[BrickStatus], online: bool) -> Vec<String> {
    statuses
        .iter()
        .filter(|s| s.online == online)
        .map(|s| s.info.host_path())
        .collect()
}

/// Bricks the server reports online; `None` when status is unavailable.
pub async fn get_online_bricks_list(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
) -> Result<Option<Vec<String>>> {
    Ok(brick_statuses(cluster, mnode, volname)
        .await?
        .map(|s| bricks_in_state(&s, true)))
}

pub async fn get_offline_bricks_list(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
) -> Result<Option<Vec<String>>> {
    Ok(brick_statuses(cluster, mnode, volname)
        .await?
        .map(|s| bricks_in_state(&s, false)))
}

async fn are_bricks_in_state(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    bricks: &[String],
    online: bool,
) -> Result<Option<bool>> {
    let Some(statuses) = brick_statuses(cluster, mnode, volname).await? else {
        return Ok(None);
    };
    let matching: BTreeSet<String> = bricks_in_state(&statuses, online).into_iter().collect();
    let wrong: Vec<&String> = bricks.iter().filter(|b| !matching.contains(*b)).collect();
    let state = if online { "online" } else { "offline" };
    if wrong.is_empty() {
        tracing::info!(volname, ?bricks, "all the bricks are {}", state);
        Ok(Some(true))
    } else {
        tracing::error!(volname, bricks = ?wrong, "some of the bricks are not {}", state);
        Ok(Some(false))
    }
}

/// Whether every brick in `bricks` is online; `None` when status is
/// unavailable.
pub async fn are_bricks_online(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    bricks: &[String],
) -> Result<Option<bool>> {
    are_bricks_in_state(cluster, mnode, volname, bricks, true).await
}

pub async fn are_bricks_offline(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    bricks: &[String],
) -> Result<Option<bool>> {
    are_bricks_in_state(cluster, mnode, volname, bricks, false).await
}

/// Wait until every brick of `volname` is online.
pub async fn wait_for_bricks_to_be_online(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    policy: PollPolicy,
) -> Result<bool> {
    let Some(bricks) = get_all_bricks(cluster, mnode, volname).await? else {
        return Ok(false);
    };
    if bricks.is_empty() {
        return Ok(false);
    }
    let client = cluster.client(mnode).await?;
    Ok(wait_for_bricks_online(&client, volname, &bricks, policy).await)
}

/// Remove each brick directory from its host.
pub async fn delete_bricks(cluster: &Cluster, bricks: &[String]) -> Result<bool> {
    let mut ok = true;
    for brick in bricks {
        let (host, path) = split_brick(brick)?;
        match cluster.run(host, &format!("rm -rf {}", shell_quote(path))).await {
            Ok(output) if output.success() => {}
            Ok(output) => {
                tracing::error!(host, path, stderr = %output.stderr.trim(), "unable to delete brick");
                ok = false;
            }
            Err(e) => {
                tracing::error!(host, path, error = %e, "unable to delete brick");
                ok = false;
            }
        }
    }
    Ok(ok)
}

/// Bring `bricks` back online with a method picked from `methods`
/// (default [`BringOnline::ALL`]).
pub async fn bring_bricks_online(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    bricks: &[String],
    methods: Option<&[BringOnline]>,
) -> Result<bool> {
    let methods = methods.unwrap_or(BringOnline::ALL);
    let Some(method) = methods.choose(&mut rand::rng()).copied() else {
        return Err(Error::config("no method to bring bricks online"));
    };
    tracing::info!(volname, ?bricks, ?method, "bringing bricks online");

    match method {
        BringOnline::GlusterdRestart => {
            let mut nodes = BTreeSet::new();
            for brick in bricks {
                nodes.insert(split_brick(brick)?.0.to_string());
            }
            let nodes: Vec<String> = nodes.into_iter().collect();
            let ok = cluster
                .run_on_all(&nodes, "systemctl restart glusterd2", "restart glusterd2")
                .await;
            if ok {
                tracing::info!(?nodes, "restarted glusterd2 to bring bricks online");
            }
            Ok(ok)
        }
        BringOnline::VolumeStartForce => {
            let client = cluster.client(mnode).await?;
            let result = client.volume_start(volname, true).await?;
            if !result.is_ok() {
                tracing::error!(volname, status = %result.status, "unable to force start the volume");
                return Ok(false);
            }
            tracing::info!(volname, "force started the volume to bring bricks online");
            Ok(true)
        }
    }
}

/// Shell command killing the brick process serving `path` for `peer_id`.
///
/// Brick pidfiles are named after the peer id followed by the brick path
/// with `/` replaced by `-`.
pub fn kill_brick_command(peer_id: &str, path: &str) -> String {
    format!(
        "pid=`ps -ef | grep -ve 'grep' | grep -e '{}{}.pid' | awk '{{print $2}}'` && kill -15 $pid || kill -9 $pid",
        peer_id,
        path.replace('/', "-")
    )
}

/// Take `bricks` offline with a method picked from `methods`
/// (default [`BringOffline::ALL`]).
pub async fn bring_bricks_offline(
    cluster: &Cluster,
    volname: &str,
    bricks: &[String],
    methods: Option<&[BringOffline]>,
) -> Result<bool> {
    let methods = methods.unwrap_or(BringOffline::ALL);
    let mut failed = Vec::new();

    for brick in bricks {
        let Some(method) = methods.choose(&mut rand::rng()).copied() else {
            return Err(Error::config("no method to bring bricks offline"));
        };
        match method {
            BringOffline::ServiceKill => {
                let (host, path) = split_brick(brick)?;
                let client = cluster.client(host).await?;
                let Some(peer_id) = client.get_peer_id(host).await? else {
                    tracing::error!(host, "unable to find the peer id of the brick host");
                    failed.push(brick.clone());
                    continue;
                };
                let killed = cluster
                    .run(host, &kill_brick_command(&peer_id, path))
                    .await
                    .is_ok_and(|o| o.success());
                if !killed {
                    tracing::error!(brick = %brick, "unable to kill the brick");
                    failed.push(brick.clone());
                }
            }
        }
    }

    if !failed.is_empty() {
        tracing::error!(volname, bricks = ?failed, "unable to bring some of the bricks offline");
        return Ok(false);
    }
    tracing::info!(volname, ?bricks, "all the bricks are brought offline");
    Ok(true)
}
