// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Volume lifecycle helpers
//!
//! These compose the REST operations of [`gd2_client`] into the steps a
//! test fixture needs: lay out bricks, create and start a volume, inspect
//! its layout, and tear it down again including brick directories.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use gd2_client::{OptionFlags, PollPolicy, SnapList, VolumeCreate, shell_quote};

use crate::brick_libs::{are_bricks_online, get_all_bricks, wait_for_bricks_to_be_online};
use crate::cluster::Cluster;
use crate::config::{DISTRIBUTED, DISTRIBUTED_REPLICATED, REPLICATED, ServerInfo, VolumeSpec, VolumeType};
use crate::error::Result;

/// Volume type as glusterd2 reports it for plain distribute volumes
pub const DISTRIBUTE_TYPE: &str = "Distribute";

/// Type fields of a volume's info
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeTypeInfo {
    pub volume_type: Option<String>,
    pub replica_count: Option<u32>,
    pub arbiter_count: Option<u32>,
    pub distribute_count: Option<u32>,
}

/// Bricks needed to lay out `voltype`; `None` when a required count is
/// missing.
pub fn number_of_bricks(voltype: &VolumeType) -> Option<u32> {
    let replica_width = || {
        voltype
            .replica_count
            .map(|r| r + voltype.arbiter_count.unwrap_or(0))
    };
    match voltype.volume_type.as_str() {
        DISTRIBUTED => voltype.dist_count,
        REPLICATED => replica_width(),
        DISTRIBUTED_REPLICATED => Some(voltype.dist_count? * replica_width()?),
        _ => None,
    }
}

/// `count` bricks for `volname`, spread round-robin over `servers`.
///
/// Bricks are `<peerid>:<brick_root>/<volname>_brick<n>`, numbered from
/// zero. `None` if a server has no `servers_info` entry or is not in the
/// pool.
pub async fn form_bricks_list(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    count: u32,
    servers: &[String],
    servers_info: &BTreeMap<String, ServerInfo>,
) -> Result<Option<Vec<String>>> {
    form_bricks_from(cluster, mnode, volname, 0, count, servers, servers_info).await
}

async fn form_bricks_from(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    first: u32,
    count: u32,
    servers: &[String],
    servers_info: &BTreeMap<String, ServerInfo>,
) -> Result<Option<Vec<String>>> {
    if servers.is_empty() || count == 0 {
        tracing::error!(volname, count, "no servers or bricks to lay out");
        return Ok(None);
    }
    let last = first.checked_add(count).ok_or_else(|| {
        gd2_client::Error::InvalidInput(format!("Brick numbers overflow past {first}"))
    })?;
    let client = cluster.client(mnode).await?;
    let mut peer_ids: HashMap<&str, String> = HashMap::new();
    let mut bricks = Vec::with_capacity(count as usize);

    for (n, server) in (first..last).zip(servers.iter().cycle()) {
        let Some(info) = servers_info.get(server) else {
            tracing::error!(server = %server, "server is missing from servers_info");
            return Ok(None);
        };
        let peer_id = match peer_ids.get(server.as_str()) {
            Some(id) => id.clone(),
            None => {
                let Some(id) = client.get_peer_id(server).await? else {
                    tracing::error!(server = %server, "server is not in the pool");
                    return Ok(None);
                };
                peer_ids.insert(server.as_str(), id.clone());
                id
            }
        };
        bricks.push(format!(
            "{}:{}/{}_brick{}",
            peer_id,
            info.brick_root.trim_end_matches('/'),
            volname,
            n
        ));
    }
    Ok(Some(bricks))
}

pub async fn volume_exists(cluster: &Cluster, mnode: &str, volname: &str) -> Result<bool> {
    let client = cluster.client(mnode).await?;
    let exists = client.get_volume_info(volname).await?.is_some();
    if exists {
        tracing::info!(volname, "volume exists");
    } else {
        tracing::info!(volname, "volume does not exist");
    }
    Ok(exists)
}

/// Create, start and configure the volume described by `spec`.
///
/// A volume that already exists is left as is.
pub async fn setup_volume(
    cluster: &Cluster,
    mnode: &str,
    servers_info: &BTreeMap<String, ServerInfo>,
    spec: &VolumeSpec,
    force: bool,
) -> Result<bool> {
    let volname = spec.name.as_str();
    if volume_exists(cluster, mnode, volname).await? {
        return Ok(true);
    }

    let voltype = &spec.voltype;
    let Some(count) = number_of_bricks(voltype) else {
        tracing::error!(volname, voltype = %voltype.volume_type, "brick counts missing for the volume type");
        return Ok(false);
    };
    let Some(bricks) =
        form_bricks_list(cluster, mnode, volname, count, &spec.servers, servers_info).await?
    else {
        tracing::error!(volname, count, "unable to form the bricks list");
        return Ok(false);
    };

    let mut create = VolumeCreate::new(volname, bricks)
        .with_replica(
            voltype.replica_count.unwrap_or(0),
            voltype.arbiter_count.unwrap_or(0),
        )
        .with_force(force);
    if let Some(transport) = &voltype.transport {
        create = create.with_transport(transport.clone());
    }

    let client = cluster.client(mnode).await?;
    let result = client.volume_create(&create).await?;
    if let Some(err) = &result.error {
        tracing::error!(volname, status = %result.status, error = %err, "unable to create volume");
        return Ok(false);
    }

    let result = client.volume_start(volname, false).await?;
    if !result.is_ok() {
        tracing::error!(volname, status = %result.status, "volume start failed");
        return Ok(false);
    }

    if !spec.options.is_empty()
        && !client
            .set_volume_options(volname, &spec.options, OptionFlags::default())
            .await?
    {
        tracing::error!(volname, "unable to set volume options");
        return Ok(false);
    }
    tracing::info!(volname, "volume is set up");
    Ok(true)
}

/// Delete the snapshots of `volname`, stop it and delete it with its brick
/// directories. A missing volume counts as cleaned up.
pub async fn cleanup_volume(cluster: &Cluster, mnode: &str, volname: &str) -> Result<bool> {
    if !volume_exists(cluster, mnode, volname).await? {
        return Ok(true);
    }
    let client = cluster.client(mnode).await?;

    let groups: Vec<SnapList> = client.snap_list().await?.json()?.unwrap_or_default();
    for snap in groups
        .iter()
        .filter(|g| g.parent_name == volname)
        .flat_map(|g| &g.snaps)
    {
        let snapname = snap.volinfo.name.as_str();
        let result = client.snap_delete(snapname).await?;
        if !result.is_ok() {
            tracing::error!(volname, snapname, status = %result.status, "failed to delete snapshot");
            return Ok(false);
        }
    }

    let result = client.volume_stop(volname).await?;
    if !result.is_ok() {
        tracing::error!(volname, status = %result.status, "failed to stop volume");
        return Ok(false);
    }

    if !volume_delete_and_cleanup(cluster, mnode, volname, false).await? {
        tracing::error!(volname, "unable to cleanup the volume");
        return Ok(false);
    }
    Ok(true)
}

/// Delete `volname` and remove its brick directories.
///
/// With `xfail` the delete is expected to fail, so a missing volume or a
/// rejected delete count as success.
pub async fn volume_delete_and_cleanup(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    xfail: bool,
) -> Result<bool> {
    let client = cluster.client(mnode).await?;
    let Some(info) = client.get_volume_info(volname).await? else {
        if xfail {
            tracing::info!(volname, "volume does not exist");
        } else {
            tracing::error!(volname, "unexpected: volume does not exist");
        }
        return Ok(xfail);
    };

    let result = client.volume_delete(volname).await?;
    if !result.is_ok() {
        if xfail {
            tracing::info!(volname, "volume delete failed as expected");
        } else {
            tracing::error!(volname, status = %result.status, "volume delete failed");
        }
        return Ok(xfail);
    }

    for brick in info.subvols.iter().flat_map(|sv| &sv.bricks) {
        let cmd = format!("rm -rf {}", shell_quote(&brick.path));
        if let Err(e) = cluster.run(&brick.host, &cmd).await {
            tracing::debug!(host = %brick.host, path = %brick.path, error = %e, "brick directory not removed");
        }
    }
    Ok(true)
}

/// Fetch volume info and status so both end up in the logs.
pub async fn log_volume_info_and_status(cluster: &Cluster, mnode: &str, volname: &str) -> Result<bool> {
    let client = cluster.client(mnode).await?;
    let info = client.volume_info(volname).await?;
    if !info.is_ok() {
        tracing::error!(volname, status = %info.status, "failed to get volume info");
        return Ok(false);
    }
    tracing::info!(volname, info = ?info.body, "volume info");

    let status = client.volume_status(volname).await?;
    if !status.is_ok() {
        tracing::error!(volname, status = %status.status, "failed to get volume status");
        return Ok(false);
    }
    tracing::info!(volname, volume_status = ?status.body, "volume status");
    Ok(true)
}

pub async fn verify_all_process_of_volume_are_online(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
) -> Result<bool> {
    let bricks = match get_all_bricks(cluster, mnode, volname).await? {
        Some(bricks) if !bricks.is_empty() => bricks,
        _ => {
            tracing::error!(volname, "failed to get the brick list");
            return Ok(false);
        }
    };
    if are_bricks_online(cluster, mnode, volname, &bricks).await? != Some(true) {
        tracing::error!(volname, "not all bricks of the volume are online");
        return Ok(false);
    }
    Ok(true)
}

/// Bricks of each subvolume as `host:path`; empty if the volume is unknown.
pub async fn get_subvols(cluster: &Cluster, mnode: &str, volname: &str) -> Result<Vec<Vec<String>>> {
    let client = cluster.client(mnode).await?;
    Ok(client
        .get_volume_info(volname)
        .await?
        .map(|info| {
            info.subvols
                .iter()
                .map(|sv| sv.bricks.iter().map(|b| b.host_path()).collect())
                .collect()
        })
        .unwrap_or_default())
}

pub async fn get_volume_type_info(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
) -> Result<Option<VolumeTypeInfo>> {
    let client = cluster.client(mnode).await?;
    let Some(info) = client.get_volume_info(volname).await? else {
        tracing::error!(volname, "unable to get the volume info");
        return Ok(None);
    };
    Ok(Some(VolumeTypeInfo {
        volume_type: info.volume_type,
        replica_count: info.replica_count,
        arbiter_count: info.arbiter_count,
        distribute_count: info.distribute_count,
    }))
}

/// Whether `volname` is a plain distribute volume
pub async fn is_distribute_volume(cluster: &Cluster, mnode: &str, volname: &str) -> Result<bool> {
    let Some(info) = get_volume_type_info(cluster, mnode, volname).await? else {
        tracing::error!(volname, "unable to check if the volume is distribute");
        return Ok(false);
    };
    Ok(info.volume_type.as_deref() == Some(DISTRIBUTE_TYPE))
}

/// Width of the first subvolume; `None` if the volume has none.
pub async fn get_num_of_bricks_per_subvol(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
) -> Result<Option<usize>> {
    Ok(get_subvols(cluster, mnode, volname)
        .await?
        .first()
        .map(Vec::len))
}

pub async fn get_replica_count(cluster: &Cluster, mnode: &str, volname: &str) -> Result<Option<u32>> {
    Ok(get_volume_type_info(cluster, mnode, volname)
        .await?
        .and_then(|info| info.replica_count))
}

/// Turn each option `on` and read it back, pausing `delay` between options.
pub async fn enable_and_validate_volume_options(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    options: &[&str],
    delay: Duration,
) -> Result<bool> {
    let client = cluster.client(mnode).await?;
    for (i, &option) in options.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        tracing::info!(volname, option, "setting the volume option");
        let on = BTreeMap::from([(option.to_string(), "on".to_string())]);
        if !client
            .set_volume_options(volname, &on, OptionFlags::default())
            .await?
        {
            return Ok(false);
        }

        let value = client.get_volume_options(volname, Some(option)).await?;
        let enabled = value.as_ref().is_some_and(|v| {
            let field = |key: &str| v.get(key).and_then(|f| f.as_str()).unwrap_or_default();
            field("name").contains(option) && field("value").contains("on")
        });
        if !enabled {
            tracing::error!(volname, option, reply = ?value, "option is not enabled on the volume");
            return Ok(false);
        }
        tracing::info!(volname, option, "option is enabled");
    }
    Ok(true)
}

/// Bricks to expand `volname` by `replica_count` and/or `distribute_count`.
///
/// With neither given the volume grows by one distribute subvolume. When
/// both are given the new replica set of each new subvolume is counted
/// too. New bricks are numbered after the existing ones.
#[allow(clippy::too_many_arguments)]
pub async fn form_bricks_list_to_add_brick(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    servers: &[String],
    servers_info: &BTreeMap<String, ServerInfo>,
    replica_count: Option<u32>,
    distribute_count: Option<u32>,
) -> Result<Option<Vec<String>>> {
    if !volume_exists(cluster, mnode, volname).await? {
        tracing::error!(volname, "volume doesn't exist");
        return Ok(None);
    }
    let replica_count = replica_count.unwrap_or(0);
    let mut distribute_count = distribute_count.unwrap_or(0);
    if replica_count == 0 && distribute_count == 0 {
        distribute_count = 1;
    }

    let subvols = get_subvols(cluster, mnode, volname).await?;
    let Some(width) = subvols.first().map(Vec::len).filter(|w| *w > 0) else {
        tracing::error!(volname, "no subvolumes available, cannot add bricks");
        return Ok(None);
    };
    let width = u32::try_from(width).unwrap_or(u32::MAX);
    let num_subvols = u32::try_from(subvols.len()).unwrap_or(u32::MAX);

    let count = add_brick_count(width, num_subvols, replica_count, distribute_count).ok_or_else(|| {
        gd2_client::Error::InvalidInput(format!(
            "Brick count overflows for replica {replica_count} and distribute {distribute_count}"
        ))
    })?;

    let existing = u32::try_from(subvols.iter().map(Vec::len).sum::<usize>()).unwrap_or(u32::MAX);
    let bricks =
        form_bricks_from(cluster, mnode, volname, existing, count, servers, servers_info).await?;
    if bricks.is_none() {
        tracing::error!(volname, count, "failed to form bricks list to add-brick");
    }
    Ok(bricks)
}

fn add_brick_count(width: u32, num_subvols: u32, replica: u32, distribute: u32) -> Option<u32> {
    let distribute_bricks = width.checked_mul(distribute)?;
    let replica_bricks = replica.checked_mul(num_subvols)?;
    let total = distribute_bricks.checked_add(replica_bricks)?;
    if distribute_bricks != 0 && replica_bricks != 0 {
        total.checked_add(distribute.checked_mul(replica)?)
    } else {
        Some(total)
    }
}

/// Wait until every process of `volname` is online
pub async fn wait_for_volume_process_to_be_online(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    policy: PollPolicy,
) -> Result<bool> {
    if !wait_for_bricks_to_be_online(cluster, mnode, volname, policy).await? {
        tracing::error!(volname, "failed to wait for the volume processes to be online");
        return Ok(false);
    }
    tracing::info!(volname, "volume processes are all online");
    Ok(true)
}
