// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

use crate::cluster::Cluster;
use crate::error::Result;

/// Stop `volname`, restore `snapname` onto it and start it again.
pub async fn snap_restore_complete(
    cluster: &Cluster,
    mnode: &str,
    volname: &str,
    snapname: &str,
) -> Result<bool> {
    let client = cluster.client(mnode).await?;

    let result = client.volume_stop(volname).await?;
    if !result.is_ok() {
        tracing::error!(volname, snapname, mnode, status = %result.status, "failed to stop volume before restoring snapshot");
        return Ok(false);
    }

    let result = client.snap_restore(snapname).await?;
    if !result.is_ok() {
        tracing::error!(snapname, mnode, status = %result.status, "snapshot restore failed");
        return Ok(false);
    }

    let result = client.volume_start(volname, false).await?;
    if !result.is_ok() {
        tracing::error!(volname, snapname, mnode, status = %result.status, "failed to start volume after restoring snapshot");
        return Ok(false);
    }
    tracing::info!(volname, snapname, "snapshot restored");
    Ok(true)
}
