// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Client mounts of gluster volumes

use gd2_client::CommandOutput;

use crate::cluster::Cluster;
use crate::config::{GLUSTERFS, MountConfig};
use crate::error::{Error, Result};

/// One mount of a volume on a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlusterMount {
    pub mount_type: String,
    pub mountpoint: String,
    pub server: String,
    pub client: String,
    pub volname: String,
    pub options: String,
}

impl TryFrom<&MountConfig> for GlusterMount {
    type Error = Error;

    fn try_from(mount: &MountConfig) -> Result<Self> {
        fn required<T: Clone>(value: &Option<T>, key: &str) -> Result<T> {
            value
                .clone()
                .ok_or_else(|| Error::config(format!("Missing key {}", key)))
        }

        let mount_type = required(&mount.protocol, "protocol")?;
        let mountpoint = required(&mount.mountpoint, "mountpoint")?;
        let server = required(&mount.server, "server")?;
        let client = required(&mount.client, "client")?;
        let volname = required(&mount.volname, "volname")?;
        let options = required(&mount.options, "options")?;

        let mountpoint = if mountpoint.is_empty() {
            format!("/mnt/{}", mount_type)
        } else {
            mountpoint
        };
        Ok(Self {
            mount_type,
            mountpoint,
            server,
            client: client.host,
            volname,
            options,
        })
    }
}

impl GlusterMount {
    pub async fn mount(&self, cluster: &Cluster) -> bool {
        match mount_volume(
            cluster,
            &self.volname,
            &self.mount_type,
            &self.mountpoint,
            &self.server,
            &self.client,
            &self.options,
        )
        .await
        {
            Ok(output) if output.success() => true,
            Ok(output) => {
                tracing::error!(client = %self.client, mountpoint = %self.mountpoint, stderr = %output.stderr.trim(), "failed to mount the volume");
                false
            }
            Err(e) => {
                tracing::error!(client = %self.client, mountpoint = %self.mountpoint, error = %e, "failed to mount the volume");
                false
            }
        }
    }

    pub async fn is_mounted(&self, cluster: &Cluster) -> bool {
        is_volume_mounted(
            cluster,
            &self.volname,
            &self.mountpoint,
            &self.server,
            &self.client,
            &self.mount_type,
        )
        .await
    }

    pub async fn unmount(&self, cluster: &Cluster) -> bool {
        match umount_volume(cluster, &self.client, &self.mountpoint).await {
            Ok(output) if output.success() => true,
            Ok(output) => {
                tracing::error!(client = %self.client, mountpoint = %self.mountpoint, stderr = %output.stderr.trim(), "failed to unmount the volume");
                false
            }
            Err(e) => {
                tracing::error!(client = %self.client, mountpoint = %self.mountpoint, error = %e, "failed to unmount the volume");
                false
            }
        }
    }
}

/// Whether `mclient` has `volname` from `mserver` mounted at `mpoint`
pub async fn is_volume_mounted(
    cluster: &Cluster,
    volname: &str,
    mpoint: &str,
    mserver: &str,
    mclient: &str,
    mtype: &str,
) -> bool {
    if [volname, mpoint, mserver, mclient, mtype]
        .iter()
        .any(|p| p.is_empty())
    {
        tracing::error!("missing arguments for mount check");
        return false;
    }
    let cmd = format!(
        "mount | grep {} | grep {} | grep \"{}\"",
        volname, mpoint, mserver
    );
    let mounted = cluster
        .run(mclient, &cmd)
        .await
        .is_ok_and(|o| o.success());
    if mounted {
        tracing::debug!(volname, client = mclient, mountpoint = mpoint, "volume is mounted");
    } else {
        tracing::error!(volname, client = mclient, mountpoint = mpoint, "volume is not mounted");
    }
    mounted
}

/// Mount command for `server:/volname` at `mpoint`
pub fn mount_command(volname: &str, mtype: &str, mpoint: &str, mserver: &str, options: &str) -> String {
    if options.is_empty() {
        format!("mount -t {} {}:/{} {}", mtype, mserver, volname, mpoint)
    } else {
        format!(
            "mount -t {} -o {} {}:/{} {}",
            mtype, options, mserver, volname, mpoint
        )
    }
}

/// Mount `volname` on `mclient`, creating the mountpoint first.
///
/// An existing mount is reported as a successful run without touching the
/// client.
pub async fn mount_volume(
    cluster: &Cluster,
    volname: &str,
    mtype: &str,
    mpoint: &str,
    mserver: &str,
    mclient: &str,
    options: &str,
) -> Result<CommandOutput> {
    if is_volume_mounted(cluster, volname, mpoint, mserver, mclient, mtype).await {
        tracing::debug!(volname, mountpoint = mpoint, "volume is already mounted");
        return Ok(CommandOutput::default());
    }

    cluster
        .run(mclient, &format!("test -d {} || mkdir -p {}", mpoint, mpoint))
        .await?;
    let output = cluster
        .run(mclient, &mount_command(volname, mtype, mpoint, mserver, options))
        .await?;
    Ok(output)
}

/// Unmount `mpoint`, falling back to a forced then a lazy unmount.
pub async fn umount_volume(cluster: &Cluster, mclient: &str, mpoint: &str) -> Result<CommandOutput> {
    let cmd = format!(
        "umount {} || umount -f {} || umount -l {}",
        mpoint, mpoint, mpoint
    );
    Ok(cluster.run(mclient, &cmd).await?)
}

/// Expand mount configs into mounts.
///
/// glusterfs mounts default their mountpoint to `/mnt/<volname>_<protocol>`.
/// A config with `num_of_mounts > 1` yields that many mounts suffixed
/// `_1`, `_2`, ... unless its mountpoint is `*`.
pub fn create_mount_objs(mounts: &[MountConfig]) -> Result<Vec<GlusterMount>> {
    let mut objs = Vec::new();
    for mount in mounts {
        let mut config = mount.clone();
        if config.protocol.as_deref() == Some(GLUSTERFS)
            && config.mountpoint.as_deref().is_none_or(str::is_empty)
        {
            config.mountpoint = Some(format!(
                "/mnt/{}_{}",
                config.volname.as_deref().unwrap_or_default(),
                GLUSTERFS
            ));
        }

        let count = mount.num_of_mounts.unwrap_or(1).max(1);
        if count == 1 {
            objs.push(GlusterMount::try_from(&config)?);
            continue;
        }
        let base = config.mountpoint.clone().unwrap_or_default();
        for n in 1..=count {
            if base != "*" {
                config.mountpoint = Some(format!("{}_{}", base, n));
            }
            objs.push(GlusterMount::try_from(&config)?);
        }
    }
    Ok(objs)
}

/// Mount every mount; whether all succeeded.
pub async fn create_mounts(cluster: &Cluster, mounts: &[GlusterMount]) -> bool {
    let mut ok = true;
    for mount in mounts {
        ok &= mount.mount(cluster).await;
    }
    ok
}

pub async fn unmount_mounts(cluster: &Cluster, mounts: &[GlusterMount]) -> bool {
    let mut ok = true;
    for mount in mounts {
        ok &= mount.unmount(cluster).await;
    }
    ok
}
