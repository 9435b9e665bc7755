// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Per-class test context
//!
//! [`GlusterTestContext`] resolves everything a class of tests needs from
//! the [`TestConfig`] once, and marks the gluster logs as the class and
//! each of its tests start and end. [`RunsOn`] picks which
//! `(volume_type, mount_type)` combinations a class runs against.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use crate::cluster::Cluster;
use crate::config::{
    ClientInfo, LogTargets, MOUNT_TYPES, MountConfig, ServerInfo, TestConfig, VOLUME_TYPES,
    VolumeSpec,
};
use crate::error::{Error, Result};
use crate::hosts::get_ip_from_hostname;
use crate::logs::inject_msg_in_gluster_logs;
use crate::mount_ops::{GlusterMount, create_mount_objs};

/// Selection keyword meaning every available option
pub const ALL: &str = "ALL";

pub struct GlusterTestContext {
    pub class_name: String,
    pub cluster: Cluster,
    pub servers: Vec<String>,
    /// Clients the mounts live on, or every configured client without mounts
    pub clients: Vec<String>,
    pub servers_info: BTreeMap<String, ServerInfo>,
    pub clients_info: BTreeMap<String, ClientInfo>,
    /// Node gluster requests are sent to
    pub mnode: String,
    pub servers_ips: Vec<Option<IpAddr>>,
    pub volume_type: Option<String>,
    pub mount_type: Option<String>,
    pub volume: Option<VolumeSpec>,
    pub volume_create_force: bool,
    pub mounts_config: Vec<MountConfig>,
    pub mounts: Vec<GlusterMount>,
    pub logs: LogTargets,
    pub run_id: String,
}

impl std::fmt::Debug for GlusterTestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlusterTestContext")
            .field("class_name", &self.class_name)
            .field("mnode", &self.mnode)
            .field("volume_type", &self.volume_type)
            .field("mount_type", &self.mount_type)
            .field("run_id", &self.run_id)
            .finish_non_exhaustive()
    }
}

impl GlusterTestContext {
    /// Resolve the class context and mark its start in the gluster logs.
    ///
    /// Fails with [`Error::Config`] when `servers`, `clients`,
    /// `servers_info` or `clients_info` is missing.
    pub async fn setup_class(
        mut config: TestConfig,
        cluster: Cluster,
        volume_type: Option<&str>,
        mount_type: Option<&str>,
        class_name: &str,
    ) -> Result<Self> {
        for entity in ["servers", "clients", "servers_info", "clients_info"] {
            config.require(entity)?;
        }
        let servers = config.servers.clone();
        let mut mnode = servers
            .first()
            .cloned()
            .ok_or_else(|| Error::config("'servers' not defined in the global config"))?;
        let servers_ips = get_ip_from_hostname(&servers).await;

        let volume = match volume_type {
            Some(volume_type) => {
                let spec = config.configure_volume(volume_type)?;
                if let Some(node) = spec.mnode() {
                    mnode = node.to_string();
                }
                Some(spec)
            }
            None => None,
        };

        let mut clients = config.clients.clone();
        let mut mounts_config = Vec::new();
        let mut mounts = Vec::new();
        if let (Some(mount_type), Some(volume)) = (mount_type, &volume) {
            mounts_config = config.configure_mounts(&mnode, &volume.name, mount_type)?;
            mounts = create_mount_objs(&mounts_config)?;
            clients = mounts_config
                .iter()
                .filter_map(|m| m.client.as_ref().map(|c| c.host.clone()))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
        }

        let run_id = config.run_id().to_string();
        tracing::info!(run_id = %run_id, "glusto test run id");

        let ctx = Self {
            class_name: class_name.to_string(),
            cluster,
            servers,
            clients,
            servers_info: config.servers_info.clone(),
            clients_info: config.clients_info.clone(),
            mnode,
            servers_ips,
            volume_type: volume_type.map(str::to_string),
            mount_type: mount_type.map(str::to_string),
            volume,
            volume_create_force: config.gluster.volume_create_force,
            mounts_config,
            mounts,
            logs: config.log_targets(),
            run_id,
        };
        tracing::debug!(context = ?ctx, "test class context");

        ctx.mark(&format!("Setupclass: {} : {}", ctx.class_name, ctx.run_id))
            .await;
        Ok(ctx)
    }

    /// Volume name of the class, when it runs on a volume
    pub fn volname(&self) -> Option<&str> {
        self.volume.as_ref().map(|v| v.name.as_str())
    }

    async fn mark(&self, msg: &str) -> bool {
        tracing::info!("{}", msg);
        inject_msg_in_gluster_logs(
            &self.cluster,
            msg,
            &self.servers,
            &self.clients,
            self.mount_type.as_deref(),
            &self.logs,
        )
        .await
    }

    pub async fn setup(&self, test_id: &str) -> bool {
        self.mark(&format!("Starting Test : {} : {}", test_id, self.run_id))
            .await
    }

    pub async fn teardown(&self, test_id: &str) -> bool {
        self.mark(&format!("Ending Test: {} : {}", test_id, self.run_id))
            .await
    }

    pub async fn teardown_class(&self) -> bool {
        self.mark(&format!("Teardownclass: {} : {}", self.class_name, self.run_id))
            .await
    }
}

/// Volume and mount types a test class supports.
///
/// [`ALL`] stands for every known option. The combinations actually run
/// are these limits intersected with `running_on_volumes` and
/// `running_on_mounts` from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunsOn {
    pub volume_types: Vec<String>,
    pub mount_types: Vec<String>,
}

impl RunsOn {
    pub fn new(volume_types: &[&str], mount_types: &[&str]) -> Self {
        Self {
            volume_types: volume_types.iter().map(|s| s.to_string()).collect(),
            mount_types: mount_types.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn all() -> Self {
        Self::new(&[ALL], &[ALL])
    }

    /// Every `(volume_type, mount_type)` to run, in selection order.
    pub fn matrix(&self, config: &TestConfig) -> Vec<(String, String)> {
        let volumes = select(
            &self.volume_types,
            &config.gluster.running_on_volumes,
            VOLUME_TYPES,
        );
        let mounts = select(
            &self.mount_types,
            &config.gluster.running_on_mounts,
            MOUNT_TYPES,
        );
        volumes
            .iter()
            .flat_map(|v| mounts.iter().map(move |m| (v.clone(), m.clone())))
            .collect()
    }
}

fn select(limits: &[String], running: &[String], available: &[&str]) -> Vec<String> {
    let running: Vec<String> = if running.is_empty() {
        available.iter().map(|s| s.to_string()).collect()
    } else {
        running.to_vec()
    };
    if limits.iter().any(|l| l == ALL) {
        return running;
    }
    running
        .into_iter()
        .filter(|r| limits.contains(r))
        .collect()
}
