// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Test-run configuration
//!
//! A YAML file describes the cluster under test: servers and clients, the
//! volume and mount layouts to exercise, the log files that receive run
//! markers, and the REST credentials. The path comes from
//! `GD2_TEST_CONFIG` (see [`TestConfig::from_env`]) or is given directly.
//!
//! ```yaml
//! servers: [server1, server2, server3]
//! clients: [client1]
//! servers_info:
//!   server1: {host: server1, brick_root: /bricks, devices: [/dev/vdb]}
//! clients_info:
//!   client1: {host: client1}
//! gluster:
//!   running_on_volumes: [replicated]
//!   volume_create_force: true
//! rest:
//!   port: 24007
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use gd2_client::Endpoint;
use rand::seq::IndexedRandom;
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "GD2_TEST_CONFIG";

/// Log written by glusterd2 on every node
pub const GLUSTERD_LOG: &str = "/var/log/glusterd2/glusterd2.log";

pub const DISTRIBUTED: &str = "distributed";
pub const REPLICATED: &str = "replicated";
pub const DISTRIBUTED_REPLICATED: &str = "distributed-replicated";
pub const GLUSTERFS: &str = "glusterfs";

/// Volume types a test may run on
pub const VOLUME_TYPES: &[&str] = &[DISTRIBUTED, REPLICATED, DISTRIBUTED_REPLICATED];
/// Mount protocols a test may run on
pub const MOUNT_TYPES: &[&str] = &[GLUSTERFS];

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub servers: Vec<String>,
    pub clients: Vec<String>,
    pub servers_info: BTreeMap<String, ServerInfo>,
    pub clients_info: BTreeMap<String, ClientInfo>,
    pub gluster: GlusterSection,
    /// Marker written into gluster logs; generated once when absent
    pub glustotest_run_id: Option<String>,
    pub rest: RestSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    pub host: String,
    /// Directory under which brick directories are created
    pub brick_root: String,
    pub devices: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub host: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GlusterSection {
    /// Overrides for the built-in volume type layouts
    pub volume_types: BTreeMap<String, VolumeType>,
    /// Fully specified volumes, matched by `voltype.type`
    pub volumes: Vec<VolumeConfig>,
    pub mounts: Vec<MountConfig>,
    pub running_on_volumes: Vec<String>,
    pub running_on_mounts: Vec<String>,
    pub volume_create_force: bool,
    pub server_gluster_logs_info: LogsInfo,
    pub client_gluster_logs_info: LogsInfo,
}

/// Brick layout of a volume type
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct VolumeType {
    #[serde(rename = "type")]
    pub volume_type: String,
    #[serde(default)]
    pub dist_count: Option<u32>,
    #[serde(default)]
    pub replica_count: Option<u32>,
    #[serde(default)]
    pub arbiter_count: Option<u32>,
    #[serde(default)]
    pub transport: Option<String>,
}

impl VolumeType {
    pub fn new(volume_type: &str) -> Self {
        Self {
            volume_type: volume_type.to_string(),
            transport: Some("tcp".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub name: Option<String>,
    pub voltype: Option<VolumeType>,
    pub servers: Option<Vec<String>>,
    pub options: BTreeMap<String, String>,
}

/// One mount entry; unset fields are filled in by
/// [`TestConfig::configure_mounts`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub protocol: Option<String>,
    pub volname: Option<String>,
    pub server: Option<String>,
    pub client: Option<ClientInfo>,
    pub mountpoint: Option<String>,
    pub options: Option<String>,
    pub num_of_mounts: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogsInfo {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RestSection {
    pub port: u16,
    pub user: String,
    pub verify_tls: bool,
    /// Shared secret; read from each node when absent
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: Option<SecretString>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secret: Option<String> = Option::deserialize(deserializer)?;
    Ok(secret.filter(|s| !s.is_empty()).map(SecretString::from))
}

impl Default for RestSection {
    fn default() -> Self {
        Self {
            port: gd2_client::DEFAULT_PORT,
            user: "glustercli".to_string(),
            verify_tls: false,
            secret: None,
        }
    }
}

impl RestSection {
    pub fn endpoint(&self, host: &str) -> Endpoint {
        let endpoint = Endpoint::new(host)
            .with_port(self.port)
            .with_user(self.user.clone())
            .with_verify_tls(self.verify_tls);
        match &self.secret {
            Some(secret) => endpoint.with_secret(secret.clone()),
            None => endpoint,
        }
    }
}

/// Volume selected for a test run
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeSpec {
    pub name: String,
    pub voltype: VolumeType,
    pub servers: Vec<String>,
    pub options: BTreeMap<String, String>,
}

impl VolumeSpec {
    /// Management node for this volume
    pub fn mnode(&self) -> Option<&str> {
        self.servers.first().map(String::as_str)
    }
}

/// Where run markers are written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogTargets {
    pub server_dirs: Vec<String>,
    pub server_files: Vec<String>,
    pub client_dirs: Vec<String>,
    pub client_files: Vec<String>,
}

/// Built-in layouts for each volume type
pub fn builtin_volume_types() -> BTreeMap<String, VolumeType> {
    BTreeMap::from([
        (
            DISTRIBUTED.to_string(),
            VolumeType {
                dist_count: Some(4),
                ..VolumeType::new(DISTRIBUTED)
            },
        ),
        (
            REPLICATED.to_string(),
            VolumeType {
                replica_count: Some(2),
                arbiter_count: Some(1),
                ..VolumeType::new(REPLICATED)
            },
        ),
        (
            DISTRIBUTED_REPLICATED.to_string(),
            VolumeType {
                dist_count: Some(2),
                replica_count: Some(3),
                ..VolumeType::new(DISTRIBUTED_REPLICATED)
            },
        ),
    ])
}

/// Run identifier in `%H_%M_%d_%m_%Y` form
pub fn new_run_id() -> String {
    chrono::Local::now().format("%H_%M_%d_%m_%Y").to_string()
}

impl TestConfig {
    /// Load the file named by `GD2_TEST_CONFIG`
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map_err(|_| Error::config(format!("{} environment variable required", CONFIG_ENV)))?;
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&contents)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded test config");
        Ok(config)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Fail unless `entity` is present and non-empty.
    pub fn require(&self, entity: &str) -> Result<()> {
        let present = match entity {
            "servers" => !self.servers.is_empty(),
            "clients" => !self.clients.is_empty(),
            "servers_info" => !self.servers_info.is_empty(),
            "clients_info" => !self.clients_info.is_empty(),
            _ => false,
        };
        if present {
            Ok(())
        } else {
            Err(Error::config(format!(
                "'{}' not defined in the global config",
                entity
            )))
        }
    }

    /// Run identifier, generated on first use
    pub fn run_id(&mut self) -> &str {
        self.glustotest_run_id.get_or_insert_with(new_run_id)
    }

    /// Built-in volume layouts with configured overrides applied
    pub fn volume_types(&self) -> BTreeMap<String, VolumeType> {
        let mut types = builtin_volume_types();
        for (name, layout) in &self.gluster.volume_types {
            if let Some(slot) = types.get_mut(name) {
                *slot = layout.clone();
            }
        }
        types
    }

    /// Resolve the volume a test of `volume_type` runs on.
    ///
    /// A matching entry under `gluster.volumes` wins; otherwise the layout
    /// comes from [`TestConfig::volume_types`]. Names default to
    /// `testvol_<type>`, servers to every configured server.
    pub fn configure_volume(&self, volume_type: &str) -> Result<VolumeSpec> {
        let default_name = format!("testvol_{}", volume_type);

        let configured = self.gluster.volumes.iter().find(|v| {
            v.voltype
                .as_ref()
                .is_some_and(|t| t.volume_type == volume_type)
        });

        let spec = match configured {
            Some(volume) => VolumeSpec {
                name: volume.name.clone().unwrap_or(default_name),
                // find() matched on voltype, so it is set
                voltype: volume.voltype.clone().unwrap_or_default(),
                servers: volume.servers.clone().unwrap_or_else(|| self.servers.clone()),
                options: volume.options.clone(),
            },
            None => {
                let voltype = self.volume_types().remove(volume_type).ok_or_else(|| {
                    Error::config(format!(
                        "Unable to get configs of volume type: {}",
                        volume_type
                    ))
                })?;
                VolumeSpec {
                    name: default_name,
                    voltype,
                    servers: self.servers.clone(),
                    options: BTreeMap::new(),
                }
            }
        };

        if spec.servers.is_empty() {
            return Err(Error::config(format!(
                "no servers for volume {}",
                spec.name
            )));
        }
        Ok(spec)
    }

    /// Resolve the mounts of `volname` for `mount_type`.
    ///
    /// Configured entries for the protocol are completed with defaults
    /// (server `mnode`, mountpoint `/mnt/<volname>_<type>`, a random client,
    /// no options). Without any, one mount per configured client is made.
    pub fn configure_mounts(
        &self,
        mnode: &str,
        volname: &str,
        mount_type: &str,
    ) -> Result<Vec<MountConfig>> {
        let default_mountpoint = format!("/mnt/{}_{}", volname, mount_type);
        let clients: Vec<&ClientInfo> = self.clients_info.values().collect();

        let mut mounts = Vec::new();
        for mount in &self.gluster.mounts {
            if mount.protocol.as_deref() != Some(mount_type) {
                continue;
            }
            if let Some(name) = mount.volname.as_deref()
                && !name.is_empty()
                && name != volname
            {
                continue;
            }
            let client = match &mount.client {
                Some(client) if !client.host.is_empty() => client.clone(),
                _ => (*clients.choose(&mut rand::rng()).ok_or_else(|| {
                    Error::config("no clients_info to choose a mount client from")
                })?)
                .clone(),
            };
            mounts.push(MountConfig {
                protocol: Some(mount_type.to_string()),
                volname: Some(volname.to_string()),
                server: non_empty(&mount.server).or_else(|| Some(mnode.to_string())),
                client: Some(client),
                mountpoint: non_empty(&mount.mountpoint)
                    .or_else(|| Some(default_mountpoint.clone())),
                options: Some(mount.options.clone().unwrap_or_default()),
                num_of_mounts: mount.num_of_mounts,
            });
        }

        if mounts.is_empty() {
            mounts = clients
                .iter()
                .map(|client| MountConfig {
                    protocol: Some(mount_type.to_string()),
                    volname: Some(volname.to_string()),
                    server: Some(mnode.to_string()),
                    client: Some((*client).clone()),
                    mountpoint: Some(default_mountpoint.clone()),
                    options: Some(String::new()),
                    num_of_mounts: None,
                })
                .collect();
        }
        Ok(mounts)
    }

    /// Log locations that receive run markers, defaulting to the
    /// glusterd2 log.
    pub fn log_targets(&self) -> LogTargets {
        let or_default = |v: &Vec<String>| {
            if v.is_empty() {
                vec![GLUSTERD_LOG.to_string()]
            } else {
                v.clone()
            }
        };
        let server = &self.gluster.server_gluster_logs_info;
        let client = &self.gluster.client_gluster_logs_info;
        LogTargets {
            server_dirs: or_default(&server.dirs),
            server_files: server.files.clone(),
            client_dirs: or_default(&client.dirs),
            client_files: or_default(&client.files),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
