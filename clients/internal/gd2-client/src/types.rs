// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! glusterd2 request and response bodies
//!
//! Only the fields the helpers read are modelled; everything is
//! `#[serde(default)]` so newer servers with extra or missing fields still
//! decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A member of the trusted storage pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Peer {
    pub id: String,
    pub name: String,
    #[serde(rename = "peer-addresses")]
    pub peer_addresses: Vec<String>,
    #[serde(rename = "client-addresses")]
    pub client_addresses: Vec<String>,
    pub online: bool,
    pub metadata: BTreeMap<String, String>,
}

/// Brick as reported inside volume info and brick status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickInfo {
    pub id: String,
    pub path: String,
    #[serde(rename = "peer-id")]
    pub peer_id: String,
    pub host: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub brick_type: Option<String>,
    #[serde(rename = "volume-name")]
    pub volume_name: String,
}

impl BrickInfo {
    /// `host:path`, the form test cases name bricks by
    pub fn host_path(&self) -> String {
        format!("{}:{}", self.host, self.path)
    }

    /// Whether `brick` (`host:path` or `peerid:path`) names this brick.
    pub fn is(&self, brick: &str) -> bool {
        match brick.split_once(':') {
            Some((node, path)) => path == self.path && (node == self.host || node == self.peer_id),
            None => false,
        }
    }
}

/// One entry of `GET /v1/volumes/{name}/bricks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickStatus {
    pub info: BrickInfo,
    pub online: bool,
    pub pid: i64,
    pub port: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subvol {
    pub name: String,
    #[serde(rename = "type")]
    pub subvol_type: String,
    pub bricks: Vec<BrickInfo>,
    #[serde(rename = "replica-count")]
    pub replica_count: u32,
    #[serde(rename = "arbiter-count")]
    pub arbiter_count: u32,
}

/// `GET /v1/volumes/{name}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    pub transport: String,
    pub state: String,
    #[serde(rename = "distribute-count", skip_serializing_if = "Option::is_none")]
    pub distribute_count: Option<u32>,
    #[serde(rename = "replica-count", skip_serializing_if = "Option::is_none")]
    pub replica_count: Option<u32>,
    #[serde(rename = "arbiter-count", skip_serializing_if = "Option::is_none")]
    pub arbiter_count: Option<u32>,
    pub subvols: Vec<Subvol>,
    pub options: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, String>,
}

impl VolumeInfo {
    /// Every brick of the volume as `host:path`, in subvol order
    pub fn brick_list(&self) -> Vec<String> {
        self.subvols
            .iter()
            .flat_map(|sv| sv.bricks.iter().map(BrickInfo::host_path))
            .collect()
    }
}

/// Entry of `GET /v1/volumes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSummary {
    pub id: String,
    pub name: String,
}

/// Entry of `GET /v1/snapshots`, grouped by parent volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapList {
    #[serde(rename = "parent-name")]
    pub parent_name: String,
    pub snaps: Vec<SnapInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapInfo {
    #[serde(rename = "snapinfo")]
    pub volinfo: VolumeInfo,
    #[serde(rename = "parent-volume")]
    pub parent_volume: String,
    pub description: String,
    #[serde(rename = "created-at")]
    pub created_at: String,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerAddRequest {
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerEditRequest {
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub brick_type: Option<String>,
    pub peerid: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubvolRequest {
    #[serde(rename = "type")]
    pub subvol_type: String,
    pub bricks: Vec<BrickRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arbiter: Option<u32>,
}

/// Flags understood by create and expand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickFlags {
    #[serde(rename = "create-brick-dir")]
    pub create_brick_dir: bool,
}

impl Default for BrickFlags {
    fn default() -> Self {
        Self {
            create_brick_dir: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeCreateRequest {
    pub name: String,
    pub subvols: Vec<SubvolRequest>,
    pub transport: String,
    pub options: BTreeMap<String, String>,
    pub force: bool,
    pub metadata: BTreeMap<String, String>,
    pub flags: BrickFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeStartRequest {
    #[serde(rename = "force-start-bricks")]
    pub force_start_bricks: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeExpandRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica: Option<u32>,
    pub bricks: Vec<BrickRequest>,
    pub force: bool,
    pub flags: BrickFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeOptionRequest {
    pub options: BTreeMap<String, String>,
    #[serde(rename = "allow-advanced-options")]
    pub advanced: bool,
    #[serde(rename = "allow-experimental-options")]
    pub experimental: bool,
    #[serde(rename = "allow-deprecated-options")]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeResetRequest {
    pub options: Vec<String>,
    pub force: bool,
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapCreateRequest {
    pub snapname: String,
    pub volname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapCloneRequest {
    pub clonename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceAddRequest {
    pub device: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceEditRequest {
    pub state: String,
}
