// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Volume operations (`/v1/volumes`)

use std::collections::BTreeMap;

use http::StatusCode;
use serde_json::Value;

use crate::client::{NO_BODY, RestClient, RestResult};
use crate::error::Error;
use crate::transport::Method;
use crate::types::{
    BrickFlags, BrickStatus, SubvolRequest, VolumeCreateRequest, VolumeExpandRequest, VolumeInfo,
    VolumeOptionRequest, VolumeResetRequest, VolumeStartRequest, VolumeSummary,
};
use crate::validate::{parse_bricks, validate_transport};

/// Parameters of a volume create.
///
/// Bricks are `"<peerid>:<path>"`. With a replica count the bricks are
/// grouped into replicate subvols of `replica + arbiter` bricks each;
/// without one they form a single distribute subvol.
#[derive(Debug, Clone)]
pub struct VolumeCreate {
    pub name: String,
    pub bricks: Vec<String>,
    pub force: bool,
    pub replica_count: u32,
    pub arbiter_count: u32,
    pub transport: String,
    pub options: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, String>,
}

impl VolumeCreate {
    pub fn new(name: impl Into<String>, bricks: Vec<String>) -> Self {
        Self {
            name: name.into(),
            bricks,
            force: false,
            replica_count: 0,
            arbiter_count: 0,
            transport: "tcp".to_string(),
            options: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_replica(mut self, replica_count: u32, arbiter_count: u32) -> Self {
        self.replica_count = replica_count;
        self.arbiter_count = arbiter_count;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = transport.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validate and derive the request body.
    pub fn to_request(&self) -> Result<VolumeCreateRequest, Error> {
        let mut bricks = parse_bricks(&self.bricks)?;
        validate_transport(&self.transport)?;

        let subvols = if self.replica_count > 0 {
            let width = self
                .replica_count
                .checked_add(self.arbiter_count)
                .and_then(|w| usize::try_from(w).ok())
                .ok_or_else(|| {
                    Error::invalid(format!(
                        "Invalid replica set: replica {} with arbiter {}",
                        self.replica_count, self.arbiter_count
                    ))
                })?;
            if bricks.len() % width != 0 {
                return Err(Error::invalid(format!(
                    "Invalid number of bricks specified: {} is not a multiple of {}",
                    bricks.len(),
                    width
                )));
            }
            let arbiter = self.arbiter_count as usize;
            let mut subvols = Vec::with_capacity(bricks.len() / width);
            while !bricks.is_empty() {
                let mut group: Vec<_> = bricks.drain(..width).collect();
                // Arbiters are the trailing bricks of each replica set
                for brick in group.iter_mut().skip(width - arbiter) {
                    brick.brick_type = Some("arbiter".to_string());
                }
                subvols.push(SubvolRequest {
                    subvol_type: "replicate".to_string(),
                    bricks: group,
                    replica: Some(self.replica_count),
                    arbiter: Some(self.arbiter_count),
                });
            }
            subvols
        } else if self.arbiter_count > 0 {
            return Err(Error::invalid("Arbiter count requires a replica count"));
        } else {
            vec![SubvolRequest {
                subvol_type: "distribute".to_string(),
                bricks,
                replica: None,
                arbiter: None,
            }]
        };

        Ok(VolumeCreateRequest {
            name: self.name.clone(),
            subvols,
            transport: self.transport.clone(),
            options: self.options.clone(),
            force: self.force,
            metadata: self.metadata.clone(),
            flags: BrickFlags::default(),
        })
    }
}

/// Flags accompanying a volume option set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionFlags {
    pub advanced: bool,
    pub experimental: bool,
    pub deprecated: bool,
}

impl Default for OptionFlags {
    fn default() -> Self {
        Self {
            advanced: true,
            experimental: false,
            deprecated: false,
        }
    }
}

impl RestClient {
    /// Create a volume. Input is validated before any request is made.
    pub async fn volume_create(&self, create: &VolumeCreate) -> Result<RestResult, Error> {
        let body = create.to_request()?;
        self.handle_request(Method::Post, "/v1/volumes", StatusCode::CREATED, Some(&body))
            .await
    }

    pub async fn volume_start(&self, volname: &str, force: bool) -> Result<RestResult, Error> {
        let body = VolumeStartRequest {
            force_start_bricks: force,
        };
        self.handle_request(
            Method::Post,
            &format!("/v1/volumes/{}/start", volname),
            StatusCode::OK,
            Some(&body),
        )
        .await
    }

    pub async fn volume_stop(&self, volname: &str) -> Result<RestResult, Error> {
        self.handle_request(
            Method::Post,
            &format!("/v1/volumes/{}/stop", volname),
            StatusCode::OK,
            NO_BODY,
        )
        .await
    }

    /// Delete the volume definition. Brick directories are left on disk.
    pub async fn volume_delete(&self, volname: &str) -> Result<RestResult, Error> {
        self.handle_request(
            Method::Delete,
            &format!("/v1/volumes/{}", volname),
            StatusCode::NO_CONTENT,
            NO_BODY,
        )
        .await
    }

    /// Reset the named options (or all of them with `all`)
    pub async fn volume_reset(
        &self,
        volname: &str,
        options: &[String],
        force: bool,
        all: bool,
    ) -> Result<RestResult, Error> {
        let body = VolumeResetRequest {
            options: options.to_vec(),
            force,
            all,
        };
        self.handle_request(
            Method::Delete,
            &format!("/v1/volumes/{}/options", volname),
            StatusCode::OK,
            Some(&body),
        )
        .await
    }

    pub async fn volume_info(&self, volname: &str) -> Result<RestResult, Error> {
        self.get(&format!("/v1/volumes/{}", volname), StatusCode::OK)
            .await
    }

    /// Decoded volume info; `None` if the volume does not exist
    pub async fn get_volume_info(&self, volname: &str) -> Result<Option<VolumeInfo>, Error> {
        let result = self.volume_info(volname).await?;
        if !result.is_ok() {
            tracing::debug!(volname, status = %result.status, "volume info unavailable");
        }
        result.json()
    }

    pub async fn volume_status(&self, volname: &str) -> Result<RestResult, Error> {
        self.get(&format!("/v1/volumes/{}/status", volname), StatusCode::OK)
            .await
    }

    pub async fn volume_brick_status(&self, volname: &str) -> Result<RestResult, Error> {
        self.get(&format!("/v1/volumes/{}/bricks", volname), StatusCode::OK)
            .await
    }

    /// Decoded brick status listing; `None` if it could not be fetched
    pub async fn get_brick_statuses(
        &self,
        volname: &str,
    ) -> Result<Option<Vec<BrickStatus>>, Error> {
        self.volume_brick_status(volname).await?.json()
    }

    /// Volume status, or brick status with `bricks_only`
    pub async fn get_volume_status(
        &self,
        volname: &str,
        bricks_only: bool,
    ) -> Result<Option<Value>, Error> {
        let result = if bricks_only {
            self.volume_brick_status(volname).await?
        } else {
            self.volume_status(volname).await?
        };
        result.json()
    }

    pub async fn volume_list(&self) -> Result<RestResult, Error> {
        self.get("/v1/volumes", StatusCode::OK).await
    }

    /// Names of every volume; `None` if the listing failed
    pub async fn get_volume_list(&self) -> Result<Option<Vec<String>>, Error> {
        let volumes: Option<Vec<VolumeSummary>> = self.volume_list().await?.json()?;
        Ok(volumes.map(|vols| vols.into_iter().map(|v| v.name).collect()))
    }

    /// All options of a volume, or the single named one
    pub async fn get_volume_options(
        &self,
        volname: &str,
        option: Option<&str>,
    ) -> Result<Option<Value>, Error> {
        let path = match option {
            Some(option) => format!("/v1/volumes/{}/options/{}", volname, option),
            None => format!("/v1/volumes/{}/options", volname),
        };
        self.get(&path, StatusCode::OK).await?.json()
    }

    /// Set volume options. Returns whether the server accepted them.
    pub async fn set_volume_options(
        &self,
        volname: &str,
        options: &BTreeMap<String, String>,
        flags: OptionFlags,
    ) -> Result<bool, Error> {
        if options.is_empty() {
            return Err(Error::invalid("cannot set empty options"));
        }
        let body = VolumeOptionRequest {
            options: options.clone(),
            advanced: flags.advanced,
            experimental: flags.experimental,
            deprecated: flags.deprecated,
        };
        let result = self
            .handle_request(
                Method::Post,
                &format!("/v1/volumes/{}/options", volname),
                StatusCode::CREATED,
                Some(&body),
            )
            .await?;
        if let Some(err) = &result.error {
            tracing::error!(volname, status = %result.status, error = %err, "failed to set volume options");
        }
        Ok(result.is_ok())
    }

    /// Expand a volume with more bricks
    pub async fn add_brick(
        &self,
        volname: &str,
        bricks: &[String],
        replica_count: Option<u32>,
        force: bool,
    ) -> Result<RestResult, Error> {
        let bricks = parse_bricks(bricks)?;
        let body = VolumeExpandRequest {
            replica: replica_count.filter(|r| *r > 0),
            bricks,
            force,
            flags: BrickFlags::default(),
        };
        self.handle_request(
            Method::Post,
            &format!("/v1/volumes/{}/expand", volname),
            StatusCode::OK,
            Some(&body),
        )
        .await
    }
}
