// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Snapshot operations (`/v1/snapshots`)

use http::StatusCode;

use crate::client::{NO_BODY, RestClient, RestResult};
use crate::error::Error;
use crate::transport::Method;
use crate::types::{SnapCloneRequest, SnapCreateRequest, SnapList};

impl RestClient {
    /// Snapshot `volname` as `snapname`. With `timestamp` the server
    /// appends a creation timestamp to the name.
    pub async fn snap_create(
        &self,
        volname: &str,
        snapname: &str,
        timestamp: bool,
        description: Option<&str>,
    ) -> Result<RestResult, Error> {
        let body = SnapCreateRequest {
            snapname: snapname.to_string(),
            volname: volname.to_string(),
            description: description.map(str::to_string),
            timestamp,
        };
        self.handle_request(Method::Post, "/v1/snapshots", StatusCode::CREATED, Some(&body))
            .await
    }

    pub async fn snap_activate(&self, snapname: &str) -> Result<RestResult, Error> {
        self.handle_request(
            Method::Post,
            &format!("/v1/snapshots/{}/activate", snapname),
            StatusCode::OK,
            NO_BODY,
        )
        .await
    }

    pub async fn snap_deactivate(&self, snapname: &str) -> Result<RestResult, Error> {
        self.handle_request(
            Method::Post,
            &format!("/v1/snapshots/{}/deactivate", snapname),
            StatusCode::OK,
            NO_BODY,
        )
        .await
    }

    pub async fn snap_clone(&self, snapname: &str, clonename: &str) -> Result<RestResult, Error> {
        let body = SnapCloneRequest {
            clonename: clonename.to_string(),
        };
        self.handle_request(
            Method::Post,
            &format!("/v1/snapshots/{}/clone", snapname),
            StatusCode::CREATED,
            Some(&body),
        )
        .await
    }

    /// Restore the parent volume from `snapname`. The volume must be
    /// stopped first.
    pub async fn snap_restore(&self, snapname: &str) -> Result<RestResult, Error> {
        self.handle_request(
            Method::Post,
            &format!("/v1/snapshots/{}/restore", snapname),
            StatusCode::CREATED,
            NO_BODY,
        )
        .await
    }

    pub async fn snap_info(&self, snapname: &str) -> Result<RestResult, Error> {
        self.get(&format!("/v1/snapshots/{}", snapname), StatusCode::OK)
            .await
    }

    pub async fn snap_list(&self) -> Result<RestResult, Error> {
        self.get("/v1/snapshots", StatusCode::OK).await
    }

    /// Names of all snapshots across every volume; `None` if the listing
    /// failed.
    pub async fn get_snap_list(&self) -> Result<Option<Vec<String>>, Error> {
        let lists: Option<Vec<SnapList>> = self.snap_list().await?.json()?;
        Ok(lists.map(|lists| {
            lists
                .into_iter()
                .flat_map(|list| list.snaps)
                .map(|snap| snap.volinfo.name)
                .collect()
        }))
    }

    pub async fn snap_status(&self, snapname: &str) -> Result<RestResult, Error> {
        self.get(&format!("/v1/snapshots/{}/status", snapname), StatusCode::OK)
            .await
    }

    pub async fn snap_delete(&self, snapname: &str) -> Result<RestResult, Error> {
        self.handle_request(
            Method::Delete,
            &format!("/v1/snapshots/{}", snapname),
            StatusCode::NO_CONTENT,
            NO_BODY,
        )
        .await
    }
}
