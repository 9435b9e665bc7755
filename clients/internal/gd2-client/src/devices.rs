// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Device operations (`/v1/devices`)

use http::StatusCode;

use crate::client::{RestClient, RestResult};
use crate::error::Error;
use crate::transport::Method;
use crate::types::{DeviceAddRequest, DeviceEditRequest};
use crate::validate::validate_peer_id;

/// Device states accepted by `device_edit`
pub const DEVICE_STATES: &[&str] = &["enabled", "disabled"];

fn validate_device(device: &str) -> Result<(), Error> {
    if device.trim().is_empty() {
        return Err(Error::invalid(format!("Invalid device specified {:?}", device)));
    }
    Ok(())
}

fn device_path(peerid: &str, device: &str) -> String {
    format!("/v1/devices/{}/{}", peerid, urlencoding::encode(device))
}

impl RestClient {
    /// Register `device` (e.g. `/dev/vdb`) on a peer
    pub async fn device_add(&self, peerid: &str, device: &str) -> Result<RestResult, Error> {
        validate_peer_id(peerid)?;
        validate_device(device)?;
        let body = DeviceAddRequest {
            device: device.to_string(),
        };
        self.handle_request(
            Method::Post,
            &format!("/v1/devices/{}", peerid),
            StatusCode::CREATED,
            Some(&body),
        )
        .await
    }

    pub async fn device_info(&self, peerid: &str, device: &str) -> Result<RestResult, Error> {
        validate_peer_id(peerid)?;
        validate_device(device)?;
        self.get(&device_path(peerid, device), StatusCode::OK).await
    }

    pub async fn devices_in_peer(&self, peerid: &str) -> Result<RestResult, Error> {
        validate_peer_id(peerid)?;
        self.get(&format!("/v1/devices/{}", peerid), StatusCode::OK)
            .await
    }

    pub async fn devices(&self) -> Result<RestResult, Error> {
        self.get("/v1/devices", StatusCode::OK).await
    }

    /// Enable or disable a device
    pub async fn device_edit(
        &self,
        peerid: &str,
        device: &str,
        state: &str,
    ) -> Result<RestResult, Error> {
        validate_peer_id(peerid)?;
        validate_device(device)?;
        if !DEVICE_STATES.contains(&state) {
            return Err(Error::invalid(format!(
                "Invalid device state {:?}, expected enabled or disabled",
                state
            )));
        }
        let body = DeviceEditRequest {
            state: state.to_string(),
        };
        self.handle_request(
            Method::Post,
            &device_path(peerid, device),
            StatusCode::CREATED,
            Some(&body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_path_encodes_device() {
        assert_eq!(
            device_path("7d8c2a1e-0c55-4a43-9a44-0d1b1ebc6b1f", "/dev/vdb"),
            "/v1/devices/7d8c2a1e-0c55-4a43-9a44-0d1b1ebc6b1f/%2Fdev%2Fvdb"
        );
    }

    #[test]
    fn test_blank_device_rejected() {
        assert!(validate_device("").is_err());
        assert!(validate_device("  ").is_err());
        assert!(validate_device("/dev/vdb").is_ok());
    }
}
