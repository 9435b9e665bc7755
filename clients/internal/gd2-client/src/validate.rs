// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Input validation shared by the REST operations
//!
//! Everything here runs before any request is built; failures surface as
//! [`Error::InvalidInput`].

use uuid::Uuid;

use crate::error::Error;
use crate::types::BrickRequest;

/// Transports glusterd2 accepts for a volume
pub const TRANSPORTS: &[&str] = &["tcp", "rdma", "tcp,rdma"];

pub fn is_uuid(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

pub fn validate_peer_id(peerid: &str) -> Result<(), Error> {
    if is_uuid(peerid) {
        Ok(())
    } else {
        Err(Error::invalid(format!("Invalid peer id {:?}", peerid)))
    }
}

pub fn validate_transport(transport: &str) -> Result<(), Error> {
    if TRANSPORTS.contains(&transport) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "Transport type {} not supported",
            transport
        )))
    }
}

/// Parse `["<peerid>:<path>", ...]` into brick requests.
pub fn parse_bricks<S: AsRef<str>>(bricks: &[S]) -> Result<Vec<BrickRequest>, Error> {
    if bricks.is_empty() {
        return Err(Error::invalid("Bricks cannot be empty"));
    }
    bricks
        .iter()
        .map(|brick| {
            let brick = brick.as_ref();
            match brick.split(':').collect::<Vec<_>>().as_slice() {
                [peerid, path] if is_uuid(peerid) && !path.is_empty() => Ok(BrickRequest {
                    brick_type: None,
                    peerid: peerid.to_string(),
                    path: path.to_string(),
                }),
                _ => Err(Error::invalid(format!(
                    "Invalid brick {:?}, bricks should be in form of <peerid>:<path>",
                    brick
                ))),
            }
        })
        .collect()
}
