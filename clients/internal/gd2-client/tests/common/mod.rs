// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

//! In-memory doubles for the transport and command seams.

use std::sync::Arc;

use gd2_client::{Endpoint, RestClient, SecretString};

// Compiled into each test binary so the doubles need no feature flag here
#[path = "../../src/mock.rs"]
mod mock;

pub use mock::{MockRunner, MockTransport};

pub const SECRET: &str = "f3b1c2d4e5a6978812345678abcdef00";

pub fn client(transport: Arc<MockTransport>) -> RestClient {
    RestClient::with_transport(
        Endpoint::new("10.0.0.1"),
        SecretString::from(SECRET.to_string()),
        transport,
    )
    .unwrap()
}

pub const PEER1: &str = "11111111-1111-4111-8111-111111111111";
pub const PEER2: &str = "22222222-2222-4222-8222-222222222222";
pub const PEER3: &str = "33333333-3333-4333-8333-333333333333";

/// Brick status listing with the given online flags
pub fn brick_statuses(volname: &str, online: &[bool]) -> String {
    let bricks: Vec<_> = online
        .iter()
        .enumerate()
        .map(|(i, up)| {
            serde_json::json!({
                "info": {
                    "id": format!("brick-{i}"),
                    "path": format!("/bricks/{volname}_brick{i}"),
                    "peer-id": ([PEER1, PEER2, PEER3][i % 3]),
                    "host": format!("10.0.0.{}", i % 3 + 1),
                    "volume-name": volname,
                },
                "online": up,
                "pid": if *up { 4000 + i as i64 } else { 0 },
                "port": if *up { 49152 + i as i64 } else { 0 },
            })
        })
        .collect();
    serde_json::to_string(&bricks).unwrap()
}

/// Pool listing of `(name, address, online)` entries
pub fn pool(peers: &[(&str, &str, bool)]) -> String {
    let peers: Vec<_> = peers
        .iter()
        .enumerate()
        .map(|(i, (name, addr, online))| {
            serde_json::json!({
                "id": ([PEER1, PEER2, PEER3][i % 3]),
                "name": name,
                "peer-addresses": [format!("{addr}:24008")],
                "client-addresses": ["127.0.0.1:24007", format!("{addr}:24007")],
                "online": online,
                "metadata": {"_zone": ([PEER1, PEER2, PEER3][i % 3])},
            })
        })
        .collect();
    serde_json::to_string(&peers).unwrap()
}
