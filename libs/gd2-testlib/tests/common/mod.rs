// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

//! A three-server cluster scripted in memory.

use std::collections::BTreeMap;
use std::sync::Arc;

use gd2_testlib::Cluster;
use gd2_testlib::config::{RestSection, ServerInfo};
use gd2_client::mock::{MockRunner, MockTransport};
use secrecy::SecretString;
use serde_json::json;

pub const MNODE: &str = "10.0.0.1";
pub const SERVERS: [&str; 3] = ["10.0.0.1", "10.0.0.2", "10.0.0.3"];
pub const PEERS: [&str; 3] = [
    "11111111-1111-4111-8111-111111111111",
    "22222222-2222-4222-8222-222222222222",
    "33333333-3333-4333-8333-333333333333",
];

pub struct Harness {
    pub cluster: Cluster,
    pub transport: Arc<MockTransport>,
    pub runner: Arc<MockRunner>,
}

/// Cluster whose REST calls and commands are all scripted
pub fn harness() -> Harness {
    let transport = MockTransport::new();
    let runner = MockRunner::new();
    let rest = RestSection {
        secret: Some(SecretString::from("f3b1c2d4e5a6978812345678abcdef00".to_string())),
        ..RestSection::default()
    };
    let cluster = Cluster::with_runner(rest, runner.clone()).with_transport(transport.clone());
    Harness {
        cluster,
        transport,
        runner,
    }
}

pub fn servers() -> Vec<String> {
    SERVERS.iter().map(|s| s.to_string()).collect()
}

pub fn servers_info() -> BTreeMap<String, ServerInfo> {
    SERVERS
        .iter()
        .map(|s| {
            (
                s.to_string(),
                ServerInfo {
                    host: s.to_string(),
                    brick_root: "/bricks".to_string(),
                    devices: vec!["/dev/vdb".to_string()],
                },
            )
        })
        .collect()
}

/// Pool listing containing the first `n` servers, online or not
pub fn pool(n: usize, online: bool) -> String {
    let peers: Vec<_> = (0..n)
        .map(|i| {
            json!({
                "id": PEERS[i],
                "name": format!("server{}", i + 1),
                "peer-addresses": [format!("{}:24008", SERVERS[i])],
                "client-addresses": ["127.0.0.1:24007", format!("{}:24007", SERVERS[i])],
                "online": online,
            })
        })
        .collect();
    serde_json::to_string(&peers).unwrap()
}

fn brick(volname: &str, i: usize) -> serde_json::Value {
    json!({
        "id": format!("brick-{i}"),
        "path": format!("/bricks/{volname}_brick{i}"),
        "peer-id": PEERS[i % 3],
        "host": SERVERS[i % 3],
        "volume-name": volname,
    })
}

/// Volume info with `subvols` subvolumes `width` bricks wide
pub fn volinfo(volname: &str, voltype: &str, subvols: usize, width: usize) -> String {
    let subvols: Vec<_> = (0..subvols)
        .map(|s| {
            json!({
                "name": format!("{volname}-subvol-{s}"),
                "type": if width > 1 { "Replicate" } else { "Distribute" },
                "bricks": (0..width).map(|b| brick(volname, s * width + b)).collect::<Vec<_>>(),
                "replica-count": width,
            })
        })
        .collect();
    json!({
        "id": "5b4c3a2e-6f7e-4d8c-9b0a-1c2d3e4f5a6b",
        "name": volname,
        "type": voltype,
        "transport": "tcp",
        "state": "Started",
        "distribute-count": subvols.len(),
        "replica-count": width,
        "subvols": subvols,
    })
    .to_string()
}

/// Brick status listing; brick `i` is online when `online[i]` is set
pub fn brick_statuses(volname: &str, online: &[bool]) -> String {
    let statuses: Vec<_> = online
        .iter()
        .enumerate()
        .map(|(i, up)| json!({"info": brick(volname, i), "online": up, "pid": 0, "port": 0}))
        .collect();
    serde_json::to_string(&statuses).unwrap()
}
