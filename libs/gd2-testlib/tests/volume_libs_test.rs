// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use std::time::Duration;

use common::{MNODE, PEERS, harness, pool, servers, servers_info, volinfo};
use gd2_client::{Method, StatusCode};
use gd2_testlib::{Error, TestConfig};
use gd2_testlib::config::REPLICATED;
use gd2_testlib::volume_libs::{
    cleanup_volume, enable_and_validate_volume_options, form_bricks_list,
    form_bricks_list_to_add_brick, get_num_of_bricks_per_subvol, get_replica_count, get_subvols,
    is_distribute_volume, log_volume_info_and_status, setup_volume, volume_delete_and_cleanup,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn config() -> TestConfig {
    TestConfig::parse(
        r#"
servers: [10.0.0.1, 10.0.0.2, 10.0.0.3]
clients: [10.0.1.1]
"#,
    )
    .unwrap()
}

#[tokio::test]
async fn setup_volume_creates_replicated_volume_with_arbiter() {
    let h = harness();
    h.transport.respond(Method::Get, "/v1/peers", StatusCode::OK, pool(3, true));
    h.transport.respond(Method::Post, "/v1/volumes", StatusCode::CREATED, "{}");
    h.transport.respond(
        Method::Post,
        "/v1/volumes/testvol_replicated/start",
        StatusCode::OK,
        "{}",
    );

    let spec = config().configure_volume(REPLICATED).unwrap();
    assert!(setup_volume(&h.cluster, MNODE, &servers_info(), &spec, false).await.unwrap());

    let body = h.transport.last_body(Method::Post, "/v1/volumes").unwrap();
    assert_eq!(body["name"], "testvol_replicated");
    assert_eq!(body["transport"], "tcp");
    let bricks = body["subvols"][0]["bricks"].as_array().unwrap();
    assert_eq!(bricks.len(), 3);
    assert_eq!(bricks[0]["peerid"], PEERS[0]);
    assert_eq!(bricks[0]["path"], "/bricks/testvol_replicated_brick0");
    assert_eq!(bricks[2]["peerid"], PEERS[2]);
    assert_eq!(bricks[2]["type"], "arbiter");
    assert_eq!(body["subvols"][0]["replica"], 2);
    assert_eq!(h.transport.calls_to(Method::Post, "/v1/volumes/testvol_replicated/options"), 0);
}

#[tokio::test]
async fn setup_volume_leaves_existing_volume_alone() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "/v1/volumes/testvol_replicated",
        StatusCode::OK,
        volinfo("testvol_replicated", "Replicate", 1, 3),
    );

    let spec = config().configure_volume(REPLICATED).unwrap();
    assert!(setup_volume(&h.cluster, MNODE, &servers_info(), &spec, false).await.unwrap());
    assert_eq!(h.transport.calls_to(Method::Post, "/v1/volumes"), 0);
}

#[tokio::test]
async fn setup_volume_fails_when_server_not_in_pool() {
    let h = harness();
    h.transport.respond(Method::Get, "/v1/peers", StatusCode::OK, pool(2, true));

    let spec = config().configure_volume(REPLICATED).unwrap();
    assert!(!setup_volume(&h.cluster, MNODE, &servers_info(), &spec, false).await.unwrap());
    assert_eq!(h.transport.calls_to(Method::Post, "/v1/volumes"), 0);
}

#[tokio::test]
async fn setup_volume_reports_rejected_options() {
    let h = harness();
    h.transport.respond(Method::Get, "/v1/peers", StatusCode::OK, pool(3, true));
    h.transport.respond(Method::Post, "/v1/volumes", StatusCode::CREATED, "{}");
    h.transport.respond(
        Method::Post,
        "/v1/volumes/testvol_replicated/start",
        StatusCode::OK,
        "{}",
    );
    h.transport.respond(
        Method::Post,
        "/v1/volumes/testvol_replicated/options",
        StatusCode::BAD_REQUEST,
        r#"{"errors":[{"message":"invalid option"}]}"#,
    );

    let mut spec = config().configure_volume(REPLICATED).unwrap();
    spec.options.insert("no.such.option".to_string(), "on".to_string());
    assert!(!setup_volume(&h.cluster, MNODE, &servers_info(), &spec, false).await.unwrap());
}

#[tokio::test]
async fn form_bricks_round_robin() {
    let h = harness();
    h.transport.respond(Method::Get, "/v1/peers", StatusCode::OK, pool(3, true));

    let bricks = form_bricks_list(&h.cluster, MNODE, "vol", 4, &servers(), &servers_info())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        bricks,
        vec![
            format!("{}:/bricks/vol_brick0", PEERS[0]),
            format!("{}:/bricks/vol_brick1", PEERS[1]),
            format!("{}:/bricks/vol_brick2", PEERS[2]),
            format!("{}:/bricks/vol_brick3", PEERS[0]),
        ]
    );
    // Peer ids are looked up once per server
    assert_eq!(h.transport.calls_to(Method::Get, "/v1/peers"), 3);
}

#[tokio::test]
async fn cleanup_deletes_only_own_snapshots_then_volume_and_bricks() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "/v1/volumes/testvol",
        StatusCode::OK,
        volinfo("testvol", "Distribute", 2, 1),
    );
    h.transport.respond(
        Method::Get,
        "/v1/snapshots",
        StatusCode::OK,
        json!([
            {"parent-name": "testvol", "snaps": [{"snapinfo": {"name": "snap1"}}]},
            {"parent-name": "othervol", "snaps": [{"snapinfo": {"name": "snap2"}}]},
        ])
        .to_string(),
    );
    h.transport.respond(Method::Delete, "/v1/snapshots/snap1", StatusCode::NO_CONTENT, "");
    h.transport.respond(Method::Post, "/v1/volumes/testvol/stop", StatusCode::OK, "{}");
    h.transport.respond(Method::Delete, "/v1/volumes/testvol", StatusCode::NO_CONTENT, "");

    assert!(cleanup_volume(&h.cluster, MNODE, "testvol").await.unwrap());
    assert_eq!(h.transport.calls_to(Method::Delete, "/v1/snapshots/snap1"), 1);
    assert_eq!(h.transport.calls_to(Method::Delete, "/v1/snapshots/snap2"), 0);
    assert_eq!(h.transport.calls_to(Method::Delete, "/v1/volumes/testvol"), 1);
    assert_eq!(h.runner.commands_on("10.0.0.1"), vec!["rm -rf /bricks/testvol_brick0"]);
    assert_eq!(h.runner.commands_on("10.0.0.2"), vec!["rm -rf /bricks/testvol_brick1"]);
}

#[tokio::test]
async fn cleanup_of_missing_volume_is_a_no_op() {
    let h = harness();
    assert!(cleanup_volume(&h.cluster, MNODE, "testvol").await.unwrap());
    assert_eq!(h.transport.calls_to(Method::Post, "/v1/volumes/testvol/stop"), 0);
    assert_eq!(h.transport.calls_to(Method::Delete, "/v1/volumes/testvol"), 0);
}

#[tokio::test]
async fn cleanup_stops_at_failed_stop() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "/v1/volumes/testvol",
        StatusCode::OK,
        volinfo("testvol", "Distribute", 2, 1),
    );
    h.transport.respond(Method::Get, "/v1/snapshots", StatusCode::OK, "[]");
    h.transport.respond(
        Method::Post,
        "/v1/volumes/testvol/stop",
        StatusCode::INTERNAL_SERVER_ERROR,
        "boom",
    );

    assert!(!cleanup_volume(&h.cluster, MNODE, "testvol").await.unwrap());
    assert_eq!(h.transport.calls_to(Method::Delete, "/v1/volumes/testvol"), 0);
    assert!(h.runner.seen().is_empty());
}

#[tokio::test]
async fn delete_honours_xfail() {
    let h = harness();
    assert!(volume_delete_and_cleanup(&h.cluster, MNODE, "gone", true).await.unwrap());
    assert!(!volume_delete_and_cleanup(&h.cluster, MNODE, "gone", false).await.unwrap());

    h.transport.respond(
        Method::Get,
        "/v1/volumes/busy",
        StatusCode::OK,
        volinfo("busy", "Distribute", 1, 1),
    );
    h.transport.respond(Method::Delete, "/v1/volumes/busy", StatusCode::CONFLICT, "started");
    assert!(volume_delete_and_cleanup(&h.cluster, MNODE, "busy", true).await.unwrap());
    assert!(!volume_delete_and_cleanup(&h.cluster, MNODE, "busy", false).await.unwrap());
    assert!(h.runner.seen().is_empty());
}

#[tokio::test]
async fn layout_queries() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "/v1/volumes/dr",
        StatusCode::OK,
        volinfo("dr", "Distributed-Replicate", 2, 3),
    );
    h.transport.respond(
        Method::Get,
        "/v1/volumes/plain",
        StatusCode::OK,
        volinfo("plain", "Distribute", 4, 1),
    );

    let subvols = get_subvols(&h.cluster, MNODE, "dr").await.unwrap();
    assert_eq!(subvols.len(), 2);
    assert_eq!(subvols[1][0], "10.0.0.1:/bricks/dr_brick3");
    assert_eq!(get_num_of_bricks_per_subvol(&h.cluster, MNODE, "dr").await.unwrap(), Some(3));
    assert_eq!(get_replica_count(&h.cluster, MNODE, "dr").await.unwrap(), Some(3));
    assert!(!is_distribute_volume(&h.cluster, MNODE, "dr").await.unwrap());
    assert!(is_distribute_volume(&h.cluster, MNODE, "plain").await.unwrap());

    assert!(get_subvols(&h.cluster, MNODE, "missing").await.unwrap().is_empty());
    assert_eq!(get_num_of_bricks_per_subvol(&h.cluster, MNODE, "missing").await.unwrap(), None);
    assert!(!is_distribute_volume(&h.cluster, MNODE, "missing").await.unwrap());
}

#[tokio::test]
async fn add_brick_counts() {
    let h = harness();
    h.transport.respond(Method::Get, "/v1/peers", StatusCode::OK, pool(3, true));
    h.transport.respond(
        Method::Get,
        "/v1/volumes/dr",
        StatusCode::OK,
        volinfo("dr", "Distributed-Replicate", 2, 3),
    );
    let (servers, info) = (servers(), servers_info());

    // One more subvolume by default, numbered after the existing six bricks
    let bricks = form_bricks_list_to_add_brick(&h.cluster, MNODE, "dr", &servers, &info, None, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bricks.len(), 3);
    assert_eq!(bricks[0], format!("{}:/bricks/dr_brick6", PEERS[0]));

    let bricks = form_bricks_list_to_add_brick(&h.cluster, MNODE, "dr", &servers, &info, Some(1), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bricks.len(), 2);

    let bricks =
        form_bricks_list_to_add_brick(&h.cluster, MNODE, "dr", &servers, &info, Some(1), Some(1))
            .await
            .unwrap()
            .unwrap();
    assert_eq!(bricks.len(), 3 + 2 + 1);

    assert!(
        form_bricks_list_to_add_brick(&h.cluster, MNODE, "missing", &servers, &info, None, None)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn add_brick_count_overflow_is_invalid_input() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "/v1/volumes/dr",
        StatusCode::OK,
        volinfo("dr", "Distributed-Replicate", 2, 3),
    );

    let err = form_bricks_list_to_add_brick(
        &h.cluster,
        MNODE,
        "dr",
        &servers(),
        &servers_info(),
        None,
        Some(u32::MAX),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Client(ref e) if e.is_invalid_input()));
    assert_eq!(h.transport.calls_to(Method::Get, "/v1/peers"), 0);
}

#[tokio::test(start_paused = true)]
async fn enable_options_validates_read_back() {
    let h = harness();
    h.transport.respond(Method::Post, "/v1/volumes/testvol/options", StatusCode::CREATED, "{}");
    h.transport.respond(
        Method::Get,
        "/v1/volumes/testvol/options/features.bitrot",
        StatusCode::OK,
        r#"{"name":"features.bitrot","value":"on"}"#,
    );
    h.transport.respond(
        Method::Get,
        "/v1/volumes/testvol/options/features.quota",
        StatusCode::OK,
        r#"{"name":"features.quota","value":"off"}"#,
    );

    let start = tokio::time::Instant::now();
    assert!(
        enable_and_validate_volume_options(
            &h.cluster,
            MNODE,
            "testvol",
            &["features.bitrot"],
            Duration::from_secs(1)
        )
        .await
        .unwrap()
    );
    assert_eq!(start.elapsed(), Duration::ZERO);
    let body = h.transport.last_body(Method::Post, "/v1/volumes/testvol/options").unwrap();
    assert_eq!(body["options"], json!({"features.bitrot": "on"}));

    assert!(
        !enable_and_validate_volume_options(
            &h.cluster,
            MNODE,
            "testvol",
            &["features.bitrot", "features.quota"],
            Duration::from_secs(1)
        )
        .await
        .unwrap()
    );
}

#[tokio::test]
async fn info_and_status_logged() {
    let h = harness();
    h.transport.respond(
        Method::Get,
        "/v1/volumes/testvol",
        StatusCode::OK,
        volinfo("testvol", "Distribute", 1, 1),
    );
    assert!(!log_volume_info_and_status(&h.cluster, MNODE, "testvol").await.unwrap());

    h.transport.respond(Method::Get, "/v1/volumes/testvol/status", StatusCode::OK, "{}");
    assert!(log_volume_info_and_status(&h.cluster, MNODE, "testvol").await.unwrap());
}
