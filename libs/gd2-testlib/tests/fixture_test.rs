// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Config loading and the per-class context

mod common;

use std::io::Write;

use common::harness;
use gd2_testlib::config::{CONFIG_ENV, GLUSTERFS, REPLICATED};
use gd2_testlib::{Error, GlusterTestContext, TestConfig};
use pretty_assertions::assert_eq;
use serial_test::serial;

const CONFIG: &str = r#"
servers: [10.0.0.1, 10.0.0.2, 10.0.0.3]
clients: [10.0.1.1, 10.0.1.2]
servers_info:
  10.0.0.1: {host: 10.0.0.1, brick_root: /bricks}
  10.0.0.2: {host: 10.0.0.2, brick_root: /bricks}
  10.0.0.3: {host: 10.0.0.3, brick_root: /bricks}
clients_info:
  10.0.1.1: {host: 10.0.1.1}
  10.0.1.2: {host: 10.0.1.2}
glustotest_run_id: run42
gluster:
  client_gluster_logs_info:
    files: [/var/log/glusterfs/mnt.log]
"#;

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn setup_class_resolves_volume_mounts_and_marks_logs() {
    let file = config_file(CONFIG);
    let config = TestConfig::from_file(file.path()).unwrap();
    let h = harness();

    let ctx = GlusterTestContext::setup_class(
        config,
        h.cluster,
        Some(REPLICATED),
        Some(GLUSTERFS),
        "TestHeal",
    )
    .await
    .unwrap();

    assert_eq!(ctx.mnode, "10.0.0.1");
    assert_eq!(ctx.volname(), Some("testvol_replicated"));
    assert_eq!(ctx.run_id, "run42");
    assert_eq!(ctx.servers_ips.len(), 3);
    assert!(ctx.servers_ips.iter().all(Option::is_some));
    assert_eq!(ctx.mounts.len(), 2);
    assert!(ctx.mounts.iter().all(|m| m.mountpoint == "/mnt/testvol_replicated_glusterfs"));
    assert_eq!(ctx.clients, vec!["10.0.1.1", "10.0.1.2"]);

    let marker = "Setupclass: TestHeal : run42";
    for host in ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.1.1", "10.0.1.2"] {
        let cmds = h.runner.commands_on(host);
        assert_eq!(cmds.len(), 1, "{host}");
        assert!(cmds[0].contains(marker), "{host}: {}", cmds[0]);
    }
    assert!(h.runner.commands_on("10.0.1.1")[0].contains("/var/log/glusterfs/mnt.log"));

    assert!(ctx.setup("test_heal_full").await);
    assert!(ctx.teardown("test_heal_full").await);
    assert!(ctx.teardown_class().await);
    let cmds = h.runner.commands_on("10.0.0.2");
    assert!(cmds[1].contains("Starting Test : test_heal_full : run42"));
    assert!(cmds[2].contains("Ending Test: test_heal_full : run42"));
    assert!(cmds[3].contains("Teardownclass: TestHeal : run42"));
}

#[tokio::test]
async fn setup_class_without_mount_type_leaves_clients_unmarked() {
    let config = TestConfig::parse(CONFIG).unwrap();
    let h = harness();

    let ctx = GlusterTestContext::setup_class(config, h.cluster, Some(REPLICATED), None, "TestPlain")
        .await
        .unwrap();
    assert!(ctx.mounts.is_empty());
    assert_eq!(ctx.clients, vec!["10.0.1.1", "10.0.1.2"]);
    assert!(h.runner.commands_on("10.0.1.1").is_empty());
    assert_eq!(h.runner.commands_on("10.0.0.1").len(), 1);
}

#[tokio::test]
async fn setup_class_requires_clients_info() {
    let config = TestConfig::parse(
        r#"
servers: [10.0.0.1]
clients: [10.0.1.1]
servers_info:
  10.0.0.1: {host: 10.0.0.1, brick_root: /bricks}
"#,
    )
    .unwrap();
    let h = harness();

    let err = GlusterTestContext::setup_class(config, h.cluster, None, None, "TestX")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(ref m) if m.contains("clients_info")));
    assert!(h.runner.seen().is_empty());
}

#[tokio::test]
async fn setup_class_rejects_unknown_volume_type() {
    let config = TestConfig::parse(CONFIG).unwrap();
    let h = harness();
    let err = GlusterTestContext::setup_class(config, h.cluster, Some("disperse"), None, "TestX")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn run_id_is_generated_once() {
    let mut config = TestConfig::parse("servers: [10.0.0.1]").unwrap();
    let first = config.run_id().to_string();
    assert_eq!(first.split('_').count(), 5);
    assert_eq!(config.run_id(), first);
}

#[test]
#[serial]
fn config_from_env() {
    let file = config_file(CONFIG);
    // SAFETY: #[serial] keeps other environment readers from running concurrently
    unsafe { std::env::set_var(CONFIG_ENV, file.path()) };
    let config = TestConfig::from_env().unwrap();
    assert_eq!(config.servers.len(), 3);

    unsafe { std::env::remove_var(CONFIG_ENV) };
    assert!(matches!(TestConfig::from_env(), Err(Error::Config(_))));
}

#[test]
fn config_from_missing_file() {
    assert!(matches!(
        TestConfig::from_file("/nonexistent/gd2-test.yml"),
        Err(Error::Io(_))
    ));
}
