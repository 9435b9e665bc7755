// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! glusterd2 functional test helpers
//!
//! Builds on [`gd2_client`] with the orchestration a test run needs:
//! loading the cluster description, forming and tearing down volumes,
//! moving bricks and peers between states, mounting clients, and marking
//! the gluster logs as tests start and end.
//!
//! ```ignore
//! use gd2_testlib::{Cluster, GlusterTestContext, TestConfig};
//! use gd2_testlib::volume_libs::{cleanup_volume, setup_volume};
//!
//! gd2_testlib::init_logging();
//! let config = TestConfig::from_env()?;
//! let cluster = Cluster::new(config.rest.clone());
//! let ctx = GlusterTestContext::setup_class(config, cluster, Some("replicated"), Some("glusterfs"), "TestHeal").await?;
//!
//! let volume = ctx.volume.as_ref().expect("volume type given");
//! assert!(setup_volume(&ctx.cluster, &ctx.mnode, &ctx.servers_info, volume, ctx.volume_create_force).await?);
//! ctx.setup("test_heal_full").await;
//! // ...
//! ctx.teardown("test_heal_full").await;
//! cleanup_volume(&ctx.cluster, &ctx.mnode, &volume.name).await?;
//! ctx.teardown_class().await;
//! ```
//!
//! Helpers return `Ok(false)` when the cluster refused or did not reach
//! the wanted state, and `Err` only when they could not ask at all.

pub mod brick_libs;
pub mod cluster;
pub mod config;
pub mod error;
pub mod fixture;
pub mod glusterd;
pub mod hosts;
pub mod logs;
pub mod mount_ops;
pub mod peer_libs;
pub mod snap_libs;
pub mod volume_libs;

pub use cluster::Cluster;
pub use config::{TestConfig, VolumeSpec};
pub use error::{Error, Result};
pub use fixture::{GlusterTestContext, RunsOn};
pub use glusterd::GlusterdState;
pub use mount_ops::GlusterMount;

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call from every test; only the first call installs.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
