// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Run markers in gluster logs, so a failing test can be located in the
//! server and client logs afterwards.

use gd2_client::Hosts;

use crate::cluster::Cluster;
use crate::config::{GLUSTERFS, LogTargets};

fn escape(msg: &str) -> String {
    msg.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

/// Shell command appending `msg` to each `*.log` under `dirs` and to each
/// of `files`.
pub fn inject_command(msg: &str, dirs: &[String], files: &[String]) -> String {
    let msg = escape(msg);
    let mut cmd = String::new();
    if !dirs.is_empty() {
        cmd.push_str(&format!(
            "for dir in {} ; do for file in `find ${{dir}} -type f -name '*.log'`; do echo \"{}\" >> ${{file}} ; done ; done; ",
            dirs.join(" "),
            msg
        ));
    }
    if !files.is_empty() {
        cmd.push_str(&format!(
            "for file in {} ; do echo \"{}\" >> ${{file}} ; done; ",
            files.join(" "),
            msg
        ));
    }
    cmd
}

/// Append `msg` to logs on every node; whether it landed everywhere.
pub async fn inject_msg_in_logs(
    cluster: &Cluster,
    nodes: impl Into<Hosts>,
    msg: &str,
    dirs: &[String],
    files: &[String],
) -> bool {
    let cmd = inject_command(msg, dirs, files);
    if cmd.is_empty() {
        return true;
    }
    cluster.run_on_all(nodes, &cmd, "inject log message").await
}

/// Mark server logs, and client logs too for glusterfs mounts.
pub async fn inject_msg_in_gluster_logs(
    cluster: &Cluster,
    msg: &str,
    servers: &[String],
    clients: &[String],
    mount_type: Option<&str>,
    targets: &LogTargets,
) -> bool {
    let mut ok = inject_msg_in_logs(
        cluster,
        servers,
        msg,
        &targets.server_dirs,
        &targets.server_files,
    )
    .await;

    if mount_type.is_some_and(|m| m.contains(GLUSTERFS)) && !clients.is_empty() {
        ok &= inject_msg_in_logs(
            cluster,
            clients,
            msg,
            &targets.client_dirs,
            &targets.client_files,
        )
        .await;
    }
    ok
}
