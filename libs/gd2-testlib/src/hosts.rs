// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

use std::net::IpAddr;

use gd2_client::Hosts;
use gd2_client::hosts::resolve_host;

/// Address of each node, in order; `None` where resolution failed.
///
/// IPv4 addresses are preferred when a name resolves to both families.
pub async fn get_ip_from_hostname(nodes: impl Into<Hosts>) -> Vec<Option<IpAddr>> {
    let nodes: Hosts = nodes.into();
    let mut ips = Vec::with_capacity(nodes.len());
    for node in nodes.iter() {
        let addrs = resolve_host(node).await;
        let ip = addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied();
        if ip.is_none() {
            tracing::error!(host = node, "failed to get the IP of host");
        }
        ips.push(ip);
    }
    ips
}
