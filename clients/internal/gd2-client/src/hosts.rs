// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Host sets and name resolution

use std::collections::HashSet;
use std::net::IpAddr;

/// One or many host names, normalized into a single sequence.
///
/// Functions that act on "a server or a list of servers" take
/// `impl Into<Hosts>`, so both `"server1"` and `vec![...]` are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hosts(Vec<String>);

impl Hosts {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.0.iter().any(|h| h == host)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Copy of this set with `host` removed.
    pub fn without(&self, host: &str) -> Hosts {
        Hosts(self.0.iter().filter(|h| *h != host).cloned().collect())
    }
}

impl From<&str> for Hosts {
    fn from(host: &str) -> Self {
        Hosts(vec![host.to_string()])
    }
}

impl From<String> for Hosts {
    fn from(host: String) -> Self {
        Hosts(vec![host])
    }
}

impl From<&String> for Hosts {
    fn from(host: &String) -> Self {
        Hosts(vec![host.clone()])
    }
}

impl From<Vec<String>> for Hosts {
    fn from(hosts: Vec<String>) -> Self {
        Hosts(hosts)
    }
}

impl From<&[String]> for Hosts {
    fn from(hosts: &[String]) -> Self {
        Hosts(hosts.to_vec())
    }
}

impl From<&Vec<String>> for Hosts {
    fn from(hosts: &Vec<String>) -> Self {
        Hosts(hosts.clone())
    }
}

impl From<Vec<&str>> for Hosts {
    fn from(hosts: Vec<&str>) -> Self {
        Hosts(hosts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Hosts {
    fn from(hosts: &[&str]) -> Self {
        Hosts(hosts.iter().map(|h| h.to_string()).collect())
    }
}

impl From<&Hosts> for Hosts {
    fn from(hosts: &Hosts) -> Self {
        hosts.clone()
    }
}

impl FromIterator<String> for Hosts {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Hosts(iter.into_iter().collect())
    }
}

impl IntoIterator for Hosts {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Resolve `host` to its addresses. Failures resolve to an empty list.
pub async fn resolve_host(host: &str) -> Vec<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return vec![ip];
    }
    match tokio::net::lookup_host((host, 0)).await {
        Ok(addrs) => unique_ips(addrs.map(|a| a.ip())),
        Err(e) => {
            tracing::debug!(host, error = %e, "failed to resolve host");
            Vec::new()
        }
    }
}

/// First occurrence of each address, in resolver order
fn unique_ips(addrs: impl Iterator<Item = IpAddr>) -> Vec<IpAddr> {
    let mut seen = HashSet::new();
    addrs.filter(|ip| seen.insert(*ip)).collect()
}

/// Host part of a `host:port` address (`[v6]:port` and bare hosts accepted).
pub fn address_host(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[')
        && let Some(end) = rest.find(']')
    {
        return &rest[..end];
    }
    match addr.rsplit_once(':') {
        // A second colon means a bare IPv6 address, not host:port
        Some((host, _)) if !host.contains(':') => host,
        _ => addr,
    }
}
