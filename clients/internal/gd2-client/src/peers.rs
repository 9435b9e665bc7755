// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Peer operations (`/v1/peers`)

use std::collections::BTreeMap;
use std::net::IpAddr;

use http::StatusCode;

use crate::client::{NO_BODY, RestClient, RestResult};
use crate::error::Error;
use crate::hosts::{Hosts, address_host, resolve_host};
use crate::transport::Method;
use crate::types::{Peer, PeerAddRequest, PeerEditRequest};

/// Identifies the pool entry for a server given by name or address.
#[derive(Debug, Clone)]
pub struct PeerSelector {
    name: String,
    addrs: Vec<IpAddr>,
}

impl PeerSelector {
    /// Select by name only, without DNS
    pub fn by_name(server: impl Into<String>) -> Self {
        Self {
            name: server.into(),
            addrs: Vec::new(),
        }
    }

    /// Select by name and by every address `server` resolves to
    pub async fn resolve(server: &str) -> Self {
        Self {
            name: server.to_string(),
            addrs: resolve_host(server).await,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, peer: &Peer) -> bool {
        if peer.name == self.name {
            return true;
        }
        peer.client_addresses
            .iter()
            .chain(peer.peer_addresses.iter())
            .map(|addr| address_host(addr))
            .any(|host| {
                host == self.name
                    || host
                        .parse::<IpAddr>()
                        .is_ok_and(|ip| self.addrs.contains(&ip))
            })
    }

    pub fn find<'a>(&self, pool: &'a [Peer]) -> Option<&'a Peer> {
        pool.iter().find(|peer| self.matches(peer))
    }
}

/// Resolve every server once, up front.
pub async fn selectors(servers: &Hosts) -> Vec<PeerSelector> {
    let mut out = Vec::with_capacity(servers.len());
    for server in servers.iter() {
        out.push(PeerSelector::resolve(server).await);
    }
    out
}

impl RestClient {
    /// Probe `server` into the pool
    pub async fn peer_probe(&self, server: &str) -> Result<RestResult, Error> {
        let body = PeerAddRequest {
            addresses: vec![server.to_string()],
        };
        self.handle_request(Method::Post, "/v1/peers", StatusCode::CREATED, Some(&body))
            .await
    }

    /// List the pool
    pub async fn pool_list(&self) -> Result<RestResult, Error> {
        self.get("/v1/peers", StatusCode::OK).await
    }

    /// Decoded pool listing; `None` if the listing failed
    pub async fn get_pool(&self) -> Result<Option<Vec<Peer>>, Error> {
        self.pool_list().await?.json()
    }

    /// Status of the whole pool, or of one peer.
    ///
    /// Asking for a server that is not in the pool yields a 404 result
    /// rather than an error.
    pub async fn peer_status(&self, peer: Option<&str>) -> Result<RestResult, Error> {
        let Some(server) = peer else {
            return self.pool_list().await;
        };
        let id = self.get_peer_id(server).await?;
        let path = match id {
            Some(id) => format!("/v1/peers/{}", id),
            None => {
                tracing::warn!(server, "peer not found in pool");
                format!("/v1/peers/{}", urlencoding::encode(server))
            }
        };
        self.get(&path, StatusCode::OK).await
    }

    /// Detach `server` from the pool
    pub async fn peer_detach(&self, server: &str) -> Result<RestResult, Error> {
        let Some(id) = self.get_peer_id(server).await? else {
            tracing::error!(server, "failed to peer detach: not in pool");
            return Ok(RestResult {
                status: StatusCode::NOT_FOUND,
                body: None,
                error: Some(format!("peer {} not found", server)),
            });
        };
        let result = self
            .handle_request(
                Method::Delete,
                &format!("/v1/peers/{}", id),
                StatusCode::NO_CONTENT,
                NO_BODY,
            )
            .await?;
        if !result.is_ok() {
            tracing::error!(server, status = %result.status, "failed to peer detach");
        }
        Ok(result)
    }

    /// Set the zone metadata of a peer
    pub async fn peer_edit(&self, peerid: &str, zone: &str) -> Result<RestResult, Error> {
        crate::validate::validate_peer_id(peerid)?;
        let body = PeerEditRequest {
            metadata: BTreeMap::from([("zone".to_string(), zone.to_string())]),
        };
        self.handle_request(
            Method::Post,
            &format!("/v1/peers/{}", peerid),
            StatusCode::CREATED,
            Some(&body),
        )
        .await
    }

    /// Peer id of `server`; `None` when it is not in the pool.
    pub async fn get_peer_id(&self, server: &str) -> Result<Option<String>, Error> {
        let selector = PeerSelector::resolve(server).await;
        let Some(pool) = self.get_pool().await? else {
            return Ok(None);
        };
        Ok(selector.find(&pool).map(|peer| peer.id.clone()))
    }

    /// Names of every node in the pool; `None` if the listing failed
    pub async fn nodes_from_pool_list(&self) -> Result<Option<Vec<String>>, Error> {
        let pool = self.get_pool().await?;
        if pool.is_none() {
            tracing::error!(host = %self.host(), "unable to get nodes from the pool list");
        }
        Ok(pool.map(|peers| peers.into_iter().map(|p| p.name).collect()))
    }

    /// Whether every server is in the pool and online.
    pub async fn is_peer_connected(&self, servers: impl Into<Hosts>) -> Result<bool, Error> {
        let servers: Hosts = servers.into();
        let selectors = selectors(&servers).await;
        crate::convergence::peers_connected_in(self, &selectors).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn peer(name: &str, client: &[&str]) -> Peer {
        Peer {
            id: format!("id-{name}"),
            name: name.to_string(),
            client_addresses: client.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_selector_matches_name_and_address() {
        let pool = vec![
            peer("server1", &["127.0.0.1:24007", "10.0.0.1:24007"]),
            peer("server2", &["127.0.0.1:24007", "10.0.0.2:24007"]),
        ];
        assert_eq!(PeerSelector::by_name("server2").find(&pool).unwrap().id, "id-server2");
        assert_eq!(PeerSelector::by_name("10.0.0.1").find(&pool).unwrap().id, "id-server1");
        assert!(PeerSelector::by_name("server3").find(&pool).is_none());
    }

    #[test]
    fn test_selector_matches_resolved_ip() {
        let pool = vec![peer("gd2-node-a", &["10.0.0.7:24007"])];
        let selector = PeerSelector {
            name: "node-a.example".to_string(),
            addrs: vec!["10.0.0.7".parse().unwrap()],
        };
        assert!(selector.find(&pool).is_some());
    }
}
