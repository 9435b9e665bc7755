// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Convergence pollers
//!
//! Cluster state changes (bricks coming up, peers joining) are
//! asynchronous. [`wait_until`] re-evaluates a predicate at a fixed
//! interval until it holds or the budget runs out. Running out is a normal
//! outcome reported as `false`.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::client::RestClient;
use crate::error::Error;
use crate::hosts::Hosts;
use crate::peers::{PeerSelector, selectors};

/// Fixed-interval polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    /// Bound on evaluations when `interval` is zero
    pub max_checks: u64,
}

impl PollPolicy {
    pub const DEFAULT_MAX_CHECKS: u64 = 200;

    /// Brick convergence: every 10s for up to 5 minutes
    pub const BRICKS: PollPolicy = PollPolicy {
        interval: Duration::from_secs(10),
        timeout: Duration::from_secs(300),
        max_checks: Self::DEFAULT_MAX_CHECKS,
    };

    /// Peer convergence: every second for up to 200 seconds
    pub const PEERS: PollPolicy = PollPolicy {
        interval: Duration::from_secs(1),
        timeout: Duration::from_secs(200),
        max_checks: Self::DEFAULT_MAX_CHECKS,
    };

    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            max_checks: Self::DEFAULT_MAX_CHECKS,
        }
    }

    pub const fn with_max_checks(mut self, max_checks: u64) -> Self {
        self.max_checks = max_checks;
        self
    }

    /// Number of predicate evaluations the budget allows (at least one).
    ///
    /// A zero interval polls back to back, up to `max_checks` times.
    pub fn checks(&self) -> u64 {
        if self.interval.is_zero() {
            return self.max_checks.max(1);
        }
        let checks = self.timeout.as_millis() / self.interval.as_millis().max(1);
        u64::try_from(checks).unwrap_or(u64::MAX).max(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::BRICKS
    }
}

/// Poll `predicate` under `policy`.
///
/// Returns `true` as soon as one evaluation yields `Ok(true)`. An `Err`
/// counts as "not yet". No sleep follows the last evaluation.
pub async fn wait_until<F, Fut, E>(policy: PollPolicy, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: Display,
{
    let checks = policy.checks();
    for attempt in 1..=checks {
        match predicate().await {
            Ok(true) => {
                tracing::debug!(attempt, "converged");
                return true;
            }
            Ok(false) => tracing::debug!(attempt, checks, "not converged yet"),
            Err(e) => tracing::debug!(attempt, checks, error = %e, "poll read failed"),
        }
        if attempt < checks {
            tokio::time::sleep(policy.interval).await;
        }
    }
    tracing::debug!(checks, timeout = ?policy.timeout, "gave up waiting");
    false
}

/// Whether every named brick of `volname` is online.
///
/// An empty `bricks` means every brick the server lists. A failed read is
/// reported as `Ok(false)`.
pub async fn bricks_online(
    client: &RestClient,
    volname: &str,
    bricks: &[String],
) -> Result<bool, Error> {
    let Some(statuses) = client.get_brick_statuses(volname).await? else {
        tracing::debug!(volname, "brick status unavailable");
        return Ok(false);
    };
    if bricks.is_empty() {
        return Ok(!statuses.is_empty() && statuses.iter().all(|s| s.online));
    }
    Ok(bricks.iter().all(|brick| {
        statuses
            .iter()
            .any(|status| status.info.is(brick) && status.online)
    }))
}

/// Whether every server appears in the pool with `online: true`
pub async fn peers_connected(client: &RestClient, servers: impl Into<Hosts>) -> Result<bool, Error> {
    let servers: Hosts = servers.into();
    peers_connected_in(client, &selectors(&servers).await).await
}

/// [`peers_connected`] over already-resolved selectors
pub async fn peers_connected_in(
    client: &RestClient,
    selectors: &[PeerSelector],
) -> Result<bool, Error> {
    let Some(pool) = client.get_pool().await? else {
        return Ok(false);
    };
    for selector in selectors {
        match selector.find(&pool) {
            Some(peer) if peer.online => {}
            Some(_) => {
                tracing::debug!(server = selector.name(), "peer is not connected");
                return Ok(false);
            }
            None => {
                tracing::debug!(server = selector.name(), "peer is not in the pool");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Whether none of `selectors` remain in the pool
pub async fn peers_detached_in(
    client: &RestClient,
    selectors: &[PeerSelector],
) -> Result<bool, Error> {
    let Some(pool) = client.get_pool().await? else {
        return Ok(false);
    };
    Ok(selectors.iter().all(|s| s.find(&pool).is_none()))
}

pub async fn peers_detached(client: &RestClient, servers: impl Into<Hosts>) -> Result<bool, Error> {
    let servers: Hosts = servers.into();
    peers_detached_in(client, &selectors(&servers).await).await
}

/// Wait under `policy` for the named bricks of `volname` (all of them when empty).
pub async fn wait_for_bricks_online(
    client: &RestClient,
    volname: &str,
    bricks: &[String],
    policy: PollPolicy,
) -> bool {
    let online = wait_until(policy, || bricks_online(client, volname, bricks)).await;
    if online {
        tracing::info!(volname, "all bricks are online");
    } else {
        tracing::error!(volname, timeout = ?policy.timeout, "bricks did not come online");
    }
    online
}

pub async fn wait_for_peers_connected(
    client: &RestClient,
    servers: impl Into<Hosts>,
    policy: PollPolicy,
) -> bool {
    let servers: Hosts = servers.into();
    // Resolved once; only the pool listing is re-read per check.
    let selectors = selectors(&servers).await;
    let connected = wait_until(policy, || peers_connected_in(client, &selectors)).await;
    if !connected {
        tracing::error!(servers = ?servers.as_slice(), "peers are not connected");
    }
    connected
}

pub async fn wait_for_peers_detached(
    client: &RestClient,
    servers: impl Into<Hosts>,
    policy: PollPolicy,
) -> bool {
    let servers: Hosts = servers.into();
    let selectors = selectors(&servers).await;
    let detached = wait_until(policy, || peers_detached_in(client, &selectors)).await;
    if !detached {
        tracing::error!(servers = ?servers.as_slice(), "peers are still in the pool");
    }
    detached
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use test_case::test_case;

    #[test_case(PollPolicy::BRICKS, 30 ; "bricks")]
    #[test_case(PollPolicy::PEERS, 200 ; "peers")]
    #[test_case(PollPolicy::new(Duration::from_secs(10), Duration::from_secs(5)), 1 ; "timeout below interval")]
    #[test_case(PollPolicy::new(Duration::ZERO, Duration::from_secs(5)), 200 ; "zero interval")]
    #[test_case(PollPolicy::new(Duration::ZERO, Duration::ZERO).with_max_checks(7), 7 ; "zero interval capped")]
    #[test_case(PollPolicy::new(Duration::ZERO, Duration::ZERO).with_max_checks(0), 1 ; "zero cap still reads once")]
    fn test_checks(policy: PollPolicy, expected: u64) {
        assert_eq!(policy.checks(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_exhausts_budget() {
        let calls = Arc::new(AtomicU64::new(0));
        let start = tokio::time::Instant::now();
        let c = calls.clone();
        let ok = wait_until(PollPolicy::BRICKS, move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(false)
            }
        })
        .await;
        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 30);
        assert_eq!(start.elapsed(), Duration::from_secs(290));
    }

    #[tokio::test]
    async fn test_zero_interval_converges_on_later_read() {
        let mut reads = 0u64;
        let ok = wait_until(PollPolicy::new(Duration::ZERO, Duration::from_secs(200)), || {
            reads += 1;
            let read = reads;
            async move { Ok::<_, Error>(read == 2) }
        })
        .await;
        assert!(ok);
        assert_eq!(reads, 2);
    }

    #[tokio::test]
    async fn test_zero_interval_stops_at_max_checks() {
        let mut reads = 0u64;
        let policy = PollPolicy::new(Duration::ZERO, Duration::ZERO).with_max_checks(5);
        let ok = wait_until(policy, || {
            reads += 1;
            async { Ok::<_, Error>(false) }
        })
        .await;
        assert!(!ok);
        assert_eq!(reads, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_counts_errors_as_pending() {
        let mut n = 0u32;
        let ok = wait_until(PollPolicy::new(Duration::from_secs(1), Duration::from_secs(5)), || {
            n += 1;
            let attempt = n;
            async move {
                if attempt < 3 {
                    Err(Error::Transport("connection refused".to_string()))
                } else {
                    Ok(true)
                }
            }
        })
        .await;
        assert!(ok);
        assert_eq!(n, 3);
    }
}
