// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Shared handle on the cluster under test
//!
//! Owns the command runner, the HTTP transport, and one [`RestClient`]
//! per management node so each node's secret is read only once.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use gd2_client::{
    CommandOutput, CommandRunner, ExecError, Hosts, ReqwestTransport, RestClient, SshRunner,
    Transport,
};
use tokio::sync::Mutex;

use crate::config::RestSection;
use crate::error::{Error, Result};

pub struct Cluster {
    rest: RestSection,
    runner: Arc<dyn CommandRunner>,
    transport: Option<Arc<dyn Transport>>,
    clients: Mutex<HashMap<String, RestClient>>,
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("port", &self.rest.port)
            .field("user", &self.rest.user)
            .finish_non_exhaustive()
    }
}

impl Cluster {
    /// Cluster reached over ssh and HTTP
    pub fn new(rest: RestSection) -> Self {
        Self::with_runner(rest, Arc::new(SshRunner::new()))
    }

    pub fn with_runner(rest: RestSection, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            rest,
            runner,
            transport: None,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Route every REST call through `transport`
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Client for `mnode`, connecting on first use.
    ///
    /// The map is not held across the secret read, so first connects to
    /// different nodes run concurrently. A racing connect to the same node
    /// keeps whichever client was stored first.
    pub async fn client(&self, mnode: &str) -> Result<RestClient> {
        if let Some(client) = self.clients.lock().await.get(mnode) {
            return Ok(client.clone());
        }

        let endpoint = self.rest.endpoint(mnode);
        let transport: Arc<dyn Transport> = match &self.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(ReqwestTransport::new(endpoint.verify_tls, endpoint.timeout)?),
        };
        let client =
            RestClient::connect_with_transport(endpoint, self.runner.as_ref(), transport).await?;
        tracing::debug!(mnode, "connected to glusterd2");
        let mut clients = self.clients.lock().await;
        Ok(clients.entry(mnode.to_string()).or_insert(client).clone())
    }

    /// Run `cmd` on `host`
    pub async fn run(&self, host: &str, cmd: &str) -> std::result::Result<CommandOutput, ExecError> {
        tracing::debug!(host, cmd, "running command");
        self.runner.run(host, cmd).await
    }

    /// Run `cmd` on `host`, failing on a non-zero exit
    pub async fn run_checked(&self, host: &str, cmd: &str) -> Result<CommandOutput> {
        let output = self.run(host, cmd).await?;
        if !output.success() {
            return Err(Error::Execution {
                host: host.to_string(),
                cmd: cmd.to_string(),
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    pub async fn run_parallel(
        &self,
        hosts: impl Into<Hosts>,
        cmd: &str,
    ) -> BTreeMap<String, std::result::Result<CommandOutput, ExecError>> {
        gd2_client::run_parallel(self.runner.as_ref(), hosts, cmd).await
    }

    /// Run `cmd` everywhere; whether it succeeded on every host.
    ///
    /// Each failing host is logged with `what`.
    pub async fn run_on_all(&self, hosts: impl Into<Hosts>, cmd: &str, what: &str) -> bool {
        let mut ok = true;
        for (host, result) in self.run_parallel(hosts, cmd).await {
            match result {
                Ok(output) if output.success() => {}
                Ok(output) => {
                    tracing::error!(host = %host, status = output.status, stderr = %output.stderr.trim(), "unable to {}", what);
                    ok = false;
                }
                Err(e) => {
                    tracing::error!(host = %host, error = %e, "unable to {}", what);
                    ok = false;
                }
            }
        }
        ok
    }
}
