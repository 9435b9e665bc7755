// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Management node addressing

use std::time::Duration;

use secrecy::SecretString;

/// Default glusterd2 REST port
pub const DEFAULT_PORT: u16 = 24007;

/// Where glusterd2 keeps its shared secret on every node
pub const SECRET_PATH: &str = "/var/lib/glusterd2/auth";

/// Default per-request HTTP timeout (seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A management node and the credentials used to sign requests to it
#[derive(Clone, Debug)]
pub struct Endpoint {
    /// Hostname or IP of the management node
    pub host: String,
    /// REST port
    pub port: u16,
    /// Issuer placed in every token
    pub user: String,
    /// Shared secret; read from [`SECRET_PATH`] on `host` when absent
    pub secret: Option<SecretString>,
    /// Verify TLS certificates (only relevant behind an HTTPS proxy)
    pub verify_tls: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Endpoint {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: gd2_auth::DEFAULT_ISSUER.to_string(),
            secret: None,
            verify_tls: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_secret(mut self, secret: SecretString) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `http://host:port`
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}
