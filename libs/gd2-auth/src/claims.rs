// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Claim set carried by every request token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Token lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 1;

/// Claims minted for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer (the client identity, e.g. `glustercli`)
    pub iss: String,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Hex SHA-256 of `METHOD&path`
    pub qsh: String,
}

impl Claims {
    /// Build the claim set for `method` + `path` issued at `now`.
    pub fn new(issuer: &str, method: &str, path: &str, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: issuer.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
            qsh: query_string_hash(method, path),
        }
    }

    /// Whether these claims are bound to `method` + `path`.
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.qsh == query_string_hash(method, path)
    }
}

/// Compute the URI tampering hash: `hex(sha256(METHOD "&" path))`.
///
/// The method is used as given; glusterd2 expects the upper-case verb.
pub fn query_string_hash(method: &str, path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"&");
    hasher.update(path.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
