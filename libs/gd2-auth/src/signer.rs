// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! HS256 token minting and verification

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::claims::Claims;
use crate::error::AuthError;

/// Default clock skew tolerated when verifying, in seconds.
pub const DEFAULT_LEEWAY_SECS: u64 = 1;

/// Mints a fresh bearer token for each request.
#[derive(Clone)]
pub struct TokenSigner {
    issuer: String,
    secret: SecretString,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer for `issuer` keyed by the cluster's shared secret.
    pub fn new(issuer: impl Into<String>, secret: SecretString) -> Result<Self, AuthError> {
        if secret.expose_secret().is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self {
            issuer: issuer.into(),
            secret,
        })
    }

    /// Issuer placed in the `iss` claim
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Mint a token for `method` + `path` issued now.
    pub fn token(&self, method: &str, path: &str) -> Result<String, AuthError> {
        self.token_at(method, path, Utc::now())
    }

    /// Mint a token for `method` + `path` issued at `now`.
    pub fn token_at(
        &self,
        method: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(&self.issuer, method, path, now);
        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| AuthError::SigningError(e.to_string()))
    }

    /// Value for the `Authorization` header: `bearer <token>`.
    pub fn authorization(&self, method: &str, path: &str) -> Result<String, AuthError> {
        let token = self.token(method, path)?;
        tracing::trace!(method, path, "minted request token");
        Ok(format!("bearer {}", token))
    }
}

/// Server-side check of a presented token.
///
/// Mirrors what glusterd2 does on receipt: HS256 signature, expiry,
/// issuer and the method/path binding.
#[derive(Clone)]
pub struct TokenVerifier {
    issuer: String,
    secret: SecretString,
    leeway_secs: u64,
}

impl TokenVerifier {
    pub fn new(issuer: impl Into<String>, secret: SecretString) -> Self {
        Self {
            issuer: issuer.into(),
            secret,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Verify `token` (with or without the `bearer ` prefix) for `method` + `path`.
    pub fn verify(&self, token: &str, method: &str, path: &str) -> Result<Claims, AuthError> {
        let token = token
            .strip_prefix("bearer ")
            .or_else(|| token.strip_prefix("Bearer "))
            .unwrap_or(token);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)?;

        if !data.claims.matches(method, path) {
            return Err(AuthError::QshMismatch {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        Ok(data.claims)
    }
}
