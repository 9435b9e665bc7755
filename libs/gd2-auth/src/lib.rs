// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! glusterd2 REST Authentication Library
//!
//! glusterd2 authenticates every REST call with a short-lived JWT presented
//! as a bearer credential:
//!
//! ```text
//! Authorization: bearer <header>.<claims>.<signature>
//! ```
//!
//! The claim set is:
//!
//! - `iss`: the client identity (`glustercli` by default)
//! - `iat`: issued-at, Unix seconds
//! - `exp`: `iat + 1`
//! - `qsh`: hex SHA-256 of `METHOD&path`, binding the token to one request
//!
//! Tokens are signed HS256 with the cluster's shared secret (the contents of
//! `/var/lib/glusterd2/auth` on a management node). Because a token is valid
//! for only one method and path, and only for about a second, a new token is
//! minted for every request and none are ever cached.
//!
//! # Example
//!
//! ```ignore
//! use gd2_auth::TokenSigner;
//! use secrecy::SecretString;
//!
//! let signer = TokenSigner::new("glustercli", SecretString::from(secret))?;
//! let header = signer.authorization("GET", "/v1/peers")?;
//! ```

pub mod claims;
pub mod error;
pub mod signer;

pub use claims::{Claims, TOKEN_TTL_SECS, query_string_hash};
pub use error::AuthError;
pub use signer::{TokenSigner, TokenVerifier};

/// Issuer used by the stock glusterd2 CLI.
pub const DEFAULT_ISSUER: &str = "glustercli";
