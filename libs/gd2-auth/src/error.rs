// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for gd2-auth

use thiserror::Error;

/// Errors that can occur while minting or verifying a request token
#[derive(Error, Debug)]
pub enum AuthError {
    /// The shared secret is empty
    #[error("Empty shared secret")]
    EmptySecret,

    /// Failed to encode or sign the claim set
    #[error("Signing error: {0}")]
    SigningError(String),

    /// The token's expiry has passed
    #[error("Token expired")]
    Expired,

    /// The token was minted for a different method or path
    #[error("Token is not valid for {method} {path}")]
    QshMismatch { method: String, path: String },

    /// Signature, issuer or structural validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken(e.to_string()),
        }
    }
}
