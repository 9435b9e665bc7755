// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for gd2-client
//!
//! A status-code mismatch is not an error: it is reported through
//! [`crate::RestResult`]. The variants here cover the cases where there is no
//! HTTP status to report at all.

use gd2_auth::AuthError;
use thiserror::Error;

use crate::exec::ExecError;

#[derive(Error, Debug)]
pub enum Error {
    /// Caller input rejected before any I/O took place
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token minting failed
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The shared secret could not be read from the management node
    #[error("Failed to read shared secret on {host}: {reason}")]
    Secret { host: String, reason: String },

    /// No HTTP response was received
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// Remote command execution failed
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// A response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Whether this is the "invalid input" condition
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
