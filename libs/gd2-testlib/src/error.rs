// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// REST client failure (invalid input, transport, secret)
    #[error(transparent)]
    Client(#[from] gd2_client::Error),

    /// A required configuration key is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A remote command exited non-zero where success was required
    #[error("Command `{cmd}` on {host} exited with {status}: {stderr}")]
    Execution {
        host: String,
        cmd: String,
        status: i32,
        stderr: String,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl From<gd2_client::ExecError> for Error {
    fn from(e: gd2_client::ExecError) -> Self {
        Error::Client(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
