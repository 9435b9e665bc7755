// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Remote shell execution
//!
//! The REST layer only needs a shell on the management node to read the
//! shared secret; the orchestration helpers use it for service control,
//! brick cleanup and mounts. [`CommandRunner`] is the injection seam and
//! [`SshRunner`] the stock implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::hosts::Hosts;

/// Exit status and captured output of one remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to run command on {host}: {source}")]
    Spawn {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command on {host} was terminated by a signal")]
    Signaled { host: String },
}

/// Runs a shell command on a named host.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, host: &str, cmd: &str) -> Result<CommandOutput, ExecError>;
}

/// [`CommandRunner`] that shells out to `ssh`.
#[derive(Debug, Clone)]
pub struct SshRunner {
    user: Option<String>,
    options: Vec<String>,
}

impl Default for SshRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SshRunner {
    pub fn new() -> Self {
        Self {
            user: None,
            options: vec!["BatchMode=yes".to_string()],
        }
    }

    /// Log in as `user` (default: the ssh config's user)
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Add an `-o` option
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    fn target(&self, host: &str) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, host),
            None => host.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for SshRunner {
    async fn run(&self, host: &str, cmd: &str) -> Result<CommandOutput, ExecError> {
        let mut ssh = Command::new("ssh");
        for opt in &self.options {
            ssh.arg("-o").arg(opt);
        }
        ssh.arg(self.target(host)).arg("--").arg(cmd);

        tracing::debug!(host, cmd, "running remote command");
        let output = ssh.output().await.map_err(|source| ExecError::Spawn {
            host: host.to_string(),
            source,
        })?;

        let status = output.status.code().ok_or_else(|| ExecError::Signaled {
            host: host.to_string(),
        })?;

        Ok(CommandOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Quote `word` for a POSIX shell.
///
/// Words made only of path-safe characters are returned as is.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-:=+@,%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Run `cmd` on every host concurrently.
pub async fn run_parallel(
    runner: &dyn CommandRunner,
    hosts: impl Into<Hosts>,
    cmd: &str,
) -> BTreeMap<String, Result<CommandOutput, ExecError>> {
    let hosts: Hosts = hosts.into();
    let runs = hosts.iter().map(|host| async move {
        let result = runner.run(host, cmd).await;
        (host.to_string(), result)
    });
    futures_util::future::join_all(runs).await.into_iter().collect()
}
