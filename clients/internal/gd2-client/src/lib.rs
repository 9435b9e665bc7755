// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! glusterd2 REST Client Library
//!
//! Typed, authenticated access to the glusterd2 management API plus the
//! pollers that wait for asynchronous cluster state to settle.
//!
//! ## Usage
//!
//! ```ignore
//! use gd2_client::{Endpoint, RestClient, SshRunner, PollPolicy};
//! use gd2_client::convergence::wait_for_bricks_online;
//!
//! // The shared secret is read from the node over ssh
//! let runner = SshRunner::new();
//! let client = RestClient::connect(Endpoint::new("server1"), &runner).await?;
//!
//! let result = client.volume_start("testvol", false).await?;
//! if result.is_ok() {
//!     wait_for_bricks_online(&client, "testvol", &[], PollPolicy::BRICKS).await;
//! }
//! ```
//!
//! Every call mints a fresh token bound to its method and path, so a
//! client may be cloned and shared freely.
//!
//! ## Results
//!
//! Operations return a [`RestResult`] whenever the server answered. A
//! status other than the expected one is data, not an `Err`; see
//! [`RestResult::normalize`]. `Err` means the request could not be built
//! or sent.

// Lets `mock` name this crate the same way from inside and from tests/
extern crate self as gd2_client;

pub mod client;
pub mod convergence;
pub mod devices;
pub mod endpoint;
pub mod error;
pub mod exec;
pub mod hosts;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod peers;
pub mod snapshots;
pub mod transport;
pub mod types;
pub mod validate;
pub mod volumes;

pub use client::{NO_BODY, RestClient, RestResult, read_secret};
pub use convergence::{PollPolicy, wait_until};
pub use endpoint::{DEFAULT_PORT, Endpoint, SECRET_PATH};
pub use error::Error;
pub use exec::{CommandOutput, CommandRunner, ExecError, SshRunner, run_parallel, shell_quote};
pub use hosts::Hosts;
pub use peers::PeerSelector;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use types::*;
pub use volumes::{OptionFlags, VolumeCreate};

// Re-export for callers building status expectations and secrets
pub use http::StatusCode;
pub use secrecy::SecretString;
