// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! In-memory doubles for the transport and command seams
//!
//! [`MockTransport`] answers REST calls from a script and [`MockRunner`]
//! answers shell commands, so clients and helpers can be exercised without
//! a cluster. Both record what they were asked. Built for this crate's tests
//! and, with the `test-util` feature, for downstream test suites.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use gd2_client::{
    CommandOutput, CommandRunner, Error, ExecError, HttpRequest, HttpResponse, Method, StatusCode,
    Transport,
};

#[derive(Clone)]
enum Scripted {
    Respond(StatusCode, String),
    Fail(String),
}

/// Scripted REST transport.
///
/// Responses queue per `(method, path)` and the last one repeats once the
/// queue drains. Unscripted requests get a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: impl Into<String>) {
        self.push(method, path, Scripted::Respond(status, body.into()));
    }

    /// Fail the request without a response
    pub fn fail(&self, method: Method, path: &str, reason: &str) {
        self.push(method, path, Scripted::Fail(reason.to_string()));
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.requests().len()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Decoded JSON body of the last request to `(method, path)`
    pub fn last_body(&self, method: Method, path: &str) -> Option<serde_json::Value> {
        self.requests()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| r.body.as_deref())
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let key = (request.method, request.path.clone());
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let scripted = {
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            routes.get_mut(&key).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };
        match scripted {
            Some(Scripted::Respond(status, body)) => Ok(HttpResponse { status, body }),
            Some(Scripted::Fail(reason)) => Err(Error::Transport(reason)),
            None => Ok(HttpResponse {
                status: StatusCode::NOT_FOUND,
                body: format!(r#"{{"errors":[{{"message":"no route for {} {}"}}]}}"#, key.0, key.1),
            }),
        }
    }
}

/// Scripted command runner.
///
/// Replies are matched by substring of the command, first match wins.
/// Unmatched commands succeed with no output.
#[derive(Default)]
pub struct MockRunner {
    replies: Mutex<Vec<(Option<String>, String, CommandOutput)>>,
    seen: Mutex<Vec<(String, String)>>,
}

impl MockRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reply to commands containing `contains` on any host
    pub fn reply(&self, contains: &str, status: i32, stdout: &str) {
        self.push(None, contains, status, stdout);
    }

    /// Reply to commands containing `contains` on `host` only
    pub fn reply_on(&self, host: &str, contains: &str, status: i32, stdout: &str) {
        self.push(Some(host.to_string()), contains, status, stdout);
    }

    fn push(&self, host: Option<String>, contains: &str, status: i32, stdout: &str) {
        let output = CommandOutput {
            status,
            stdout: stdout.to_string(),
            stderr: if status == 0 {
                String::new()
            } else {
                format!("exit {}", status)
            },
        };
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((host, contains.to_string(), output));
    }

    /// Every `(host, command)` run so far
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Commands run on `host`
    pub fn commands_on(&self, host: &str) -> Vec<String> {
        self.seen()
            .into_iter()
            .filter(|(h, _)| h == host)
            .map(|(_, cmd)| cmd)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, host: &str, cmd: &str) -> Result<CommandOutput, ExecError> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((host.to_string(), cmd.to_string()));
        let replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(replies
            .iter()
            .find(|(h, needle, _)| {
                h.as_deref().is_none_or(|h| h == host) && cmd.contains(needle.as_str())
            })
            .map(|(_, _, output)| output.clone())
            .unwrap_or_default())
    }
}
