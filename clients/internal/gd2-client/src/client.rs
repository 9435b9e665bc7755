// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Signed REST client
//!
//! Every glusterd2 operation is `(method, path, expected status, body)`
//! against [`RestClient::handle_request`], which signs the call, sends it,
//! and normalizes the outcome into a [`RestResult`].

use std::sync::Arc;

use gd2_auth::TokenSigner;
use http::StatusCode;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::endpoint::{Endpoint, SECRET_PATH};
use crate::error::Error;
use crate::exec::CommandRunner;
use crate::transport::{HttpRequest, Method, ReqwestTransport, Transport};

/// Placeholder body for calls that send no payload.
pub const NO_BODY: Option<&()> = None;

/// Normalized outcome of one REST call.
///
/// When `status` equals the caller's expected status, `error` is `None` and
/// `body` holds the payload (an empty object for 204). Otherwise `body` is
/// `None` and `error` holds the raw response text.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResult {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub error: Option<String>,
}

impl RestResult {
    pub fn normalize(observed: StatusCode, expected: StatusCode, raw: String) -> Self {
        if observed != expected {
            return Self {
                status: observed,
                body: None,
                error: Some(raw),
            };
        }

        let body = if observed == StatusCode::NO_CONTENT {
            Value::Object(serde_json::Map::new())
        } else if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).unwrap_or(Value::String(raw))
        };

        Self {
            status: observed,
            body: Some(body),
            error: None,
        }
    }

    /// Whether the observed status matched the expected one
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Decode the body into `T`; `Ok(None)` when the call did not succeed.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        match &self.body {
            Some(body) if self.is_ok() => Ok(Some(serde_json::from_value(body.clone())?)),
            _ => Ok(None),
        }
    }

    pub fn into_body(self) -> Option<Value> {
        self.body
    }
}

/// Authenticated client for one glusterd2 management node.
///
/// Cloning is cheap; clones share the transport and the cached secret.
#[derive(Clone)]
pub struct RestClient {
    host: String,
    base_url: String,
    signer: TokenSigner,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Connect over HTTP, reading the secret from the node if the endpoint
    /// does not carry one.
    pub async fn connect(endpoint: Endpoint, runner: &dyn CommandRunner) -> Result<Self, Error> {
        let transport = Arc::new(ReqwestTransport::new(endpoint.verify_tls, endpoint.timeout)?);
        Self::connect_with_transport(endpoint, runner, transport).await
    }

    /// Like [`RestClient::connect`] with a caller-supplied transport.
    pub async fn connect_with_transport(
        endpoint: Endpoint,
        runner: &dyn CommandRunner,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let secret = match &endpoint.secret {
            Some(secret) => secret.clone(),
            None => read_secret(runner, &endpoint.host).await?,
        };
        Self::with_transport(endpoint, secret, transport)
    }

    /// Build a client from an explicit secret and transport.
    pub fn with_transport(
        endpoint: Endpoint,
        secret: SecretString,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let signer = TokenSigner::new(endpoint.user.clone(), secret)?;
        Ok(Self {
            base_url: endpoint.base_url(),
            host: endpoint.host,
            signer,
            transport,
        })
    }

    /// Management node this client talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign and send one request, normalizing the response.
    ///
    /// `Err` is only returned when there is no status to report: the
    /// request could not be signed or no response arrived.
    pub async fn handle_request<B>(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
        body: Option<&B>,
    ) -> Result<RestResult, Error>
    where
        B: Serialize + ?Sized,
    {
        // Minted per call: the token is bound to this method + path and
        // expires a second after issue.
        let authorization = self.signer.authorization(method.as_str(), path)?;
        let body = body.map(serde_json::to_vec).transpose()?;

        let request = HttpRequest {
            method,
            path: path.to_string(),
            url: format!("{}{}", self.base_url, path),
            authorization,
            body,
        };

        let response = self.transport.send(request).await?;
        let result = RestResult::normalize(response.status, expected, response.body);

        if result.is_ok() {
            tracing::debug!(host = %self.host, %method, path, status = %result.status, "request succeeded");
        } else {
            tracing::debug!(
                host = %self.host,
                %method,
                path,
                status = %result.status,
                expected = %expected,
                "unexpected status"
            );
        }
        Ok(result)
    }

    /// `GET path`, no body
    pub async fn get(&self, path: &str, expected: StatusCode) -> Result<RestResult, Error> {
        self.handle_request(Method::Get, path, expected, NO_BODY).await
    }
}

/// Read the glusterd2 shared secret from `host`.
pub async fn read_secret(runner: &dyn CommandRunner, host: &str) -> Result<SecretString, Error> {
    let output = runner.run(host, &format!("cat {}", SECRET_PATH)).await?;
    if !output.success() {
        return Err(Error::Secret {
            host: host.to_string(),
            reason: format!("exit status {}: {}", output.status, output.stderr.trim()),
        });
    }
    let secret = output.stdout.trim();
    if secret.is_empty() {
        return Err(Error::Secret {
            host: host.to_string(),
            reason: format!("{} is empty", SECRET_PATH),
        });
    }
    Ok(SecretString::from(secret.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(StatusCode::OK ; "ok")]
    #[test_case(StatusCode::CREATED ; "created")]
    #[test_case(StatusCode::ACCEPTED ; "accepted")]
    fn test_matching_status_returns_body(expected: StatusCode) {
        let result = RestResult::normalize(expected, expected, r#"{"name":"testvol"}"#.to_string());
        assert!(result.is_ok());
        assert_eq!(result.status, expected);
        assert_eq!(result.body, Some(json!({"name": "testvol"})));
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_no_content_returns_empty_object() {
        let result = RestResult::normalize(StatusCode::NO_CONTENT, StatusCode::NO_CONTENT, String::new());
        assert_eq!(result.body, Some(json!({})));
        assert_eq!(result.error, None);
    }

    #[test_case(StatusCode::NOT_FOUND, StatusCode::OK ; "not found")]
    #[test_case(StatusCode::OK, StatusCode::CREATED ; "ok when created expected")]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR, StatusCode::NO_CONTENT ; "server error")]
    fn test_mismatch_returns_raw_error(observed: StatusCode, expected: StatusCode) {
        let raw = r#"{"errors":[{"code":2,"message":"volume not found"}]}"#;
        let result = RestResult::normalize(observed, expected, raw.to_string());
        assert!(!result.is_ok());
        assert_eq!(result.status, observed);
        assert_eq!(result.body, None);
        assert_eq!(result.error.as_deref(), Some(raw));
    }

    #[test]
    fn test_non_json_body_kept_as_text() {
        let result = RestResult::normalize(StatusCode::OK, StatusCode::OK, "pong".to_string());
        assert_eq!(result.body, Some(Value::String("pong".to_string())));
    }

    #[test]
    fn test_json_on_mismatch_is_none() {
        let result = RestResult::normalize(StatusCode::NOT_FOUND, StatusCode::OK, "{}".to_string());
        let decoded: Option<Value> = result.json().unwrap();
        assert!(decoded.is_none());
    }
}
