// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Signed requests over real HTTP against a wiremock server.

mod common;

use std::sync::Arc;

use common::{MockRunner, SECRET};
use gd2_auth::TokenVerifier;
use gd2_client::{Endpoint, Error, Method, RestClient, SecretString, StatusCode, Transport};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(server: &MockServer) -> RestClient {
    let addr = server.address();
    let endpoint = Endpoint::new(addr.ip().to_string())
        .with_port(addr.port())
        .with_secret(SecretString::from(SECRET.to_string()));
    RestClient::connect(endpoint, MockRunner::new().as_ref()).await.unwrap()
}

fn verifier() -> TokenVerifier {
    // Generous leeway: only the scope and signature matter here
    TokenVerifier::new("glustercli", SecretString::from(SECRET.to_string())).with_leeway(60)
}

#[tokio::test]
async fn request_carries_token_scoped_to_method_and_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/peers"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let result = client.pool_list().await.unwrap();
    assert!(result.is_ok());
    assert_eq!(result.body, Some(json!([])));

    let requests = server.received_requests().await.unwrap();
    let header = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(header.starts_with("bearer "));

    let claims = verifier().verify(&header, "GET", "/v1/peers").unwrap();
    assert_eq!(claims.iss, "glustercli");
    assert_eq!(claims.exp, claims.iat + 1);
    assert!(verifier().verify(&header, "GET", "/v1/volumes").is_err());
}

#[tokio::test]
async fn every_call_mints_a_fresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/peers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    client.pool_list().await.unwrap();
    client.volume_list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let peers = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    let volumes = requests[1].headers.get("authorization").unwrap().to_str().unwrap();
    assert_ne!(peers, volumes);
    assert!(verifier().verify(volumes, "GET", "/v1/volumes").is_ok());
}

#[tokio::test]
async fn json_body_is_sent_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/peers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": common::PEER2})))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let result = client.peer_probe("server2").await.unwrap();
    assert_eq!(result.status, StatusCode::CREATED);
    assert_eq!(result.body, Some(json!({"id": common::PEER2})));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"addresses": ["server2"]}));
}

#[tokio::test]
async fn unexpected_status_is_reported_not_raised() {
    let server = MockServer::start().await;
    let raw = r#"{"errors":[{"code":2,"message":"volume not found"}]}"#;
    Mock::given(method("GET"))
        .and(path("/v1/volumes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(raw))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let result = client.volume_info("missing").await.unwrap();
    assert_eq!(result.status, StatusCode::NOT_FOUND);
    assert_eq!(result.body, None);
    assert_eq!(result.error.as_deref(), Some(raw));

    assert!(client.get_volume_info("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn no_content_yields_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/volumes/testvol"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let result = client.volume_delete("testvol").await.unwrap();
    assert!(result.is_ok());
    assert_eq!(result.body, Some(json!({})));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Bind and drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint = Endpoint::new("127.0.0.1")
        .with_port(port)
        .with_secret(SecretString::from(SECRET.to_string()));
    let client = RestClient::connect(endpoint, MockRunner::new().as_ref()).await.unwrap();

    let err = client.pool_list().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn secret_is_read_from_the_node_and_trimmed() {
    let runner = MockRunner::new();
    runner.reply("cat /var/lib/glusterd2/auth", 0, &format!("{SECRET}\n"));
    let transport = common::MockTransport::new();
    transport.respond(Method::Get, "/v1/peers", StatusCode::OK, "[]");

    let client = RestClient::connect_with_transport(
        Endpoint::new("10.0.0.1"),
        runner.as_ref(),
        transport.clone() as Arc<dyn Transport>,
    )
    .await
    .unwrap();
    client.pool_list().await.unwrap();

    let seen = runner.seen();
    assert_eq!(
        seen,
        vec![("10.0.0.1".to_string(), "cat /var/lib/glusterd2/auth".to_string())]
    );
    let request = &transport.requests()[0];
    assert!(verifier().verify(&request.authorization, "GET", "/v1/peers").is_ok());
    assert_eq!(request.url, "http://10.0.0.1:24007/v1/peers");
}

#[tokio::test]
async fn unreadable_secret_fails_connect() {
    let runner = MockRunner::new();
    runner.reply("cat /var/lib/glusterd2/auth", 1, "");
    let err = RestClient::connect_with_transport(
        Endpoint::new("10.0.0.1"),
        runner.as_ref(),
        common::MockTransport::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Secret { .. }), "got {err:?}");

    let empty = MockRunner::new();
    empty.reply("cat /var/lib/glusterd2/auth", 0, "  \n");
    let err = RestClient::connect_with_transport(
        Endpoint::new("10.0.0.1"),
        empty.as_ref(),
        common::MockTransport::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Secret { .. }), "got {err:?}");
}
