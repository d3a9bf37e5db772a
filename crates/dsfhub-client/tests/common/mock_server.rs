//! Mock server helpers for hub API testing
//!
//! Provides wiremock setup for the common response patterns and hub clients
//! pointed at a running mock server.

use super::constants::*;
use dsfhub_client::HubClient;
use dsfhub_core::{HubConfig, HubSettings};
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Settings pointing at the mock server with the test token
pub fn settings_for(server: &MockServer) -> HubSettings {
    HubSettings {
        host: server.uri(),
        token: TEST_TOKEN.to_string(),
        ..Default::default()
    }
}

/// Hub client for `settings`, which must validate
pub fn hub_with(settings: HubSettings) -> HubClient {
    HubClient::new(HubConfig::try_from(settings).unwrap()).unwrap()
}

/// Hub client with default parameters pointed at the mock server
pub fn hub_for(server: &MockServer) -> HubClient {
    hub_with(settings_for(server))
}

/// Respond to `verb path` with a JSON body, requiring the bearer token
pub async fn mock_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .and(header("authorization", BEARER_TEST_TOKEN))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Respond to `verb path` with a raw body
pub async fn mock_raw(server: &MockServer, verb: &str, route: &str, status: u16, body: &[u8]) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Respond after `delay`, for deadline tests
pub async fn mock_slow(
    server: &MockServer,
    verb: &str,
    route: &str,
    delay: std::time::Duration,
    body: Value,
) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

/// The single request the server received
pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

/// Body of a received request, unwrapped from its `data` envelope
pub fn request_data(request: &Request) -> Value {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    body.get("data").cloned().expect("request body has no data")
}

/// Raw query string of a received request
pub fn raw_query(request: &Request) -> Option<String> {
    request.url.query().map(str::to_string)
}
