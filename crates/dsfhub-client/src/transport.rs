//! HTTP transport to the hub API
//!
//! A [`Transport`] sends one request and hands back the raw response.
//! It never retries and never interprets the body; envelope handling lives
//! in the codec.

use async_trait::async_trait;
use dsfhub_core::HubConfig;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// HTTP methods used by the resource operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the API base URL
///
/// Path segments are kept unescaped; the transport escapes each one when
/// building the URL, so an identifier containing `/` or `?` stays a single
/// segment.
#[derive(Debug, Clone, PartialEq)]
pub struct HubRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl HubRequest {
    pub fn new(method: Method, segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Human-readable path for logs, unescaped
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Raw response as received from the hub
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Failure to obtain a response at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, TLS or protocol failure
    #[error("request failed: {0}")]
    Request(String),

    /// The request URL could not be built
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Per-call deadline expired
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// Caller cancelled the call
    #[error("cancelled")]
    Cancelled,
}

/// Sends a single request to the hub
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HubRequest) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport with bearer authentication
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: String,
    accepts_invalid_certs: bool,
}

impl HttpTransport {
    pub fn new(config: &HubConfig) -> dsfhub_core::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("dsfhub-client/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        if config.insecure_tls() {
            warn!(
                "TLS certificate verification disabled for {}",
                config.base_url()
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            dsfhub_core::Error::configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            token: config.token().to_string(),
            accepts_invalid_certs: config.insecure_tls(),
        })
    }

    /// Whether the client was built with certificate verification disabled
    pub fn accepts_invalid_certs(&self) -> bool {
        self.accepts_invalid_certs
    }

    /// Resolve a request against the base URL, escaping each path segment
    /// and attaching a query string only when parameters are present
    pub fn request_url(&self, request: &HubRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::InvalidUrl(format!("{} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HubRequest) -> Result<RawResponse, TransportError> {
        let url = self.request_url(&request)?;
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsfhub_core::HubSettings;

    fn transport(host: &str) -> HttpTransport {
        let config = HubConfig::try_from(HubSettings {
            host: host.into(),
            token: "t".into(),
            ..Default::default()
        })
        .unwrap();
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_url_escapes_identifier_segment() {
        let t = transport("https://hub.example.com");
        let request = HubRequest::new(Method::Get, ["classification", "a/b c?d"]);
        assert_eq!(
            t.request_url(&request).unwrap().as_str(),
            "https://hub.example.com/dsf/api/v2/classification/a%2Fb%20c%3Fd"
        );
    }

    #[test]
    fn test_no_query_string_without_params() {
        let t = transport("https://hub.example.com");
        let request = HubRequest::new(Method::Delete, ["ciphertrust", "x"]).with_query(vec![]);
        let url = t.request_url(&request).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_query_pairs_attached() {
        let t = transport("https://hub.example.com");
        let request = HubRequest::new(Method::Delete, ["classification", "x"])
            .with_query(vec![("forceDelete", "true".into())]);
        let url = t.request_url(&request).unwrap();
        assert_eq!(url.query(), Some("forceDelete=true"));
    }

    #[test]
    fn test_base_path_trailing_slash_collapses() {
        let t = transport("https://hub.example.com/api/");
        let request = HubRequest::new(Method::Get, ["get-config"]);
        assert_eq!(
            t.request_url(&request).unwrap().as_str(),
            "https://hub.example.com/api/get-config"
        );
    }

    #[test]
    fn test_insecure_ssl_setting_reaches_client() {
        let config = HubConfig::try_from(HubSettings {
            host: "https://lab-hub.internal".into(),
            token: "t".into(),
            insecure_ssl: true,
            ..Default::default()
        })
        .unwrap();
        assert!(HttpTransport::new(&config).unwrap().accepts_invalid_certs());
        assert!(!transport("https://hub.example.com").accepts_invalid_certs());
    }

    #[test]
    fn test_request_path_for_logs() {
        let request = HubRequest::new(Method::Get, ["classification", "abc"]);
        assert_eq!(request.path(), "/classification/abc");
    }

    #[test]
    fn test_raw_response_header_lookup_is_case_insensitive() {
        let response = RawResponse {
            status: 200,
            headers: vec![("content-type".into(), "application/json".into())],
            body: Vec::new(),
        };
        assert!(response.is_success());
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }
}
