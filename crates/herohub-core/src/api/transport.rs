//! The HTTP seam under the gateway client.
//!
//! Requests are plain data (`ApiRequest`) so middleware can inspect and
//! rewrite them, and tests can swap the network for a scripted transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::ApiError;

/// An outbound call, before it is bound to a base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path including the API prefix, e.g. `/api/v1/teams`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Header value as text, if present and valid UTF-8
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Insert a header only if the caller has not set it already.
    pub fn default_header(&mut self, name: HeaderName, value: &'static str) {
        if !self.headers.contains_key(&name) {
            self.headers.insert(name, HeaderValue::from_static(value));
        }
    }

    /// Resolve against a base URL, keeping any path prefix the base carries.
    pub fn url(&self, base_url: &Url) -> Url {
        let mut url = base_url.clone();
        let prefix = base_url.path().trim_end_matches('/');
        let path = format!("{}/{}", prefix, self.path.trim_start_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// What came back, before any envelope decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send once. No retries; a failure is returned to the caller as is.
    async fn send(&self, base_url: &Url, request: &ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Production transport over `reqwest`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout` of `None` keeps reqwest's default (no overall timeout).
    pub fn new(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, base_url: &Url, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = request.url(base_url);

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(request.headers.clone());
        if let Some(ref body) = request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                ApiError::Connection(format!("{}: {}", url, e))
            } else {
                ApiError::Network(e)
            }
        })?;
        let status = response.status();
        let body = response.text().await?;
        debug!(method = %request.method, %url, status = %status, "Response received");

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_path_and_query() {
        let base = Url::parse("http://localhost:8000").unwrap();
        let request = ApiRequest::get("/api/v1/teams/compare")
            .query("team1_id", 1)
            .query("team2_id", 2);
        assert_eq!(
            request.url(&base).as_str(),
            "http://localhost:8000/api/v1/teams/compare?team1_id=1&team2_id=2"
        );
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let base = Url::parse("https://example.com/hub/").unwrap();
        let request = ApiRequest::get("/api/v1/superheroes").query("search", "spider man");
        assert_eq!(
            request.url(&base).as_str(),
            "https://example.com/hub/api/v1/superheroes?search=spider+man"
        );
    }

    #[test]
    fn test_default_header_does_not_override() {
        let mut request = ApiRequest::post("/x");
        request
            .headers
            .insert(reqwest::header::ACCEPT, HeaderValue::from_static("text/plain"));
        request.default_header(reqwest::header::ACCEPT, "application/json");
        request.default_header(reqwest::header::CONTENT_TYPE, "application/json");
        assert_eq!(request.header(reqwest::header::ACCEPT), Some("text/plain"));
        assert_eq!(request.header(reqwest::header::CONTENT_TYPE), Some("application/json"));
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/api/v1/auth/login")
            .json(&serde_json::json!({"email": "a@b.com"}))
            .unwrap();
        assert_eq!(request.body, Some(serde_json::json!({"email": "a@b.com"})));
    }
}
