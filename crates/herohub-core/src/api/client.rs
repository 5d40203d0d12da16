//! The gateway client every backend call goes through.
//!
//! `ApiClient` owns the base URL, the transport and the middleware chain.
//! Endpoint methods live next to it in `auth`, `superheroes`, `favorites`
//! and `teams`; each builds an `ApiRequest` and hands it to `execute`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::middleware::{BearerAuth, Middleware, RequestLog, SessionGuard};
use super::{ApiError, ApiRequest, Envelope, RawResponse, ReqwestTransport, Transport};
use crate::auth::SessionStore;
use crate::navigation::Navigator;

/// Backend used when neither the environment nor the config names one
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path prefix shared by all versioned routes
pub const API_PREFIX: &str = "/api/v1";

/// Build an absolute route path from a path under the API prefix
pub(crate) fn route(path: &str) -> String {
    format!("{}/{}", API_PREFIX, path.trim_start_matches('/'))
}

/// Single configured HTTP client for the backend.
/// Clone is cheap - the transport and middleware are shared.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClient {
    /// A bare client with no middleware.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: Self::parse_base_url(base_url)?,
            transport,
            middleware: Vec::new(),
        })
    }

    /// The production client: reqwest transport plus the session middleware.
    pub fn for_session(
        base_url: &str,
        timeout: Option<Duration>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(timeout)?);
        Ok(Self::new(base_url, transport)?.with_session(session, navigator))
    }

    /// Install the standard chain: token injection, 401 handling, logging.
    pub fn with_session(self, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        let storage = session.storage();
        self.with_middleware(Arc::new(BearerAuth::new(storage)))
            .with_middleware(Arc::new(SessionGuard::new(session, navigator)))
            .with_middleware(Arc::new(RequestLog))
    }

    /// Append a hook. Request hooks run in the order added, response hooks in reverse.
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
        let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" if !url.cannot_be_a_base() => Ok(url),
            _ => Err(ApiError::InvalidBaseUrl(format!(
                "{}: expected an http(s) URL",
                raw
            ))),
        }
    }

    /// Send one request through the chain and return whatever came back.
    ///
    /// Non-2xx statuses are not errors at this level; `execute` maps them.
    pub async fn send_raw(&self, mut request: ApiRequest) -> Result<RawResponse, ApiError> {
        request.default_header(CONTENT_TYPE, "application/json");
        request.default_header(ACCEPT, "application/json");

        for middleware in &self.middleware {
            middleware.on_request(&mut request)?;
        }

        let response = self.transport.send(&self.base_url, &request).await?;

        for middleware in self.middleware.iter().rev() {
            middleware.on_response(&request, &response);
        }

        Ok(response)
    }

    /// Send and decode the response envelope.
    ///
    /// HTTP errors become the matching `ApiError`. A 2xx envelope is returned
    /// as is, including one whose `status` is `error`.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<T>, ApiError> {
        let path = request.path.clone();
        let response = self.send_raw(request).await?;

        if !response.status.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&response.body).map_err(|e| {
            ApiError::InvalidResponse(format!("{}: {}", path, e))
        })?;
        debug!(path = %path, success = envelope.is_success(), "Envelope decoded");
        Ok(envelope)
    }
}
