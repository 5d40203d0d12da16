//! Cross-cutting hooks around every gateway call.
//!
//! The client runs `on_request` hooks in list order before sending and
//! `on_response` hooks in reverse order after a response arrives. Transport
//! failures never reach `on_response`.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::{ApiError, ApiRequest, RawResponse};
use crate::auth::SessionStore;
use crate::navigation::{is_auth_route, Navigator, LOGIN_ROUTE};
use crate::storage::{Storage, TOKEN_KEY};

pub trait Middleware: Send + Sync {
    /// Short name used in logs and `ApiError::Middleware`
    fn name(&self) -> &'static str;

    /// Inspect or rewrite the request. An error aborts the call before it is sent.
    fn on_request(&self, _request: &mut ApiRequest) -> Result<(), ApiError> {
        Ok(())
    }

    /// Observe the response. The caller still receives it unchanged.
    fn on_response(&self, _request: &ApiRequest, _response: &RawResponse) {}
}

/// Attaches `Authorization: Bearer <token>` from durable storage.
///
/// The token is read on every request, never cached.
pub struct BearerAuth {
    storage: Arc<dyn Storage>,
}

impl BearerAuth {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    fn current_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read token, sending request unauthenticated");
                None
            }
        }
    }
}

impl Middleware for BearerAuth {
    fn name(&self) -> &'static str {
        "bearer-auth"
    }

    fn on_request(&self, request: &mut ApiRequest) -> Result<(), ApiError> {
        match self.current_token() {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    ApiError::Middleware {
                        middleware: self.name(),
                        reason: "stored token is not a valid header value".to_string(),
                    }
                })?;
                request.headers.insert(AUTHORIZATION, value);
            }
            None => {
                request.headers.remove(AUTHORIZATION);
            }
        }
        Ok(())
    }
}

/// Forced sign-out on `401 Unauthorized`.
///
/// Outside the auth screens a 401 means the token is no longer accepted: the
/// session is cleared and the user sent to the login route. On an auth screen
/// a 401 is an ordinary failed attempt and is left to the caller.
pub struct SessionGuard {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl Middleware for SessionGuard {
    fn name(&self) -> &'static str {
        "session-guard"
    }

    fn on_response(&self, request: &ApiRequest, response: &RawResponse) {
        if response.status != StatusCode::UNAUTHORIZED {
            return;
        }

        let path = self.navigator.current_path();
        if is_auth_route(&path) {
            debug!(route = %path, "401 on auth screen, leaving session alone");
            return;
        }

        warn!(route = %path, request = %request.path, "Token rejected, signing out");
        self.session.invalidate();
        self.navigator.redirect(LOGIN_ROUTE);
    }
}

/// Debug log line per request and response.
pub struct RequestLog;

impl Middleware for RequestLog {
    fn name(&self) -> &'static str {
        "request-log"
    }

    fn on_request(&self, request: &mut ApiRequest) -> Result<(), ApiError> {
        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = request.headers.contains_key(AUTHORIZATION),
            "Sending request"
        );
        Ok(())
    }

    fn on_response(&self, request: &ApiRequest, response: &RawResponse) {
        if response.status.is_success() {
            debug!(method = %request.method, path = %request.path, status = %response.status, "Request finished");
        } else {
            warn!(method = %request.method, path = %request.path, status = %response.status, "Request failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::RouteState;
    use crate::storage::MemoryStorage;
    use crate::test_support::sample_tokens;

    #[test]
    fn test_bearer_reads_storage_each_time() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = BearerAuth::new(storage.clone());

        let mut request = ApiRequest::get("/api/v1/teams");
        auth.on_request(&mut request).unwrap();
        assert_eq!(request.header(AUTHORIZATION), None);

        storage.set(TOKEN_KEY, "tok1").unwrap();
        let mut request = ApiRequest::get("/api/v1/teams");
        auth.on_request(&mut request).unwrap();
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer tok1"));

        // Replaced mid-session
        storage.set(TOKEN_KEY, "tok2").unwrap();
        let mut request = ApiRequest::get("/api/v1/teams");
        auth.on_request(&mut request).unwrap();
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer tok2"));
    }

    #[test]
    fn test_bearer_strips_stale_header_without_token() {
        let auth = BearerAuth::new(Arc::new(MemoryStorage::new()));
        let mut request = ApiRequest::get("/api/v1/teams");
        request
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer old"));
        auth.on_request(&mut request).unwrap();
        assert!(!request.headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_bearer_rejects_unencodable_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "bad\ntoken").unwrap();
        let auth = BearerAuth::new(storage);
        let mut request = ApiRequest::get("/api/v1/teams");
        assert!(matches!(
            auth.on_request(&mut request),
            Err(ApiError::Middleware { middleware: "bearer-auth", .. })
        ));
    }

    fn guarded(route: &str) -> (Arc<SessionStore>, Arc<RouteState>, SessionGuard) {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        session.hydrate();
        session.login(sample_tokens("tok1", 1)).unwrap();
        let routes = Arc::new(RouteState::new(route));
        let guard = SessionGuard::new(session.clone(), routes.clone());
        (session, routes, guard)
    }

    #[test]
    fn test_guard_ignores_other_statuses() {
        let (session, routes, guard) = guarded("/heroes/42");
        let request = ApiRequest::get("/api/v1/superheroes/42");
        guard.on_response(&request, &RawResponse::new(StatusCode::FORBIDDEN, ""));
        guard.on_response(&request, &RawResponse::new(StatusCode::OK, ""));
        assert!(session.is_authenticated());
        assert!(routes.redirects().is_empty());
    }

    #[test]
    fn test_guard_on_nested_auth_route() {
        let (session, routes, guard) = guarded("/reset-password?token=abc");
        let request = ApiRequest::post("/api/v1/auth/reset-password");
        guard.on_response(&request, &RawResponse::new(StatusCode::UNAUTHORIZED, ""));
        assert!(session.is_authenticated());
        assert!(routes.redirects().is_empty());
    }
}
