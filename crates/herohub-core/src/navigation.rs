//! In-app route state.
//!
//! The session guard reads the current route and redirects through the
//! `Navigator` trait instead of touching any global location. Front ends set
//! the route as the user moves between screens and watch it for redirects.

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::info;

/// Where the session guard sends the user after a forced sign-out
pub const LOGIN_ROUTE: &str = "/login";

/// Public auth screens. A 401 on one of these is an expected login failure,
/// not an expired session.
pub const AUTH_ROUTES: [&str; 4] = ["/login", "/register", "/forgot-password", "/reset-password"];

/// True if the path is, or sits under, one of the public auth screens.
///
/// Matching is by path segment, so `/login?next=/teams` and `/login/` match
/// while `/loginhelp` does not.
pub fn is_auth_route(path: &str) -> bool {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| {
            AUTH_ROUTES
                .iter()
                .any(|route| route.trim_start_matches('/') == segment)
        })
}

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    fn redirect(&self, path: &str);
}

/// Default navigator: the current route plus a record of forced redirects.
pub struct RouteState {
    current: watch::Sender<String>,
    redirects: Mutex<Vec<String>>,
}

impl RouteState {
    pub fn new(initial: &str) -> Self {
        let (current, _) = watch::channel(initial.to_string());
        Self {
            current,
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Record a user-driven route change.
    pub fn navigate(&self, path: &str) {
        self.current.send_replace(path.to_string());
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Forced redirects so far, oldest first
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Take and clear the forced redirects.
    pub fn take_redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|mut r| std::mem::take(&mut *r))
            .unwrap_or_default()
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RouteState {
    fn current_path(&self) -> String {
        self.current.borrow().clone()
    }

    fn redirect(&self, path: &str) {
        info!(from = %self.current_path(), to = path, "Redirecting");
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(path.to_string());
        }
        self.current.send_replace(path.to_string());
    }
}
