//! Shared state for one `herohub` invocation.
//!
//! `App` wires the config, the durable storage backend, the session store,
//! the route state and the gateway client together. Each command sets its
//! route first, so a 401 is judged against the screen it stands for.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use herohub_core::api::ApiClient;
use herohub_core::auth::SessionStore;
use herohub_core::config::Config;
use herohub_core::messages::{friendly_message, Action, SESSION_EXPIRED};
use herohub_core::models::User;
use herohub_core::navigation::{Navigator, RouteState, LOGIN_ROUTE};
use herohub_core::state::StateError;
use herohub_core::storage;

pub struct App {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub routes: Arc<RouteState>,
    pub client: ApiClient,
}

impl App {
    /// Open storage, hydrate the session and build the client.
    pub fn new(config: Config) -> Result<Self> {
        let storage_dir = config.storage_dir()?;
        let storage = storage::open(config.storage, storage_dir);

        let session = Arc::new(SessionStore::new(storage));
        let snapshot = session.hydrate();
        debug!(authenticated = snapshot.is_authenticated, "Session hydrated");

        let routes = Arc::new(RouteState::default());
        let navigator: Arc<dyn Navigator> = routes.clone();
        let client = ApiClient::for_session(
            &config.api_url,
            config.request_timeout(),
            session.clone(),
            navigator,
        )
        .with_context(|| format!("Invalid API URL {}", config.api_url))?;

        Ok(Self {
            config,
            session,
            routes,
            client,
        })
    }

    /// Move to the screen a command stands for.
    pub fn enter(&self, route: &str) {
        self.routes.navigate(route);
    }

    /// Enter a screen that needs a signed-in user.
    pub fn enter_protected(&self, route: &str) -> Result<User> {
        match self.session.user() {
            Some(user) => {
                self.enter(route);
                Ok(user)
            }
            None => {
                self.enter(LOGIN_ROUTE);
                Err(anyhow!("You are not logged in. Run `herohub login` first."))
            }
        }
    }

    /// Turn a failed action into the message the user sees.
    ///
    /// A forced sign-out during the call wins over whatever the call itself
    /// reported.
    pub fn explain(&self, action: Action, error: impl Into<StateError>) -> anyhow::Error {
        let error = error.into();
        let redirects = self.routes.take_redirects();
        if !redirects.is_empty() {
            warn!(action = %action, "Session expired during request");
            return anyhow!(SESSION_EXPIRED);
        }
        match error.api_error() {
            Some(api) => anyhow!(friendly_message(action, api)),
            None => anyhow!(error.to_string()),
        }
    }

    /// Remember the last email used to sign in.
    pub fn remember_email(&mut self, email: &str) {
        if self.config.last_email.as_deref() == Some(email) {
            return;
        }
        self.config.last_email = Some(email.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
}

/// Read one line, falling back to `default` on empty input.
pub fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => print!("{} [{}]: ", label, default),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    match default {
        Some(default) if input.is_empty() => Ok(default.to_string()),
        _ => Ok(input.to_string()),
    }
}

pub fn prompt_password(label: &str) -> Result<String> {
    let password = rpassword::prompt_password(format!("{}: ", label))?;
    Ok(password)
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
