//! User-facing error text.
//!
//! Each call site maps its `ApiError` through `friendly_message` with the
//! action that failed. Auth screens get status-specific text and keyword
//! heuristics over the server message; everything else shows the server's
//! message as is, or a per-action fallback.

use std::fmt;

use crate::api::ApiError;

const NETWORK: &str = "Unable to connect to the server. Please try again.";
const SERVER: &str = "Server error. Please try again in a few moments.";

/// Shown after the session guard forced a sign-out
pub const SESSION_EXPIRED: &str = "Your session has expired. Run `herohub login` to sign in again.";

/// The user action an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    LoadHeroes,
    LoadHero,
    UpdateHero,
    ToggleFavorite,
    LoadFavorites,
    RemoveFavorite,
    LoadTeams,
    CreateTeam,
    UpdateTeam,
    DeleteTeam,
    CompareTeams,
    Recommend,
}

impl Action {
    /// Text used when nothing more specific is known
    pub fn fallback(&self) -> &'static str {
        match self {
            Action::Login => NETWORK,
            Action::Register => "Unable to create your account. Please try again.",
            Action::ForgotPassword => "Unable to send reset email. Please try again.",
            Action::ResetPassword => "Failed to reset password. Please try again.",
            Action::LoadHeroes => "Failed to load superheroes",
            Action::LoadHero => "Failed to load superhero details",
            Action::UpdateHero => "Failed to update superhero",
            Action::ToggleFavorite => "Failed to update favorite",
            Action::LoadFavorites => "Failed to load favorites",
            Action::RemoveFavorite => "Failed to remove favorite",
            Action::LoadTeams => "Failed to load teams",
            Action::CreateTeam => "Failed to create team",
            Action::UpdateTeam => "Failed to update team",
            Action::DeleteTeam => "Failed to delete team",
            Action::CompareTeams => "Failed to compare teams",
            Action::Recommend => "Failed to get recommendation",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Login => "login",
            Action::Register => "register",
            Action::ForgotPassword => "forgot-password",
            Action::ResetPassword => "reset-password",
            Action::LoadHeroes => "load-heroes",
            Action::LoadHero => "load-hero",
            Action::UpdateHero => "update-hero",
            Action::ToggleFavorite => "toggle-favorite",
            Action::LoadFavorites => "load-favorites",
            Action::RemoveFavorite => "remove-favorite",
            Action::LoadTeams => "load-teams",
            Action::CreateTeam => "create-team",
            Action::UpdateTeam => "update-team",
            Action::DeleteTeam => "delete-team",
            Action::CompareTeams => "compare-teams",
            Action::Recommend => "recommend",
        };
        write!(f, "{}", name)
    }
}

/// Map a failed call to the text shown to the user.
pub fn friendly_message(action: Action, error: &ApiError) -> String {
    match action {
        Action::Login => login_message(error),
        Action::Register => register_message(error),
        Action::ForgotPassword => forgot_password_message(error),
        Action::ResetPassword => reset_password_message(error),
        _ => match error.server_message() {
            Some(message) => message.to_string(),
            None if error.is_network() => NETWORK.to_string(),
            None => action.fallback().to_string(),
        },
    }
}

fn login_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized(_) => {
            "Invalid email or password. Please check your credentials.".to_string()
        }
        ApiError::RateLimited => {
            "Too many login attempts. Please wait a few minutes and try again.".to_string()
        }
        e if e.is_server_error() => SERVER.to_string(),
        e => match e.server_message() {
            Some(message) => login_hint(message),
            None => NETWORK.to_string(),
        },
    }
}

fn register_message(error: &ApiError) -> String {
    match error {
        ApiError::Conflict(_) => "An account with this email already exists. Please use a different email or try logging in.".to_string(),
        ApiError::Validation(_) => {
            "Please check your information and try again. Some fields may be invalid.".to_string()
        }
        e if e.is_server_error() => SERVER.to_string(),
        e if e.is_network() => NETWORK.to_string(),
        e => match e.server_message() {
            Some(message) => register_hint(message),
            None => Action::Register.fallback().to_string(),
        },
    }
}

fn forgot_password_message(error: &ApiError) -> String {
    match error {
        ApiError::NotFound(_) => {
            "No account found with this email address. Please check your email or create a new account.".to_string()
        }
        ApiError::RateLimited => {
            "Too many reset requests. Please wait a few minutes before trying again.".to_string()
        }
        e if e.is_server_error() => SERVER.to_string(),
        e if e.is_network() => NETWORK.to_string(),
        e => match e.server_message() {
            Some(message) => forgot_password_hint(message),
            None => Action::ForgotPassword.fallback().to_string(),
        },
    }
}

fn reset_password_message(error: &ApiError) -> String {
    if let Some(message) = error.server_message() {
        return message.to_string();
    }
    match error {
        ApiError::BadRequest(_) => {
            "Invalid request. Please check your input and try again.".to_string()
        }
        ApiError::Unauthorized(_) => {
            "Reset token is invalid or expired. Please request a new reset link.".to_string()
        }
        e if e.is_server_error() => SERVER.to_string(),
        e if e.is_network() => NETWORK.to_string(),
        _ => Action::ResetPassword.fallback().to_string(),
    }
}

fn contains_all(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().all(|needle| haystack.contains(needle))
}

/// Login keyword heuristics; unknown messages pass through unchanged.
pub fn login_hint(message: &str) -> String {
    let lower = message.to_lowercase();
    if contains_all(&lower, &["invalid", "credential"]) {
        "Invalid email or password. Please check your credentials and try again.".to_string()
    } else if contains_all(&lower, &["account", "not", "active"]) {
        "Your account is not active. Please contact support for assistance.".to_string()
    } else if contains_all(&lower, &["email", "not", "verified"]) {
        "Please verify your email address before logging in.".to_string()
    } else if lower.contains("too many") {
        "Too many failed attempts. Please wait a few minutes before trying again.".to_string()
    } else {
        message.to_string()
    }
}

pub fn register_hint(message: &str) -> String {
    let lower = message.to_lowercase();
    if contains_all(&lower, &["email", "already", "exists"]) {
        "This email address is already registered. Please use a different email or try logging in.".to_string()
    } else if contains_all(&lower, &["username", "already", "exists"]) {
        "This username is already taken. Please choose a different username.".to_string()
    } else if contains_all(&lower, &["password", "weak"]) {
        "Please choose a stronger password with at least 8 characters, including uppercase, lowercase, and numbers.".to_string()
    } else if contains_all(&lower, &["invalid", "email"]) {
        "Please enter a valid email address.".to_string()
    } else {
        message.to_string()
    }
}

pub fn forgot_password_hint(message: &str) -> String {
    let lower = message.to_lowercase();
    if contains_all(&lower, &["email", "not", "found"]) {
        "No account found with this email address. Please check your email or create a new account.".to_string()
    } else if contains_all(&lower, &["invalid", "email"]) {
        "Please enter a valid email address.".to_string()
    } else if contains_all(&lower, &["rate", "limit"]) {
        "Too many reset requests. Please wait a few minutes before trying again.".to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_status_messages() {
        assert_eq!(
            friendly_message(Action::Login, &ApiError::Unauthorized("nope".into())),
            "Invalid email or password. Please check your credentials."
        );
        assert!(friendly_message(Action::Login, &ApiError::RateLimited).starts_with("Too many login attempts"));
        assert_eq!(
            friendly_message(Action::Login, &ApiError::ServerError("boom".into())),
            SERVER
        );
        assert_eq!(
            friendly_message(Action::Login, &ApiError::Connection("refused".into())),
            NETWORK
        );
    }

    #[test]
    fn test_login_heuristics_on_logical_error() {
        let err = ApiError::Rejected("Account is not active".into());
        assert_eq!(
            friendly_message(Action::Login, &err),
            "Your account is not active. Please contact support for assistance."
        );
        let err = ApiError::Rejected("Invalid email or password".into());
        assert_eq!(friendly_message(Action::Login, &err), "Invalid email or password");
    }

    #[test]
    fn test_register_messages() {
        assert!(friendly_message(Action::Register, &ApiError::Conflict(String::new()))
            .starts_with("An account with this email already exists"));
        assert_eq!(
            friendly_message(
                Action::Register,
                &ApiError::Rejected("User with this email already exists".into())
            ),
            "This email address is already registered. Please use a different email or try logging in."
        );
        assert_eq!(
            friendly_message(Action::Register, &ApiError::BadRequest(String::new())),
            "Unable to create your account. Please try again."
        );
    }

    #[test]
    fn test_forgot_password_messages() {
        assert!(friendly_message(Action::ForgotPassword, &ApiError::NotFound(String::new()))
            .starts_with("No account found"));
        assert_eq!(
            friendly_message(Action::ForgotPassword, &ApiError::BadRequest("Rate limit exceeded".into())),
            "Too many reset requests. Please wait a few minutes before trying again."
        );
    }

    #[test]
    fn test_reset_password_prefers_server_message() {
        assert_eq!(
            friendly_message(
                Action::ResetPassword,
                &ApiError::BadRequest("Invalid or expired reset token".into())
            ),
            "Invalid or expired reset token"
        );
        assert!(friendly_message(Action::ResetPassword, &ApiError::Unauthorized(String::new()))
            .starts_with("Reset token is invalid"));
    }

    #[test]
    fn test_other_actions_verbatim_or_fallback() {
        assert_eq!(
            friendly_message(
                Action::ToggleFavorite,
                &ApiError::Rejected("Superhero is already in favorites".into())
            ),
            "Superhero is already in favorites"
        );
        assert_eq!(
            friendly_message(Action::DeleteTeam, &ApiError::InvalidResponse("garbage".into())),
            "Failed to delete team"
        );
        assert_eq!(friendly_message(Action::LoadTeams, &ApiError::RateLimited), "Failed to load teams");
    }
}
