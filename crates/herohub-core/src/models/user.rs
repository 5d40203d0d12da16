use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated identity.
///
/// Also the schema the persisted user record must satisfy: unknown roles,
/// missing fields, or an email that does not validate reject the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct User {
    pub id: i64,
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default, with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

mod optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(|dt| dt.to_rfc3339()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::models::timestamp::deserialize(deserializer)
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Seconds until the token expires
    #[serde(default)]
    pub expires_in: i64,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResetTokenRequest {
    pub token: String,
}

/// Result of `verify-reset-token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct ResetTokenStatus {
    pub valid: bool,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_json() -> &'static str {
        r#"{"id":1,"email":"a@b.com","username":"ab","first_name":"Ada","last_name":"Byron","role":"user","is_active":true,"created_at":"2024-01-02T03:04:05+00:00","updated_at":null}"#
    }

    #[test]
    fn test_parse_user() {
        let user: User = serde_json::from_str(user_json()).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.role, Role::User);
        assert!(user.created_at.is_some());
        assert!(user.updated_at.is_none());
        assert_eq!(user.full_name(), "Ada Byron");
        assert!(!user.is_admin());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_user_survives_reserialization() {
        let user: User = serde_json::from_str(user_json()).unwrap();
        let stored = serde_json::to_string(&user).unwrap();
        let reloaded: User = serde_json::from_str(&stored).unwrap();
        assert_eq!(user, reloaded);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = user_json().replace(r#""role":"user""#, r#""role":"superuser""#);
        assert!(serde_json::from_str::<User>(&json).is_err());
    }

    #[test]
    fn test_auth_tokens_defaults() {
        let json = format!(r#"{{"access_token":"tok1","user":{}}}"#, user_json());
        let tokens: AuthTokens = serde_json::from_str(&json).unwrap();
        assert_eq!(tokens.access_token, "tok1");
        assert_eq!(tokens.token_type, "bearer");
        assert_eq!(tokens.expires_in, 0);
    }
}
