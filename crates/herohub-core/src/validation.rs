//! Local form rules, checked before any request is sent.

use std::fmt;

use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{LoginRequest, RegisterRequest, TeamCreate, TeamUpdate};

/// Smallest team the backend accepts
pub const MIN_TEAM_SIZE: usize = 2;

/// Largest team the backend accepts
pub const MAX_TEAM_SIZE: usize = 5;

/// Characters that count as "special" in a password
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("{}", join_fields(.0))]
    Fields(Vec<FieldError>),

    #[error("Team name is required")]
    MissingTeamName,

    #[error("Please select at least 2 superheroes for your team")]
    TooFewHeroes { selected: usize },

    #[error("A team can have a maximum of 5 superheroes")]
    TooManyHeroes { selected: usize },

    #[error("Please select two different teams to compare")]
    SameTeam,

    #[error("Select two teams to compare")]
    IncompleteComparison,
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match error.code.as_ref() {
                        "email" => "Please enter a valid email address".to_string(),
                        "length" => "Invalid length".to_string(),
                        "must_match" => "Values do not match".to_string(),
                        _ => format!("Invalid {}", field),
                    });
                fields.push(FieldError {
                    field: field.to_string(),
                    message,
                });
            }
        }
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationFailure::Fields(fields)
    }
}

impl ValidationFailure {
    /// Field names that failed, for highlighting
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationFailure::Fields(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
            ValidationFailure::MissingTeamName => vec!["name"],
            ValidationFailure::TooFewHeroes { .. } | ValidationFailure::TooManyHeroes { .. } => {
                vec!["superhero_ids"]
            }
            ValidationFailure::SameTeam | ValidationFailure::IncompleteComparison => vec!["team2_id"],
        }
    }
}

fn password_strength(password: &str) -> Result<(), ValidationError> {
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if lower && upper && digit && special {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character".into(),
        ))
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest, ValidationFailure> {
        self.validate()?;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, message = "First name must be at least 2 characters long"))]
    pub first_name: String,

    #[validate(length(min = 2, message = "Last name must be at least 2 characters long"))]
    pub last_name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters long"),
        custom(function = "password_strength")
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn into_request(self) -> Result<RegisterRequest, ValidationFailure> {
        self.validate()?;
        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ResetPasswordForm {
    #[validate(length(min = 1, message = "Reset token is missing"))]
    pub token: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "password_strength")
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

impl ForgotPasswordForm {
    /// The trimmed email, once it validates
    pub fn into_email(self) -> Result<String, ValidationFailure> {
        self.validate()?;
        Ok(self.email.trim().to_string())
    }
}

impl ResetPasswordForm {
    /// `(token, new_password)`, once both validate
    pub fn into_parts(self) -> Result<(String, String), ValidationFailure> {
        self.validate()?;
        Ok((self.token, self.password))
    }
}

/// Check a team's name and size before it is sent.
pub fn validate_team(name: &str, hero_ids: &[i64]) -> Result<(), ValidationFailure> {
    if name.trim().is_empty() {
        return Err(ValidationFailure::MissingTeamName);
    }
    validate_team_size(hero_ids.len())
}

pub fn validate_team_size(selected: usize) -> Result<(), ValidationFailure> {
    if selected < MIN_TEAM_SIZE {
        Err(ValidationFailure::TooFewHeroes { selected })
    } else if selected > MAX_TEAM_SIZE {
        Err(ValidationFailure::TooManyHeroes { selected })
    } else {
        Ok(())
    }
}

impl TeamCreate {
    pub fn validate_local(&self) -> Result<(), ValidationFailure> {
        validate_team(&self.name, &self.superhero_ids)
    }
}

impl TeamUpdate {
    /// Only the fields being changed are checked.
    pub fn validate_local(&self) -> Result<(), ValidationFailure> {
        if matches!(self.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ValidationFailure::MissingTeamName);
        }
        match self.superhero_ids {
            Some(ref ids) => validate_team_size(ids.len()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_login_form() {
        let ok = LoginForm {
            email: "a@b.com".to_string(),
            password: "Secret123!".to_string(),
        };
        assert_eq!(ok.into_request().unwrap().email, "a@b.com");

        let bad = LoginForm {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let failure = bad.into_request().unwrap_err();
        assert_eq!(failure.fields(), vec!["email", "password"]);
    }

    #[test]
    fn test_register_password_rules() {
        assert!(register_form("Secret123!", "Secret123!").into_request().is_ok());

        let failure = register_form("secret123!", "secret123!").into_request().unwrap_err();
        assert_eq!(failure.fields(), vec!["password"]);
        assert!(failure.to_string().contains("one uppercase letter"));

        let failure = register_form("Secret123!", "Secret123?").into_request().unwrap_err();
        assert_eq!(failure.fields(), vec!["confirm_password"]);
        assert!(failure.to_string().contains("Passwords do not match"));
    }

    #[test]
    fn test_register_short_names() {
        let mut form = register_form("Secret123!", "Secret123!");
        form.first_name = "A".to_string();
        let failure = form.into_request().unwrap_err();
        assert_eq!(failure.fields(), vec!["first_name"]);
    }

    #[test]
    fn test_reset_password_form() {
        let form = ResetPasswordForm {
            token: String::new(),
            password: "Secret123!".to_string(),
            confirm_password: "Secret123!".to_string(),
        };
        let failure: ValidationFailure = form.validate().unwrap_err().into();
        assert_eq!(failure.fields(), vec!["token"]);

        let form = ResetPasswordForm {
            token: "abc".to_string(),
            password: "Secret123!".to_string(),
            confirm_password: "Secret123!".to_string(),
        };
        assert_eq!(
            form.into_parts().unwrap(),
            ("abc".to_string(), "Secret123!".to_string())
        );
    }

    #[test]
    fn test_forgot_password_form() {
        assert!(ForgotPasswordForm { email: "a@b.com".to_string() }.validate().is_ok());
        assert!(ForgotPasswordForm { email: "a@".to_string() }.validate().is_err());
        assert_eq!(
            ForgotPasswordForm { email: "a@b.com".to_string() }.into_email(),
            Ok("a@b.com".to_string())
        );
        let failure = ForgotPasswordForm { email: "nope".to_string() }.into_email().unwrap_err();
        assert_eq!(failure.fields(), vec!["email"]);
    }

    #[test]
    fn test_team_size_bounds() {
        assert_eq!(
            validate_team("Night Shift", &[1]),
            Err(ValidationFailure::TooFewHeroes { selected: 1 })
        );
        assert_eq!(
            validate_team("Night Shift", &[1, 2, 3, 4, 5, 6]),
            Err(ValidationFailure::TooManyHeroes { selected: 6 })
        );
        assert!(validate_team("Night Shift", &[1, 2]).is_ok());
        assert!(validate_team("Night Shift", &[1, 2, 3, 4, 5]).is_ok());
        assert_eq!(validate_team("   ", &[1, 2]), Err(ValidationFailure::MissingTeamName));
    }

    #[test]
    fn test_team_update_checks_changed_fields() {
        assert!(TeamUpdate::default().validate_local().is_ok());
        let rename = TeamUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(rename.validate_local(), Err(ValidationFailure::MissingTeamName));
        let shrink = TeamUpdate {
            superhero_ids: Some(vec![1]),
            ..Default::default()
        };
        assert_eq!(
            shrink.validate_local(),
            Err(ValidationFailure::TooFewHeroes { selected: 1 })
        );
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            ValidationFailure::TooFewHeroes { selected: 1 }.to_string(),
            "Please select at least 2 superheroes for your team"
        );
        assert_eq!(
            ValidationFailure::TooManyHeroes { selected: 6 }.to_string(),
            "A team can have a maximum of 5 superheroes"
        );
    }
}
