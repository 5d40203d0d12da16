use anyhow::{anyhow, Context, Result};
use tracing::info;

use herohub_core::messages::Action;
use herohub_core::navigation::LOGIN_ROUTE;
use herohub_core::validation::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};

use crate::app::{prompt, prompt_password, App};
use crate::output;

pub async fn login(app: &mut App, email: Option<String>) -> Result<()> {
    app.enter(LOGIN_ROUTE);

    let email = match email {
        Some(email) => email,
        None => prompt("Email", app.config.last_email.as_deref())?,
    };
    let password = prompt_password("Password")?;

    let request = LoginForm { email, password }
        .into_request()
        .map_err(|e| app.explain(Action::Login, e))?;

    let tokens = app
        .client
        .login(&request)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::Login, e))?;

    let snapshot = app
        .session
        .login(tokens)
        .context("Signed in, but the session could not be saved")?;
    app.remember_email(&request.email);

    if let Some(user) = snapshot.user {
        info!(user_id = user.id, "Logged in");
        println!("Welcome back, {}!", user.first_name);
    }
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    let was_signed_in = app.session.is_authenticated();
    app.session.logout().context("Failed to clear the saved session")?;
    app.enter(LOGIN_ROUTE);

    if was_signed_in {
        println!("Logged out.");
    } else {
        println!("You were not logged in.");
    }
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    app.enter_protected("/dashboard")?;

    // Ask the server, so an expired token shows up here
    let user = app
        .client
        .current_user()
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::Login, e))?;
    output::user(&user);
    Ok(())
}

pub async fn register(app: &App) -> Result<()> {
    app.enter("/register");

    let form = RegisterForm {
        first_name: prompt("First name", None)?,
        last_name: prompt("Last name", None)?,
        email: prompt("Email", None)?,
        password: prompt_password("Password")?,
        confirm_password: prompt_password("Confirm password")?,
    };
    let request = form
        .into_request()
        .map_err(|e| app.explain(Action::Register, e))?;

    let user = app
        .client
        .register(&request)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::Register, e))?;

    info!(user_id = user.id, "Account created");
    println!("Account created for {}. Run `herohub login` to sign in.", user.email);
    Ok(())
}

pub async fn forgot_password(app: &App, email: Option<String>) -> Result<()> {
    app.enter("/forgot-password");

    let email = match email {
        Some(email) => email,
        None => prompt("Email", app.config.last_email.as_deref())?,
    };
    let email = ForgotPasswordForm { email }
        .into_email()
        .map_err(|e| app.explain(Action::ForgotPassword, e))?;

    let envelope = app
        .client
        .forgot_password(&email)
        .await
        .map_err(|e| app.explain(Action::ForgotPassword, e))?;
    let message = envelope.message.clone();
    envelope
        .into_result()
        .map_err(|e| app.explain(Action::ForgotPassword, e))?;

    println!("{}", message);
    Ok(())
}

pub async fn reset_password(app: &App, token: &str) -> Result<()> {
    app.enter("/reset-password");

    let status = app
        .client
        .verify_reset_token(token)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::ResetPassword, e))?;
    if !status.valid {
        return Err(anyhow!("This reset link is invalid or has expired. Request a new one with `herohub forgot-password`."));
    }

    let form = ResetPasswordForm {
        token: token.to_string(),
        password: prompt_password("New password")?,
        confirm_password: prompt_password("Confirm new password")?,
    };
    let (token, new_password) = form
        .into_parts()
        .map_err(|e| app.explain(Action::ResetPassword, e))?;

    app.client
        .reset_password(&token, &new_password)
        .await
        .and_then(|envelope| envelope.into_result())
        .map_err(|e| app.explain(Action::ResetPassword, e))?;

    println!("Password reset. Run `herohub login` to sign in.");
    Ok(())
}
