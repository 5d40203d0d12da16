use serde::Deserialize;

use super::client::route;
use super::{ApiClient, ApiError, ApiRequest, Envelope};
use crate::models::{
    AuthTokens, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    ResetTokenStatus, User, VerifyResetTokenRequest,
};

/// `register` and `me` nest the user one level down
#[derive(Debug, Deserialize)]
struct UserData {
    user: User,
}

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<Envelope<User>, ApiError> {
        let envelope: Envelope<UserData> = self
            .execute(ApiRequest::post(route("auth/register")).json(request)?)
            .await?;
        Ok(envelope.map(|d| d.user))
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Envelope<AuthTokens>, ApiError> {
        self.execute(ApiRequest::post(route("auth/login")).json(request)?)
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Envelope<serde_json::Value>, ApiError> {
        let body = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        self.execute(ApiRequest::post(route("auth/forgot-password")).json(&body)?)
            .await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Envelope<serde_json::Value>, ApiError> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.execute(ApiRequest::post(route("auth/reset-password")).json(&body)?)
            .await
    }

    pub async fn verify_reset_token(&self, token: &str) -> Result<Envelope<ResetTokenStatus>, ApiError> {
        let body = VerifyResetTokenRequest {
            token: token.to_string(),
        };
        self.execute(ApiRequest::post(route("auth/verify-reset-token")).json(&body)?)
            .await
    }

    /// The user the current token belongs to
    pub async fn current_user(&self) -> Result<Envelope<User>, ApiError> {
        let envelope: Envelope<UserData> = self.execute(ApiRequest::get(route("auth/me"))).await?;
        Ok(envelope.map(|d| d.user))
    }
}
