//! Authentication API client methods

use super::{
    ClientError, SessionClient,
    attempt::{ApiRequest, Attempt},
};
use crate::events::SessionEvent;
use crate::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use crate::types::{
    AuthTokens, ChangePasswordRequest, EmailRequest, LoginRequest, MessageResponse,
    OtpVerifyRequest, PasswordResetConfirm, RegisterRequest,
};
use serde::Serialize;

#[derive(Serialize)]
struct LogoutRequest<'a> {
    refresh: &'a str,
}

impl SessionClient {
    /// Create an account
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        let req = ApiRequest::post("/auth/register/")
            .json(request)?
            .without_refresh();
        self.execute(&req).await
    }

    /// Log in and persist the issued credentials
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthTokens, ClientError> {
        let req = ApiRequest::post("/auth/login/")
            .json(request)?
            .without_refresh();
        let tokens: AuthTokens = self.execute(&req).await?;
        self.persist_tokens(&tokens)?;

        info!(email = %request.email, "Logged in");
        self.emit(SessionEvent::LoggedIn);
        Ok(tokens)
    }

    /// Verify a one-time password sent by email
    pub async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<MessageResponse, ClientError> {
        let req = ApiRequest::post("/auth/verify-otp/")
            .json(request)?
            .without_refresh();
        self.execute(&req).await
    }

    /// Send a new one-time password
    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let req = ApiRequest::post("/auth/resend-otp/")
            .json(&EmailRequest {
                email: email.to_string(),
            })?
            .without_refresh();
        self.execute(&req).await
    }

    /// Start a password reset
    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let req = ApiRequest::post("/auth/password-reset/")
            .json(&EmailRequest {
                email: email.to_string(),
            })?
            .without_refresh();
        self.execute(&req).await
    }

    /// Finish a password reset with the emailed code
    pub async fn confirm_password_reset(
        &self,
        request: &PasswordResetConfirm,
    ) -> Result<MessageResponse, ClientError> {
        let req = ApiRequest::post("/auth/password-reset/confirm/")
            .json(request)?
            .without_refresh();
        self.execute(&req).await
    }

    /// Change the password of the logged-in user
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.post("/auth/change-password/", request).await
    }

    /// End the session
    ///
    /// The server is told to blacklist the refresh token on a best-effort
    /// basis; local credentials are purged regardless of its answer.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(refresh) = self.inner.store.get(REFRESH_TOKEN_KEY)? {
            let req = ApiRequest::post("/auth/logout/")
                .json(&LogoutRequest { refresh: &refresh })?
                .without_refresh();
            let token = self.access_token()?;
            // Bypass `send` so a failed logout call never shows a notice
            match self.build(Attempt::first(&req), token.as_deref()).send().await {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => debug!(status = %response.status(), "Server-side logout failed"),
                Err(e) => debug!(error = %e, "Server-side logout failed"),
            }
        }

        self.inner.store.clear()?;
        info!("Logged out");
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    fn persist_tokens(&self, tokens: &AuthTokens) -> Result<(), ClientError> {
        let store = &self.inner.store;
        store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        match &tokens.user {
            Some(user) => store.set(USER_KEY, &serde_json::to_string(user)?)?,
            None => store.remove(USER_KEY)?,
        }
        Ok(())
    }
}
