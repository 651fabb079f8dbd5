//! Refresh-token exchange

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{SessionClient, error::ClientError};
use crate::events::{InvalidationReason, SessionEvent};
use crate::store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Endpoint minting new access tokens
pub const REFRESH_PATH: &str = "/auth/refresh-token/";

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Refresh endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Present when the server rotates refresh tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl SessionClient {
    /// Exchange the stored refresh token for a new access token
    ///
    /// Failure purges the session exactly like a failed automatic refresh.
    pub async fn refresh_session(&self) -> Result<String, ClientError> {
        self.rotate().await
    }

    /// Obtain a usable access token after `rejected` drew a 401
    pub(crate) async fn refresh_after_unauthorized(
        &self,
        rejected: Option<&str>,
    ) -> Result<String, ClientError> {
        let Some(lock) = &self.inner.refresh_lock else {
            return self.rotate().await;
        };

        let _guard = lock.lock().await;
        // Another request may have rotated the token while this one waited
        if let Some(current) = self.access_token()? {
            if rejected != Some(current.as_str()) {
                debug!("Reusing access token refreshed by a concurrent request");
                return Ok(current);
            }
        }
        self.rotate().await
    }

    async fn rotate(&self) -> Result<String, ClientError> {
        match self.exchange_refresh_token().await {
            Ok(token) => Ok(token),
            Err(reason) => Err(self.invalidate(reason)),
        }
    }

    async fn exchange_refresh_token(&self) -> Result<String, InvalidationReason> {
        let refresh = match self.inner.store.get(REFRESH_TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return Err(InvalidationReason::MissingRefreshToken),
            Err(e) => {
                error!(error = %e, "Session store unreadable, cannot refresh");
                return Err(InvalidationReason::StoreUnreadable);
            }
        };

        let url = format!("{}{REFRESH_PATH}", self.inner.base_url);
        let response = self
            .inner
            .http
            .request(Method::POST, url)
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Refresh endpoint unreachable");
                InvalidationReason::RefreshUnreachable
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Refresh token rejected");
            return Err(InvalidationReason::RefreshRejected);
        }

        let tokens: RefreshResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Unreadable refresh response");
            InvalidationReason::RefreshRejected
        })?;
        if tokens.access_token.trim().is_empty() {
            warn!("Refresh response carried an empty access token");
            return Err(InvalidationReason::RefreshRejected);
        }

        let persisted = self
            .inner
            .store
            .set(ACCESS_TOKEN_KEY, &tokens.access_token)
            .and_then(|()| match &tokens.refresh_token {
                Some(rotated) => self.inner.store.set(REFRESH_TOKEN_KEY, rotated),
                None => Ok(()),
            });
        if let Err(e) = persisted {
            // The new token still authorizes this call; later calls will refresh again.
            error!(error = %e, "Failed to persist refreshed tokens");
        }

        info!(rotated = tokens.refresh_token.is_some(), "Access token refreshed");
        self.emit(SessionEvent::TokenRefreshed);
        Ok(tokens.access_token)
    }
}
