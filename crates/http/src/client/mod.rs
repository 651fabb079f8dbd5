//! Numen session client
//!
//! Every call to the API goes through [`SessionClient::send`], which
//!
//! - attaches `Authorization: Bearer <access_token>` when a token is stored,
//! - on a first 401, exchanges the refresh token once and re-sends the call,
//! - purges the session and emits [`SessionEvent::Invalidated`] when the
//!   credentials cannot be recovered,
//! - reports every other failure through the installed [`Notifier`] exactly
//!   once before returning it to the caller.

pub mod attempt;
pub mod auth;
pub mod calendar;
pub mod chat;
pub mod error;
pub mod notifications;
pub mod numerology;
pub mod payments;
pub mod people;
pub mod refresh;
pub mod templates;
pub mod user;

use attempt::{ApiRequest, Attempt};
use error::ClientError;
use reqwest::{Client, ClientBuilder, Response, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, broadcast};

use crate::config::ClientConfig;
use crate::events::{InvalidationReason, SessionEvent, SessionEvents};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::store::{ACCESS_TOKEN_KEY, MemoryStore, SessionStore, USER_KEY};
use crate::types::User;

const DEFAULT_USER_AGENT: &str = concat!("numen-client/", env!("CARGO_PKG_VERSION"));

/// Session-aware API client
///
/// Cheap to clone; clones share the store, notifier, event hub and
/// connection pool.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    events: SessionEvents,
    refresh_lock: Option<Mutex<()>>,
}

impl SessionClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> SessionClientBuilder {
        SessionClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The session store credentials are read from
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Currently stored access token; a blank value counts as none
    pub fn access_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self
            .inner
            .store
            .get(ACCESS_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    /// Whether an access token is stored
    pub fn is_authenticated(&self) -> bool {
        matches!(self.access_token(), Ok(Some(_)))
    }

    /// The cached user profile, if one was stored at login
    pub fn cached_user(&self) -> Result<Option<User>, ClientError> {
        match self.inner.store.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Dispatch a request through the session pipeline
    ///
    /// Returns the response unmodified on success.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let attempt = Attempt::first(request);
        let token = self.access_token()?;
        let response = self.dispatch(attempt, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !attempt.can_refresh() {
            return self.settle(attempt, response).await;
        }

        debug!(path = %request.path(), "Access token rejected, refreshing");
        let retry = attempt.retry();
        let fresh = self.refresh_after_unauthorized(token.as_deref()).await?;
        let response = self.dispatch(retry, Some(&fresh)).await?;
        self.settle(retry, response).await
    }

    /// Dispatch a request and decode the JSON response
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Dispatch a request and discard the response body
    pub async fn execute_empty(&self, request: &ApiRequest) -> Result<(), ClientError> {
        self.send(request).await.map(|_| ())
    }

    /// Authenticated GET returning JSON
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(&ApiRequest::get(path)).await
    }

    /// Authenticated POST with a JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(&ApiRequest::post(path).json(body)?).await
    }

    /// Authenticated PUT with a JSON body
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(&ApiRequest::put(path).json(body)?).await
    }

    /// Authenticated PATCH with a JSON body
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(&ApiRequest::patch(path).json(body)?).await
    }

    /// Authenticated DELETE
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute_empty(&ApiRequest::delete(path)).await
    }

    /// Build the transport request for one attempt
    fn build(&self, attempt: Attempt<'_>, token: Option<&str>) -> reqwest::RequestBuilder {
        let request = attempt.request();
        let url = format!("{}{}", self.inner.base_url, request.path());
        let mut builder = self.inner.http.request(request.method().clone(), url);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        builder
    }

    /// Send one attempt; transport failures are reported here
    async fn dispatch(
        &self,
        attempt: Attempt<'_>,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let request = attempt.request();
        debug!(
            method = %request.method(),
            path = %request.path(),
            retry = attempt.retry_count(),
            authenticated = token.is_some(),
            "Dispatching request"
        );

        self.build(attempt, token)
            .send()
            .await
            .map_err(|e| self.report(ClientError::from_transport(e)))
    }

    /// Turn a received response into the call's outcome
    async fn settle(&self, attempt: Attempt<'_>, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let request = attempt.request();
        if status == StatusCode::UNAUTHORIZED
            && attempt.is_retry()
            && request.refreshes_on_unauthorized()
        {
            return Err(self.invalidate(InvalidationReason::RetryUnauthorized));
        }

        let body = response.text().await.unwrap_or_default();
        let error = ClientError::from_status(status, &body);
        debug!(path = %request.path(), %status, "Request failed");
        Err(self.report(error))
    }

    /// Show the notice for `error` and hand it back
    pub(crate) fn report(&self, error: ClientError) -> ClientError {
        warn!(error = %error, "API call failed");
        if let Some(notice) = Notice::for_error(&error) {
            self.inner.notifier.notify(notice);
        }
        error
    }

    /// Purge credentials after an unrecoverable auth failure
    pub(crate) fn invalidate(&self, reason: InvalidationReason) -> ClientError {
        warn!(?reason, "Session invalidated, purging stored credentials");
        if let Err(e) = self.inner.store.clear() {
            error!(error = %e, "Failed to purge session store");
        }
        self.inner.events.emit(SessionEvent::Invalidated(reason));
        self.inner.notifier.notify(Notice::session_expired());
        ClientError::SessionExpired
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.inner.events.emit(event);
    }
}

/// Builder for `SessionClient`
#[derive(Default)]
pub struct SessionClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    coalesce_refresh: bool,
}

impl SessionClientBuilder {
    /// Start from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::default()
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .coalesce_refresh(config.coalesce_refresh);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder
    }

    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the session store (defaults to an empty `MemoryStore`)
    #[must_use]
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the notification sink (defaults to `TracingNotifier`)
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Let concurrent 401s share one refresh exchange
    #[must_use]
    pub const fn coalesce_refresh(mut self, enabled: bool) -> Self {
        self.coalesce_refresh = enabled;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SessionClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url:?}: {e}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let timeout = self
                .timeout
                .unwrap_or(Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS));
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));

        let http = client_builder.build()?;

        Ok(SessionClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
                notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
                events: SessionEvents::new(),
                refresh_lock: self.coalesce_refresh.then(|| Mutex::new(())),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = SessionClient::builder().build();
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = SessionClient::new("not a url");
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = SessionClient::new("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::default();
        let client = SessionClientBuilder::from_config(&config).build().unwrap();
        assert_eq!(client.base_url(), crate::config::DEFAULT_BASE_URL);
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_cached_user_roundtrip() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(USER_KEY, r#"{"id": "42", "email": "ada@example.com"}"#)
            .unwrap();
        let client = SessionClient::builder()
            .base_url("http://localhost:8000/api/v1")
            .store(store)
            .build()
            .unwrap();

        let user = client.cached_user().unwrap().unwrap();
        assert_eq!(user.email, "ada@example.com");
    }
}
