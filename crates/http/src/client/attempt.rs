//! Request descriptions and attempt records

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::ClientError;

/// Refresh exchanges allowed per original request
const MAX_REFRESHES: u8 = 1;

/// Immutable description of an outbound API call
///
/// Kept separate from `reqwest::Request` so the same call can be rebuilt with
/// a different bearer token when it is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    refresh_on_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };

        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            refresh_on_unauthorized: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Treat a 401 as an ordinary error instead of refreshing
    ///
    /// Used for credential endpoints (login, register) where a 401 means the
    /// submitted credentials are wrong, not that the session expired.
    #[must_use]
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub const fn refreshes_on_unauthorized(&self) -> bool {
        self.refresh_on_unauthorized
    }
}

/// One dispatch of an [`ApiRequest`]
///
/// Attempts are values: retrying produces a new record instead of flagging the
/// request, so the refresh bound is visible in the types.
#[derive(Debug, Clone, Copy)]
pub struct Attempt<'a> {
    request: &'a ApiRequest,
    retry_count: u8,
}

impl<'a> Attempt<'a> {
    pub const fn first(request: &'a ApiRequest) -> Self {
        Self {
            request,
            retry_count: 0,
        }
    }

    /// The record for re-dispatching after a refresh
    #[must_use]
    pub const fn retry(self) -> Self {
        Self {
            request: self.request,
            retry_count: self.retry_count.saturating_add(1),
        }
    }

    pub const fn request(&self) -> &'a ApiRequest {
        self.request
    }

    pub const fn retry_count(&self) -> u8 {
        self.retry_count
    }

    pub const fn is_retry(&self) -> bool {
        self.retry_count > 0
    }

    /// Whether a 401 on this attempt may trigger a refresh exchange
    pub const fn can_refresh(&self) -> bool {
        self.request.refresh_on_unauthorized && self.retry_count < MAX_REFRESHES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_is_normalized() {
        assert_eq!(ApiRequest::get("users/me/").path(), "/users/me/");
        assert_eq!(ApiRequest::get("/users/me/").path(), "/users/me/");
    }

    #[test]
    fn test_retry_does_not_touch_request() {
        let request = ApiRequest::post("/numerology/calculate/")
            .json(&json!({"full_name": "Ada Lovelace"}))
            .unwrap();
        let first = Attempt::first(&request);
        let retry = first.retry();

        assert!(first.can_refresh());
        assert!(!first.is_retry());
        assert!(retry.is_retry());
        assert!(!retry.can_refresh());
        assert_eq!(retry.request(), &request);
        assert_eq!(first.retry_count(), 0);
    }

    #[test]
    fn test_without_refresh() {
        let request = ApiRequest::post("/auth/login/").without_refresh();
        assert!(!Attempt::first(&request).can_refresh());
    }

    #[test]
    fn test_query_pairs() {
        let request = ApiRequest::get("/notifications/")
            .query("page", 2)
            .query("unread", true);
        assert_eq!(
            request.query_pairs(),
            &[
                ("page".to_string(), "2".to_string()),
                ("unread".to_string(), "true".to_string())
            ]
        );
    }
}
