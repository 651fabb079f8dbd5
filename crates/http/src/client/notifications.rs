//! In-app notification client methods

use super::{ClientError, SessionClient, attempt::ApiRequest};
use crate::types::{Listing, Notification};

impl SessionClient {
    /// List notifications, optionally only unread ones
    pub async fn list_notifications(
        &self,
        unread_only: bool,
    ) -> Result<Listing<Notification>, ClientError> {
        let mut req = ApiRequest::get("/notifications/");
        if unread_only {
            req = req.query("unread", true);
        }
        self.execute(&req).await
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<(), ClientError> {
        self.execute_empty(&ApiRequest::post(format!(
            "/notifications/{notification_id}/read/"
        )))
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        self.execute_empty(&ApiRequest::post("/notifications/read-all/"))
            .await
    }
}
