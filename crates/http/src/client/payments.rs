//! Payment and subscription client methods

use super::{ClientError, SessionClient, attempt::ApiRequest};
use crate::types::{CheckoutRequest, CheckoutSession, Listing, MessageResponse, Plan, Subscription};

impl SessionClient {
    /// Available subscription plans
    pub async fn list_plans(&self) -> Result<Listing<Plan>, ClientError> {
        self.get("/payments/plans/").await
    }

    /// The user's current subscription
    pub async fn get_subscription(&self) -> Result<Subscription, ClientError> {
        self.get("/payments/subscription/").await
    }

    /// Start a hosted checkout for a plan
    pub async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ClientError> {
        self.post("/payments/checkout/", request).await
    }

    /// Cancel the current subscription at period end
    pub async fn cancel_subscription(&self) -> Result<MessageResponse, ClientError> {
        self.execute(&ApiRequest::post("/payments/subscription/cancel/"))
            .await
    }
}
