//! User profile client methods

use super::{ClientError, SessionClient};
use crate::store::USER_KEY;
use crate::types::{ProfileUpdate, User};

const PROFILE_PATH: &str = "/users/me/";

impl SessionClient {
    /// Fetch the profile of the logged-in user and refresh the cached copy
    pub async fn get_profile(&self) -> Result<User, ClientError> {
        let user: User = self.get(PROFILE_PATH).await?;
        self.cache_user(&user)?;
        Ok(user)
    }

    /// Update the profile of the logged-in user
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let user: User = self.patch(PROFILE_PATH, update).await?;
        self.cache_user(&user)?;
        Ok(user)
    }

    fn cache_user(&self, user: &User) -> Result<(), ClientError> {
        self.inner
            .store
            .set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }
}
