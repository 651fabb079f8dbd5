//! Saved people client methods

use super::{ClientError, SessionClient};
use crate::types::{Listing, Person, PersonInput};

impl SessionClient {
    pub async fn list_people(&self) -> Result<Listing<Person>, ClientError> {
        self.get("/people/").await
    }

    pub async fn create_person(&self, person: &PersonInput) -> Result<Person, ClientError> {
        self.post("/people/", person).await
    }

    pub async fn update_person(
        &self,
        person_id: &str,
        person: &PersonInput,
    ) -> Result<Person, ClientError> {
        self.put(&format!("/people/{person_id}/"), person).await
    }

    pub async fn delete_person(&self, person_id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/people/{person_id}/")).await
    }
}
