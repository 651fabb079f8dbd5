//! Report template client methods

use super::{ClientError, SessionClient};
use crate::types::{Listing, ReportTemplate, TemplateInput};

impl SessionClient {
    pub async fn list_templates(&self) -> Result<Listing<ReportTemplate>, ClientError> {
        self.get("/report-templates/").await
    }

    pub async fn create_template(
        &self,
        template: &TemplateInput,
    ) -> Result<ReportTemplate, ClientError> {
        self.post("/report-templates/", template).await
    }

    pub async fn update_template(
        &self,
        template_id: &str,
        template: &TemplateInput,
    ) -> Result<ReportTemplate, ClientError> {
        self.put(&format!("/report-templates/{template_id}/"), template)
            .await
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/report-templates/{template_id}/"))
            .await
    }
}
