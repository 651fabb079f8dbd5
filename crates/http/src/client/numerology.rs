//! Numerology calculation and report client methods

use super::{ClientError, SessionClient, attempt::ApiRequest};
use crate::types::{
    CalculationRequest, CalculationResult, CompatibilityRequest, CompatibilityResult,
    DailyReading, GenerateReportRequest, Listing, Report,
};
use chrono::NaiveDate;

impl SessionClient {
    /// Compute the core numbers for a name and birth date
    pub async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ClientError> {
        self.post("/numerology/calculate/", request).await
    }

    /// List the user's reports
    pub async fn list_reports(&self, page: Option<u32>) -> Result<Listing<Report>, ClientError> {
        let mut req = ApiRequest::get("/numerology/reports/");
        if let Some(page) = page {
            req = req.query("page", page);
        }
        self.execute(&req).await
    }

    /// Get a single report
    pub async fn get_report(&self, report_id: &str) -> Result<Report, ClientError> {
        self.get(&format!("/numerology/reports/{report_id}/")).await
    }

    /// Generate a new report
    pub async fn generate_report(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<Report, ClientError> {
        self.post("/numerology/reports/generate/", request).await
    }

    /// Reading for a given day (today when `date` is `None`)
    pub async fn daily_reading(&self, date: Option<NaiveDate>) -> Result<DailyReading, ClientError> {
        let mut req = ApiRequest::get("/numerology/daily-reading/");
        if let Some(date) = date {
            req = req.query("date", date.format("%Y-%m-%d"));
        }
        self.execute(&req).await
    }

    /// Compatibility between two people
    pub async fn compatibility(
        &self,
        request: &CompatibilityRequest,
    ) -> Result<CompatibilityResult, ClientError> {
        self.post("/numerology/compatibility/", request).await
    }
}
