//! Calendar, consultation and analytics client methods

use super::{ClientError, SessionClient, attempt::ApiRequest};
use crate::types::{
    AnalyticsSummary, Booking, BookingRequest, CalendarEvent, ConsultationSlot, EventInput,
    Listing,
};
use chrono::NaiveDate;

impl SessionClient {
    /// Calendar events, optionally bounded by date
    pub async fn list_events(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Listing<CalendarEvent>, ClientError> {
        let mut req = ApiRequest::get("/calendar/events/");
        if let Some(from) = from {
            req = req.query("from", from.format("%Y-%m-%d"));
        }
        if let Some(to) = to {
            req = req.query("to", to.format("%Y-%m-%d"));
        }
        self.execute(&req).await
    }

    pub async fn create_event(&self, event: &EventInput) -> Result<CalendarEvent, ClientError> {
        self.post("/calendar/events/", event).await
    }

    /// Open consultation slots
    pub async fn consultation_slots(&self) -> Result<Listing<ConsultationSlot>, ClientError> {
        self.get("/consultations/slots/").await
    }

    pub async fn book_consultation(&self, request: &BookingRequest) -> Result<Booking, ClientError> {
        self.post("/consultations/book/", request).await
    }

    /// Dashboard analytics
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, ClientError> {
        self.get("/analytics/summary/").await
    }
}
