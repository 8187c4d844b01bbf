// Analytics and report endpoints

use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{DashboardItem, ReportItem, ReportRequest, TrendPointItem};

impl DnpClient {
    /// `GET analytics/dashboard`
    pub async fn dashboard(&self) -> Result<DashboardItem, Error> {
        self.get("analytics/dashboard").await
    }

    /// `GET analytics/trends?days={days}`
    pub async fn trends(&self, days: u32) -> Result<Vec<TrendPointItem>, Error> {
        self.get_with_params("analytics/trends", &[("days", days.to_string())])
            .await
    }

    /// Request report generation. The backend renders asynchronously; poll
    /// [`get_report`](Self::get_report) until `status` is `"ready"`.
    ///
    /// `POST analytics/reports`
    pub async fn generate_report(&self, req: &ReportRequest) -> Result<ReportItem, Error> {
        debug!(report_type = %req.report_type, format = %req.format, "generating report");
        self.post("analytics/reports", req).await
    }

    /// `GET analytics/reports/{id}`
    pub async fn get_report(&self, report_id: &str) -> Result<ReportItem, Error> {
        self.get(&format!("analytics/reports/{report_id}")).await
    }
}
