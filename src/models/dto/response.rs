use serde::{Deserialize, Serialize};

use crate::models::domain::ReportType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateReportResponse {
    pub frontend_report_url: String,
    pub ui_ux_report_url: String,
    pub seo_report_url: String,
}

impl GenerateReportResponse {
    pub fn download_links() -> Self {
        Self {
            frontend_report_url: ReportType::Frontend.download_url(),
            ui_ux_report_url: ReportType::UiUx.download_url(),
            seo_report_url: ReportType::Seo.download_url(),
        }
    }
}
