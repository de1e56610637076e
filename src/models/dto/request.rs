use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_REPORT_URL: &str = "https://www.berkshirehathaway.com/";

fn default_report_url() -> String {
    DEFAULT_REPORT_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateReportRequest {
    #[serde(default = "default_report_url")]
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadReportQuery {
    #[serde(rename = "type")]
    pub report_type: String,
}
