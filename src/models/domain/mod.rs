pub mod audit;
pub mod content;
pub mod fetch_outcome;
pub mod report;
pub mod site_data;
pub use audit::{AnalysisCategory, AuditFinding, CategoryResult, PageAnalysis};
pub use content::{ContentFormat, PageContent};
pub use fetch_outcome::FetchOutcome;
pub use report::{ReportPaths, ReportSet, ReportType};
pub use site_data::SiteData;
