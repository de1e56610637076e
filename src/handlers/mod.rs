pub mod report_handler;

pub use report_handler::{download_report, generate_reports, health_check, root};
