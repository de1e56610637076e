pub mod agent_steps;
pub mod document_renderer;
pub mod html_cleaner;
pub mod page_analysis_service;
pub mod page_content_service;
pub mod report_orchestrator_service;
pub mod report_service;
pub mod site_data_cache;
