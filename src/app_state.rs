use std::{path::PathBuf, sync::Arc};

use crate::{
    config::Config,
    errors::AppResult,
    services::{
        document_renderer::{DocumentRenderer, PdfDocumentRenderer},
        page_analysis_service::PageAnalysisFetcher,
        page_content_service::PageContentFetcher,
        report_orchestrator_service::{OpenAiReportOrchestrator, ReportOrchestrator},
        report_service::ReportService,
        site_data_cache::{SiteDataCache, SiteDataFetcher, UpstreamSiteDataFetcher},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportService>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        let fetcher = UpstreamSiteDataFetcher::new(
            PageAnalysisFetcher::from_config(client.clone(), &config),
            PageContentFetcher::from_config(client, &config),
        );
        let report_service = ReportService::new(
            Arc::new(SiteDataCache::new(Arc::new(fetcher))),
            Arc::new(OpenAiReportOrchestrator::from_config(&config)),
            Arc::new(PdfDocumentRenderer::new()),
            config.output_dir.clone(),
        );

        Ok(Self {
            report_service: Arc::new(report_service),
        })
    }

    /// Wires the report pipeline from explicit collaborators.
    pub fn with_collaborators(
        fetcher: Arc<dyn SiteDataFetcher>,
        orchestrator: Arc<dyn ReportOrchestrator>,
        renderer: Arc<dyn DocumentRenderer>,
        output_dir: PathBuf,
    ) -> Self {
        let report_service = ReportService::new(
            Arc::new(SiteDataCache::new(fetcher)),
            orchestrator,
            renderer,
            output_dir,
        );

        Self {
            report_service: Arc::new(report_service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[actix_web::test]
    async fn test_new_uses_configured_output_dir() {
        let mut config = Config::test_config();
        config.output_dir = PathBuf::from("reports-out");

        let state = AppState::new(config).unwrap();

        assert_eq!(
            state.report_service.output_dir(),
            std::path::Path::new("reports-out")
        );
        assert!(state.report_service.cache().is_empty().await);
    }
}
