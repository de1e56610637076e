use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ReportPaths, ReportType},
    services::{
        document_renderer::DocumentRenderer, report_orchestrator_service::ReportOrchestrator,
        site_data_cache::SiteDataCache,
    },
};

pub struct ReportService {
    cache: Arc<SiteDataCache>,
    orchestrator: Arc<dyn ReportOrchestrator>,
    renderer: Arc<dyn DocumentRenderer>,
    output_dir: PathBuf,
    /// Report files have fixed names, so only one generation may write at a time.
    generation_lock: Mutex<()>,
}

impl ReportService {
    pub fn new(
        cache: Arc<SiteDataCache>,
        orchestrator: Arc<dyn ReportOrchestrator>,
        renderer: Arc<dyn DocumentRenderer>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            cache,
            orchestrator,
            renderer,
            output_dir,
            generation_lock: Mutex::new(()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn cache(&self) -> &SiteDataCache {
        &self.cache
    }

    /// Produces the three PDF reports for `url` and returns where they were
    /// written. Site data comes from the cache, so upstream services are hit
    /// at most once per URL.
    pub async fn generate_reports(&self, url: &str) -> AppResult<ReportPaths> {
        log::info!("Generating reports for {}", url);
        let site = self.cache.get_or_fetch(url).await;

        let reports = self
            .orchestrator
            .produce_reports(url, &site.content, &site.analysis)
            .await?;

        let empty = reports.empty_reports();
        if !empty.is_empty() {
            let names: Vec<&str> = empty.iter().map(|r| r.title()).collect();
            return Err(AppError::Orchestration(format!(
                "Empty report content for: {}",
                names.join(", ")
            )));
        }

        let _guard = self.generation_lock.lock().await;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        for report_type in ReportType::ALL {
            let path = report_type.markdown_path(&self.output_dir);
            tokio::fs::write(&path, reports.get(report_type)).await?;
            log::debug!("Wrote {}", path.display());
            remove_stale_file(&report_type.pdf_path(&self.output_dir)).await?;
        }

        let renderer = Arc::clone(&self.renderer);
        let output_dir = self.output_dir.clone();
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            for report_type in ReportType::ALL {
                renderer.render(
                    &report_type.markdown_path(&output_dir),
                    &report_type.pdf_path(&output_dir),
                )?;
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Render task failed: {}", e)))??;

        let paths = ReportPaths {
            frontend: ReportType::Frontend.pdf_path(&self.output_dir),
            ui_ux: ReportType::UiUx.pdf_path(&self.output_dir),
            seo: ReportType::Seo.pdf_path(&self.output_dir),
        };
        for path in paths.all() {
            if !tokio::fs::try_exists(path).await? {
                return Err(AppError::Render(format!(
                    "Expected PDF was not produced: {}",
                    path.display()
                )));
            }
        }

        log::info!("Reports for {} written to {}", url, self.output_dir.display());
        Ok(paths)
    }

    /// Reads a previously generated PDF.
    pub async fn read_report(&self, report_type: ReportType) -> AppResult<Vec<u8>> {
        let path = report_type.pdf_path(&self.output_dir);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                format!("Report not found: {}", report_type.pdf_file_name()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

async fn remove_stale_file(path: &Path) -> AppResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            log::debug!("Removed previous {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
