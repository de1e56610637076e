use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};

use crate::{
    models::domain::SiteData,
    services::{page_analysis_service::PageAnalysisFetcher, page_content_service::PageContentFetcher},
};

#[async_trait]
pub trait SiteDataFetcher: Send + Sync {
    /// Gathers audits and content for `url`. Per-slot failures are carried
    /// inside the returned data.
    async fn fetch_site_data(&self, url: &str) -> SiteData;
}

pub struct UpstreamSiteDataFetcher {
    analysis: PageAnalysisFetcher,
    content: PageContentFetcher,
}

impl UpstreamSiteDataFetcher {
    pub fn new(analysis: PageAnalysisFetcher, content: PageContentFetcher) -> Self {
        Self { analysis, content }
    }
}

#[async_trait]
impl SiteDataFetcher for UpstreamSiteDataFetcher {
    async fn fetch_site_data(&self, url: &str) -> SiteData {
        let (analysis, content) = tokio::join!(self.analysis.fetch(url), self.content.fetch(url));

        let failed_categories = analysis.failed_categories();
        let failed_formats = content.failed_formats();
        if failed_categories.is_empty() && failed_formats.is_empty() {
            log::info!("Fetched all audit categories and content formats for {}", url);
        } else {
            log::warn!(
                "Fetched {} with failures: categories {:?}, formats {:?}",
                url,
                failed_categories,
                failed_formats
            );
        }

        SiteData {
            url: url.to_string(),
            analysis,
            content,
        }
    }
}

/// Process-lifetime memo of [`SiteData`] per URL. The first caller for a
/// URL runs the fetch; concurrent and later callers get the same value.
/// Entries are never refreshed or evicted.
pub struct SiteDataCache {
    fetcher: Arc<dyn SiteDataFetcher>,
    entries: RwLock<HashMap<String, Arc<OnceCell<Arc<SiteData>>>>>,
}

impl SiteDataCache {
    pub fn new(fetcher: Arc<dyn SiteDataFetcher>) -> Self {
        Self {
            fetcher,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Initialisation runs on its own task, so a caller that goes away
    /// mid-fetch neither aborts the fetch nor resets the entry.
    pub async fn get_or_fetch(&self, url: &str) -> Arc<SiteData> {
        let cell = self.cell_for(url).await;
        if let Some(site) = cell.get() {
            return Arc::clone(site);
        }

        let init = tokio::spawn(Self::initialise(
            Arc::clone(&cell),
            Arc::clone(&self.fetcher),
            url.to_string(),
        ));
        match init.await {
            Ok(site) => site,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                log::warn!("Site data task for {} was cancelled: {}", url, e);
                Self::initialise(cell, Arc::clone(&self.fetcher), url.to_string()).await
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn initialise(
        cell: Arc<OnceCell<Arc<SiteData>>>,
        fetcher: Arc<dyn SiteDataFetcher>,
        url: String,
    ) -> Arc<SiteData> {
        let site = cell
            .get_or_init(|| async {
                log::info!("No cached site data for {}, fetching", url);
                Arc::new(fetcher.fetch_site_data(&url).await)
            })
            .await;
        Arc::clone(site)
    }

    async fn cell_for(&self, url: &str) -> Arc<OnceCell<Arc<SiteData>>> {
        if let Some(cell) = self.entries.read().await.get(url) {
            return Arc::clone(cell);
        }
        let mut entries = self.entries.write().await;
        Arc::clone(entries.entry(url.to_string()).or_default())
    }
}
