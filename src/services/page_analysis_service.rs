use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    config::Config,
    models::domain::{AnalysisCategory, AuditFinding, CategoryResult, FetchOutcome, PageAnalysis},
};

const STRATEGY: &str = "desktop";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunPagespeedResponse {
    id: Option<String>,
    #[serde(default)]
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LighthouseResult {
    final_url: Option<String>,
    fetch_time: Option<String>,
    #[serde(default)]
    categories: HashMap<String, LighthouseCategory>,
    #[serde(default)]
    audits: HashMap<String, LighthouseAudit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LighthouseCategory {
    score: Option<f64>,
    #[serde(default)]
    audit_refs: Vec<LighthouseAuditRef>,
}

#[derive(Debug, Deserialize)]
struct LighthouseAuditRef {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LighthouseAudit {
    title: Option<String>,
    description: Option<String>,
    score: Option<f64>,
}

/// Client for the PageSpeed Insights `runPagespeed` endpoint.
pub struct PageAnalysisFetcher {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
}

impl PageAnalysisFetcher {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.pagespeed_api_url.clone(),
            config.pagespeed_insights_api_key.clone(),
        )
    }

    /// Runs all four categories concurrently. Never fails as a whole: a
    /// category that could not be fetched holds an error marker.
    pub async fn fetch(&self, url: &str) -> PageAnalysis {
        let outcomes = join_all(
            AnalysisCategory::ALL
                .into_iter()
                .map(|category| async move { (category, self.fetch_category(url, category).await) }),
        )
        .await;

        PageAnalysis {
            url: url.to_string(),
            categories: outcomes.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }

    pub async fn fetch_category(
        &self,
        url: &str,
        category: AnalysisCategory,
    ) -> FetchOutcome<CategoryResult> {
        log::debug!("Requesting {} audit for {}", category, url);

        match self.request_category(url, category).await {
            Ok(raw) => FetchOutcome::Ready(extract_category(raw, category)),
            Err(e) => {
                // the request URL carries the API key
                let e = e.without_url();
                log::warn!("Failed to fetch {} data for {}: {}", category, url, e);
                FetchOutcome::failed(format!("Failed to fetch {} data: {}", category, e))
            }
        }
    }

    async fn request_category(
        &self,
        url: &str,
        category: AnalysisCategory,
    ) -> Result<RunPagespeedResponse, reqwest::Error> {
        self.client
            .get(&self.api_url)
            .query(&[
                ("key", self.api_key.expose_secret()),
                ("strategy", STRATEGY),
                ("url", url),
                ("category", category.api_name()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<RunPagespeedResponse>()
            .await
    }
}

/// Keeps the category score and the audits it references, in `auditRefs`
/// order. References missing from the audit map are skipped.
fn extract_category(raw: RunPagespeedResponse, category: AnalysisCategory) -> CategoryResult {
    let lighthouse = raw.lighthouse_result.unwrap_or_default();
    let (score, audit_refs) = match lighthouse.categories.get(category.result_key()) {
        Some(found) => (found.score, found.audit_refs.as_slice()),
        None => (None, &[][..]),
    };

    let audits = audit_refs
        .iter()
        .filter_map(|audit_ref| {
            let id = audit_ref.id.as_deref()?;
            let audit = lighthouse.audits.get(id)?;
            Some(AuditFinding {
                id: id.to_string(),
                title: audit.title.clone(),
                description: audit.description.clone(),
                score: audit.score,
            })
        })
        .collect();

    CategoryResult {
        requested_url: raw.id,
        final_url: lighthouse.final_url.clone(),
        fetch_time: lighthouse.fetch_time.clone(),
        score,
        audits,
    }
}
