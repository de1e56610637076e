use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FetchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisCategory {
    Accessibility,
    BestPractices,
    Performance,
    Seo,
}

impl AnalysisCategory {
    pub const ALL: [AnalysisCategory; 4] = [
        AnalysisCategory::Accessibility,
        AnalysisCategory::BestPractices,
        AnalysisCategory::Performance,
        AnalysisCategory::Seo,
    ];

    /// Value of the `category` query parameter.
    pub fn api_name(&self) -> &'static str {
        match self {
            AnalysisCategory::Accessibility => "ACCESSIBILITY",
            AnalysisCategory::BestPractices => "BEST_PRACTICES",
            AnalysisCategory::Performance => "PERFORMANCE",
            AnalysisCategory::Seo => "SEO",
        }
    }

    /// Key under `lighthouseResult.categories` in the response.
    pub fn result_key(&self) -> &'static str {
        match self {
            AnalysisCategory::Accessibility => "accessibility",
            AnalysisCategory::BestPractices => "best-practices",
            AnalysisCategory::Performance => "performance",
            AnalysisCategory::Seo => "seo",
        }
    }
}

impl std::fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// `None` marks an informational or not-applicable audit.
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub requested_url: Option<String>,
    pub final_url: Option<String>,
    pub fetch_time: Option<String>,
    pub score: Option<f64>,
    /// Ordered as the category's `auditRefs`.
    pub audits: Vec<AuditFinding>,
}

/// All four category results for one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub url: String,
    pub categories: BTreeMap<AnalysisCategory, FetchOutcome<CategoryResult>>,
}

impl PageAnalysis {
    pub fn get_category(&self, category: AnalysisCategory) -> FetchOutcome<&CategoryResult> {
        match self.categories.get(&category) {
            Some(FetchOutcome::Ready(result)) => FetchOutcome::Ready(result),
            Some(FetchOutcome::Failed { error }) => FetchOutcome::failed(error.clone()),
            None => FetchOutcome::failed("Category not found."),
        }
    }

    pub fn failed_categories(&self) -> Vec<AnalysisCategory> {
        self.categories
            .iter()
            .filter(|(_, outcome)| !outcome.is_ready())
            .map(|(category, _)| *category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(score: f64) -> CategoryResult {
        CategoryResult {
            requested_url: Some("https://example.com/".to_string()),
            final_url: Some("https://example.com/".to_string()),
            fetch_time: Some("2024-01-01T00:00:00.000Z".to_string()),
            score: Some(score),
            audits: vec![],
        }
    }

    #[test]
    fn test_category_names() {
        assert_eq!(AnalysisCategory::BestPractices.api_name(), "BEST_PRACTICES");
        assert_eq!(AnalysisCategory::BestPractices.result_key(), "best-practices");
        assert_eq!(AnalysisCategory::Seo.to_string(), "SEO");
        assert_eq!(
            serde_json::to_value(AnalysisCategory::BestPractices).unwrap(),
            serde_json::json!("BEST_PRACTICES")
        );
    }

    #[test]
    fn test_get_category() {
        let mut categories = BTreeMap::new();
        categories.insert(
            AnalysisCategory::Performance,
            FetchOutcome::Ready(sample_result(0.42)),
        );
        categories.insert(
            AnalysisCategory::Seo,
            FetchOutcome::failed("Failed to fetch SEO data: timeout"),
        );
        let analysis = PageAnalysis {
            url: "https://example.com/".to_string(),
            categories,
        };

        let performance = analysis.get_category(AnalysisCategory::Performance);
        assert_eq!(performance.ready().unwrap().score, Some(0.42));

        let seo = analysis.get_category(AnalysisCategory::Seo);
        assert_eq!(seo.error(), Some("Failed to fetch SEO data: timeout"));

        let missing = analysis.get_category(AnalysisCategory::Accessibility);
        assert_eq!(missing.error(), Some("Category not found."));

        assert_eq!(analysis.failed_categories(), vec![AnalysisCategory::Seo]);
    }
}
