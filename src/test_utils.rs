#[cfg(test)]
pub mod fixtures {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::{
        models::domain::{
            AnalysisCategory, AuditFinding, CategoryResult, FetchOutcome, PageAnalysis,
            PageContent, ReportSet, SiteData,
        },
        services::site_data_cache::SiteDataFetcher,
    };

    /// Reader HTML as it arrives, before cleaning.
    pub const RAW_PAGE_HTML: &str = r#"<div class="wrapper"><div><script>var a = 1;</script><p style="color:red">Hello <b>world</b></p><span></span></div></div>"#;

    /// [`RAW_PAGE_HTML`] after cleaning.
    pub const CLEAN_PAGE_HTML: &str = "<div><p>Hello <b>world</b></p></div>";

    /// A `runPagespeed` body for one category whose `auditRefs` are `refs`.
    /// The audits map only knows a fixed set of ids.
    pub fn pagespeed_response(category_key: &str, score: f64, refs: &[&str]) -> Value {
        let audit_refs: Vec<Value> = refs
            .iter()
            .map(|id| json!({ "id": id, "weight": 1 }))
            .collect();

        json!({
            "id": "https://example.com/",
            "lighthouseResult": {
                "requestedUrl": "https://example.com/",
                "finalUrl": "https://example.com/",
                "fetchTime": "2024-05-01T12:00:00.000Z",
                "categories": {
                    category_key: {
                        "id": category_key,
                        "score": score,
                        "auditRefs": audit_refs,
                    }
                },
                "audits": {
                    "unused-javascript": {
                        "id": "unused-javascript",
                        "title": "Reduce unused JavaScript",
                        "description": "Reduce unused JavaScript and defer loading scripts.",
                        "score": 0.5,
                    },
                    "document-title": {
                        "id": "document-title",
                        "title": "Document has a `<title>` element",
                        "description": "The title gives screen reader users an overview of the page.",
                        "score": 1,
                    },
                    "meta-description": {
                        "id": "meta-description",
                        "title": "Document has a meta description",
                        "description": "Meta descriptions may be included in search results.",
                        "score": 1,
                    },
                    "structured-data": {
                        "id": "structured-data",
                        "title": "Structured data is valid",
                        "description": "Run the Structured Data Linting Tool to validate structured data.",
                        "score": null,
                    },
                }
            }
        })
    }

    pub fn category_result(url: &str, score: f64) -> CategoryResult {
        CategoryResult {
            requested_url: Some(url.to_string()),
            final_url: Some(url.to_string()),
            fetch_time: Some("2024-05-01T12:00:00.000Z".to_string()),
            score: Some(score),
            audits: vec![AuditFinding {
                id: "document-title".to_string(),
                title: Some("Document has a `<title>` element".to_string()),
                description: None,
                score: Some(1.0),
            }],
        }
    }

    /// Fully fetched site data with every slot ready.
    pub fn site_data(url: &str) -> SiteData {
        let categories: BTreeMap<AnalysisCategory, FetchOutcome<CategoryResult>> =
            AnalysisCategory::ALL
                .iter()
                .map(|category| (*category, FetchOutcome::Ready(category_result(url, 0.9))))
                .collect();

        SiteData {
            url: url.to_string(),
            analysis: PageAnalysis {
                url: url.to_string(),
                categories,
            },
            content: PageContent {
                url: url.to_string(),
                html: FetchOutcome::Ready("<div><p>Hi</p></div>".to_string()),
                text: FetchOutcome::Ready("Hi".to_string()),
                screenshot: FetchOutcome::Ready("https://cdn.example/shot.png".to_string()),
            },
        }
    }

    /// Serves [`site_data`] without touching the network.
    pub struct StaticFetcher;

    #[async_trait]
    impl SiteDataFetcher for StaticFetcher {
        async fn fetch_site_data(&self, url: &str) -> SiteData {
            site_data(url)
        }
    }

    pub fn report_set() -> ReportSet {
        ReportSet {
            frontend: "# Front-End Report\n\n- Defer scripts".to_string(),
            ui_ux: "# UI/UX Report\n\n- Increase contrast".to_string(),
            seo: "# SEO Report\n\n- Add a meta description".to_string(),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::html_cleaner::clean_html;

    #[test]
    fn test_clean_fixture_matches_cleaner() {
        assert_eq!(clean_html(RAW_PAGE_HTML), CLEAN_PAGE_HTML);
    }

    #[test]
    fn test_site_data_is_fully_ready() {
        let site = site_data("https://example.com/");
        assert!(site.analysis.failed_categories().is_empty());
        assert!(site.content.failed_formats().is_empty());
        assert_eq!(site.analysis.categories.len(), 4);
    }

    #[test]
    fn test_report_set_has_no_empty_reports() {
        assert!(report_set().empty_reports().is_empty());
    }
}
