use serde::Serialize;

use super::{PageAnalysis, PageContent};

/// Everything fetched for one URL; immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteData {
    pub url: String,
    pub analysis: PageAnalysis,
    pub content: PageContent,
}
