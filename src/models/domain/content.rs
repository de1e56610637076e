use serde::{Deserialize, Serialize};

use super::FetchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Html,
    Text,
    Screenshot,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 3] = [
        ContentFormat::Html,
        ContentFormat::Text,
        ContentFormat::Screenshot,
    ];

    /// Value of the `X-Return-Format` header.
    pub fn return_format(&self) -> &'static str {
        match self {
            ContentFormat::Html => "html",
            ContentFormat::Text => "text",
            ContentFormat::Screenshot => "screenshot",
        }
    }

    /// Html and Text ask the reader to drop images; Screenshot keeps the default.
    pub fn strips_images(&self) -> bool {
        !matches!(self, ContentFormat::Screenshot)
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.return_format())
    }
}

/// The three reader representations of one URL. `html` is already cleaned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub html: FetchOutcome<String>,
    pub text: FetchOutcome<String>,
    /// Opaque reader payload (screenshot reference), passed through untouched.
    pub screenshot: FetchOutcome<String>,
}

impl PageContent {
    pub fn get(&self, format: ContentFormat) -> &FetchOutcome<String> {
        match format {
            ContentFormat::Html => &self.html,
            ContentFormat::Text => &self.text,
            ContentFormat::Screenshot => &self.screenshot,
        }
    }

    pub fn failed_formats(&self) -> Vec<ContentFormat> {
        ContentFormat::ALL
            .into_iter()
            .filter(|format| !self.get(*format).is_ready())
            .collect()
    }
}
