use secrecy::{ExposeSecret, SecretString};

use crate::{
    config::Config,
    models::domain::{ContentFormat, FetchOutcome, PageContent},
    services::html_cleaner::clean_html,
};

/// Client for the Jina AI reader (`<reader_url><target url>`).
pub struct PageContentFetcher {
    client: reqwest::Client,
    reader_url: String,
    api_key: SecretString,
}

impl PageContentFetcher {
    pub fn new(client: reqwest::Client, reader_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client,
            reader_url: reader_url.into(),
            api_key,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.jina_reader_url.clone(),
            config.jina_ai_api_key.clone(),
        )
    }

    /// Fetches html, text and screenshot concurrently; each slot fails on its own.
    pub async fn fetch(&self, url: &str) -> PageContent {
        let (html, text, screenshot) = tokio::join!(
            self.fetch_format(url, ContentFormat::Html),
            self.fetch_format(url, ContentFormat::Text),
            self.fetch_format(url, ContentFormat::Screenshot),
        );

        PageContent {
            url: url.to_string(),
            html,
            text,
            screenshot,
        }
    }

    pub async fn fetch_format(&self, url: &str, format: ContentFormat) -> FetchOutcome<String> {
        log::debug!("Requesting {} content for {}", format, url);

        match self.request_format(url, format).await {
            Ok(body) if format == ContentFormat::Html => FetchOutcome::Ready(clean_html(&body)),
            Ok(body) => FetchOutcome::Ready(body),
            Err(e) => {
                log::warn!("Failed to fetch {} data for {}: {}", format, url, e);
                FetchOutcome::failed(format!("Failed to fetch {} data: {}", format, e))
            }
        }
    }

    fn endpoint(&self, url: &str) -> String {
        format!("{}{}", self.reader_url, url)
    }

    async fn request_format(&self, url: &str, format: ContentFormat) -> Result<String, reqwest::Error> {
        let mut request = self
            .client
            .get(self.endpoint(url))
            .bearer_auth(self.api_key.expose_secret())
            .header("X-Return-Format", format.return_format());
        if format.strips_images() {
            request = request.header("X-Retain-Images", "none");
        }

        request.send().await?.error_for_status()?.text().await
    }
}
