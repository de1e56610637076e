use std::collections::HashMap;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use futures::future::try_join_all;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{PageAnalysis, PageContent, ReportSet, ReportType},
    services::agent_steps::{AgentStep, StepHandler, StepPrompt},
};

/// Turns fetched page data into the three Markdown reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportOrchestrator: Send + Sync {
    async fn produce_reports(
        &self,
        url: &str,
        content: &PageContent,
        analysis: &PageAnalysis,
    ) -> AppResult<ReportSet>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Runs the four analysis agents concurrently, then the three report
/// agents on their outputs, against an OpenAI-compatible chat API.
pub struct OpenAiReportOrchestrator {
    client: Client<OpenAIConfig>,
    model: String,
    vision_model: String,
    temperature: f32,
}

impl OpenAiReportOrchestrator {
    pub fn new(client: Client<OpenAIConfig>, model: String, vision_model: String, temperature: f32) -> Self {
        Self {
            client,
            model,
            vision_model,
            temperature,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());
        if let Some(api_base) = &config.openai_api_base {
            openai_config = openai_config.with_api_base(api_base);
        }
        Self::new(
            Client::with_config(openai_config),
            config.llm_model.clone(),
            config.vision_model.clone(),
            config.llm_temperature,
        )
    }

    fn request_body(&self, step: AgentStep, prompt: &StepPrompt) -> Value {
        let model = if step.uses_vision() {
            &self.vision_model
        } else {
            &self.model
        };

        let user_content = match &prompt.image_url {
            Some(image_url) => json!([
                { "type": "text", "text": prompt.user },
                { "type": "image_url", "image_url": { "url": image_url } },
            ]),
            None => json!(prompt.user),
        };

        json!({
            "model": model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": user_content },
            ],
        })
    }

    async fn run_step(&self, step: AgentStep, prompt: StepPrompt) -> AppResult<String> {
        log::info!("Running agent step {}", step);

        let completion: ChatCompletion = self
            .client
            .chat()
            .create_byot(self.request_body(step, &prompt))
            .await
            .map_err(|e| AppError::Orchestration(format!("{} failed: {}", step, e)))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Orchestration(format!("{} returned no content", step)));
        }

        log::debug!("Agent step {} produced {} characters", step, text.len());
        Ok(text)
    }

    async fn run_report(
        &self,
        report_type: ReportType,
        url: &str,
        outputs: &HashMap<AgentStep, String>,
    ) -> AppResult<String> {
        let step = AgentStep::for_report(report_type);
        let prompt = StepHandler::report_prompt(step, url, outputs)?;
        self.run_step(step, prompt).await
    }
}

#[async_trait]
impl ReportOrchestrator for OpenAiReportOrchestrator {
    async fn produce_reports(
        &self,
        url: &str,
        content: &PageContent,
        analysis: &PageAnalysis,
    ) -> AppResult<ReportSet> {
        let mut prompts = Vec::with_capacity(AgentStep::ANALYSIS_STEPS.len());
        for step in AgentStep::ANALYSIS_STEPS {
            prompts.push((step, StepHandler::analysis_prompt(step, url, content, analysis)?));
        }

        let analyses = try_join_all(
            prompts
                .into_iter()
                .map(|(step, prompt)| async move { Ok::<_, AppError>((step, self.run_step(step, prompt).await?)) }),
        )
        .await?;
        let outputs: HashMap<AgentStep, String> = analyses.into_iter().collect();

        let (frontend, ui_ux, seo) = tokio::try_join!(
            self.run_report(ReportType::Frontend, url, &outputs),
            self.run_report(ReportType::UiUx, url, &outputs),
            self.run_report(ReportType::Seo, url, &outputs),
        )?;

        Ok(ReportSet { frontend, ui_ux, seo })
    }
}
