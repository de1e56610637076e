use std::collections::HashMap;

use crate::{
    constants::prompts,
    errors::{AppError, AppResult},
    models::domain::{AnalysisCategory, ContentFormat, FetchOutcome, PageAnalysis, PageContent, ReportType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentStep {
    FrontendAnalysis,
    ImageAnalysis,
    UiUxAnalysis,
    SeoAnalysis,
    FrontendReport,
    UiUxReport,
    SeoReport,
}

/// One piece of fetched data handed to an analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSection {
    Content(ContentFormat),
    Audit(AnalysisCategory),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepPrompt {
    pub system: &'static str,
    pub user: String,
    /// Attached as an image part when the step runs on the vision model.
    pub image_url: Option<String>,
}

impl AgentStep {
    pub const ANALYSIS_STEPS: [AgentStep; 4] = [
        AgentStep::FrontendAnalysis,
        AgentStep::ImageAnalysis,
        AgentStep::UiUxAnalysis,
        AgentStep::SeoAnalysis,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AgentStep::FrontendAnalysis => "frontend_analysis",
            AgentStep::ImageAnalysis => "image_analysis",
            AgentStep::UiUxAnalysis => "ui_ux_analysis",
            AgentStep::SeoAnalysis => "seo_analysis",
            AgentStep::FrontendReport => "frontend_report",
            AgentStep::UiUxReport => "ui_ux_report",
            AgentStep::SeoReport => "seo_report",
        }
    }

    pub fn for_report(report_type: ReportType) -> Self {
        match report_type {
            ReportType::Frontend => AgentStep::FrontendReport,
            ReportType::UiUx => AgentStep::UiUxReport,
            ReportType::Seo => AgentStep::SeoReport,
        }
    }

    pub fn uses_vision(&self) -> bool {
        matches!(self, AgentStep::ImageAnalysis)
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AgentStep::FrontendAnalysis => prompts::FRONTEND_SPECIALIST_PROMPT,
            AgentStep::ImageAnalysis => prompts::IMAGE_ANALYSIS_PROMPT,
            AgentStep::UiUxAnalysis => prompts::UI_UX_SPECIALIST_PROMPT,
            AgentStep::SeoAnalysis => prompts::SEO_SPECIALIST_PROMPT,
            AgentStep::FrontendReport => prompts::FRONTEND_REPORT_PROMPT,
            AgentStep::UiUxReport => prompts::UI_UX_REPORT_PROMPT,
            AgentStep::SeoReport => prompts::SEO_REPORT_PROMPT,
        }
    }

    /// Upstream data an analysis step reads. Empty for report steps.
    pub fn data_sections(&self) -> &'static [DataSection] {
        use AnalysisCategory::*;
        use DataSection::{Audit, Content};
        match self {
            AgentStep::FrontendAnalysis => &[
                Content(ContentFormat::Html),
                Audit(Accessibility),
                Audit(BestPractices),
                Audit(Performance),
            ],
            AgentStep::ImageAnalysis => &[Content(ContentFormat::Screenshot)],
            AgentStep::UiUxAnalysis => &[
                Content(ContentFormat::Text),
                Audit(Accessibility),
                Audit(Performance),
            ],
            AgentStep::SeoAnalysis => &[Content(ContentFormat::Text), Audit(Seo), Audit(Performance)],
            _ => &[],
        }
    }

    /// Analysis steps whose output a report step summarises. Empty for analysis steps.
    pub fn context_steps(&self) -> &'static [AgentStep] {
        match self {
            AgentStep::FrontendReport => &[AgentStep::FrontendAnalysis],
            AgentStep::UiUxReport => &[AgentStep::UiUxAnalysis, AgentStep::ImageAnalysis],
            AgentStep::SeoReport => &[AgentStep::SeoAnalysis, AgentStep::ImageAnalysis],
            _ => &[],
        }
    }

    fn task(&self, url: &str) -> String {
        match self {
            AgentStep::FrontendAnalysis => format!(
                "Perform a technical analysis of the HTML, CSS and JavaScript of {url}. Identify invalid HTML, missing semantic elements, outdated implementations and performance bottlenecks."
            ),
            AgentStep::ImageAnalysis => format!(
                "Analyse the visual design of {url} from its screenshot. Identify design inconsistencies and accessibility issues."
            ),
            AgentStep::UiUxAnalysis => format!(
                "Evaluate the design, usability, accessibility and responsiveness of {url}."
            ),
            AgentStep::SeoAnalysis => format!(
                "Perform a technical SEO audit of {url}, covering Core Web Vitals, structured data, indexing and metadata."
            ),
            AgentStep::FrontendReport => {
                format!("Write the front-end report for {url} from the analysis below.")
            }
            AgentStep::UiUxReport => format!("Write the UI/UX report for {url} from the analyses below."),
            AgentStep::SeoReport => format!("Write the SEO report for {url} from the analyses below."),
        }
    }
}

impl std::fmt::Display for AgentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn section_title(section: DataSection) -> String {
    match section {
        DataSection::Content(ContentFormat::Html) => "Cleaned HTML".to_string(),
        DataSection::Content(ContentFormat::Text) => "Page text".to_string(),
        DataSection::Content(ContentFormat::Screenshot) => "Screenshot".to_string(),
        DataSection::Audit(category) => format!("PageSpeed Insights {} audit", category),
    }
}

fn render_content(outcome: &FetchOutcome<String>) -> AppResult<String> {
    match outcome {
        FetchOutcome::Ready(body) => Ok(body.clone()),
        failed => Ok(serde_json::to_string(failed)?),
    }
}

/// First image-looking URL in the reader's screenshot payload.
pub fn screenshot_image_url(payload: &str) -> Option<&str> {
    payload
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == '"')
        .find(|token| {
            let lowered = token.to_ascii_lowercase();
            lowered.starts_with("http")
                && [".png", ".jpg", ".jpeg", ".webp"]
                    .iter()
                    .any(|ext| lowered.ends_with(ext))
        })
}

pub struct StepHandler;

impl StepHandler {
    pub fn analysis_prompt(
        step: AgentStep,
        url: &str,
        content: &PageContent,
        analysis: &PageAnalysis,
    ) -> AppResult<StepPrompt> {
        if step.data_sections().is_empty() {
            return Err(AppError::InternalError(format!(
                "{} is not an analysis step",
                step
            )));
        }

        let mut user = step.task(url);
        for section in step.data_sections() {
            let body = match section {
                DataSection::Content(format) => render_content(content.get(*format))?,
                DataSection::Audit(category) => {
                    serde_json::to_string_pretty(&analysis.get_category(*category))?
                }
            };
            user.push_str(&format!("\n\n### {}\n{}", section_title(*section), body));
        }

        let image_url = if step.uses_vision() {
            content
                .screenshot
                .ready()
                .and_then(|payload| screenshot_image_url(payload))
                .map(str::to_string)
        } else {
            None
        };

        Ok(StepPrompt {
            system: step.system_prompt(),
            user,
            image_url,
        })
    }

    pub fn report_prompt(
        step: AgentStep,
        url: &str,
        outputs: &HashMap<AgentStep, String>,
    ) -> AppResult<StepPrompt> {
        if step.context_steps().is_empty() {
            return Err(AppError::InternalError(format!("{} is not a report step", step)));
        }

        let mut user = step.task(url);
        for context in step.context_steps() {
            let output = outputs.get(context).ok_or_else(|| {
                AppError::Orchestration(format!("{} output missing for {}", context, step))
            })?;
            user.push_str(&format!("\n\n### {} output\n{}", context, output));
        }

        Ok(StepPrompt {
            system: step.system_prompt(),
            user,
            image_url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn test_report_steps_depend_on_image_analysis() {
        assert!(AgentStep::UiUxReport
            .context_steps()
            .contains(&AgentStep::ImageAnalysis));
        assert!(AgentStep::SeoReport
            .context_steps()
            .contains(&AgentStep::ImageAnalysis));
        assert_eq!(
            AgentStep::FrontendReport.context_steps(),
            &[AgentStep::FrontendAnalysis]
        );
    }

    #[test]
    fn test_frontend_prompt_includes_html_and_audits() {
        let site = fixtures::site_data("https://example.com/");

        let prompt = StepHandler::analysis_prompt(
            AgentStep::FrontendAnalysis,
            &site.url,
            &site.content,
            &site.analysis,
        )
        .unwrap();

        assert!(prompt.user.contains("https://example.com/"));
        assert!(prompt.user.contains("### Cleaned HTML\n<div><p>Hi</p></div>"));
        assert!(prompt.user.contains("PageSpeed Insights BEST_PRACTICES audit"));
        assert!(!prompt.user.contains("PageSpeed Insights SEO audit"));
        assert!(prompt.image_url.is_none());
    }

    #[test]
    fn test_failed_slot_is_rendered_as_error_object() {
        let mut site = fixtures::site_data("https://example.com/");
        site.content.text = FetchOutcome::failed("Failed to fetch text data: 503");

        let prompt = StepHandler::analysis_prompt(
            AgentStep::SeoAnalysis,
            &site.url,
            &site.content,
            &site.analysis,
        )
        .unwrap();

        assert!(prompt
            .user
            .contains(r#"{"error":"Failed to fetch text data: 503"}"#));
    }

    #[test]
    fn test_image_step_attaches_screenshot_url() {
        let site = fixtures::site_data("https://example.com/");

        let prompt = StepHandler::analysis_prompt(
            AgentStep::ImageAnalysis,
            &site.url,
            &site.content,
            &site.analysis,
        )
        .unwrap();

        assert_eq!(
            prompt.image_url.as_deref(),
            Some("https://cdn.example/shot.png")
        );
    }

    #[test]
    fn test_screenshot_url_extraction() {
        let payload = "Title: Example\nURL Source: https://example.com/\nScreenshot: ![shot](https://cdn.example/a.PNG)";
        assert_eq!(
            screenshot_image_url(payload),
            Some("https://cdn.example/a.PNG")
        );
        assert_eq!(screenshot_image_url("no image here"), None);
    }

    #[test]
    fn test_report_prompt_requires_context() {
        let mut outputs = HashMap::new();
        outputs.insert(AgentStep::UiUxAnalysis, "ui findings".to_string());

        let missing = StepHandler::report_prompt(AgentStep::UiUxReport, "https://example.com/", &outputs);
        assert!(matches!(missing, Err(AppError::Orchestration(_))));

        outputs.insert(AgentStep::ImageAnalysis, "visual findings".to_string());
        let prompt =
            StepHandler::report_prompt(AgentStep::UiUxReport, "https://example.com/", &outputs).unwrap();
        assert!(prompt.user.contains("ui findings"));
        assert!(prompt.user.contains("visual findings"));
        assert_eq!(prompt.system, prompts::UI_UX_REPORT_PROMPT);
    }

    #[test]
    fn test_analysis_prompt_rejects_report_step() {
        let site = fixtures::site_data("https://example.com/");
        let result = StepHandler::analysis_prompt(
            AgentStep::SeoReport,
            &site.url,
            &site.content,
            &site.analysis,
        );
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }
}
