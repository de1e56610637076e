use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Frontend,
    UiUx,
    Seo,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [ReportType::Frontend, ReportType::UiUx, ReportType::Seo];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Frontend => "frontend",
            ReportType::UiUx => "ui_ux",
            ReportType::Seo => "seo",
        }
    }

    pub fn markdown_file_name(&self) -> String {
        format!("{}_report.md", self.as_str())
    }

    pub fn pdf_file_name(&self) -> String {
        format!("{}_report.pdf", self.as_str())
    }

    pub fn markdown_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.markdown_file_name())
    }

    pub fn pdf_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.pdf_file_name())
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Frontend => "Front-End Report",
            ReportType::UiUx => "UI/UX Report",
            ReportType::Seo => "SEO Report",
        }
    }

    pub fn download_url(&self) -> String {
        format!("/generator/download-report?type={}", self.as_str())
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frontend" => Ok(ReportType::Frontend),
            "ui_ux" => Ok(ReportType::UiUx),
            "seo" => Ok(ReportType::Seo),
            other => Err(AppError::ValidationError(format!(
                "Invalid report type: {}",
                other
            ))),
        }
    }
}

/// Markdown bodies produced by the orchestration step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSet {
    pub frontend: String,
    pub ui_ux: String,
    pub seo: String,
}

impl ReportSet {
    pub fn get(&self, report_type: ReportType) -> &str {
        match report_type {
            ReportType::Frontend => &self.frontend,
            ReportType::UiUx => &self.ui_ux,
            ReportType::Seo => &self.seo,
        }
    }

    pub fn empty_reports(&self) -> Vec<ReportType> {
        ReportType::ALL
            .into_iter()
            .filter(|report_type| self.get(*report_type).trim().is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub frontend: PathBuf,
    pub ui_ux: PathBuf,
    pub seo: PathBuf,
}

impl ReportPaths {
    pub fn get(&self, report_type: ReportType) -> &Path {
        match report_type {
            ReportType::Frontend => &self.frontend,
            ReportType::UiUx => &self.ui_ux,
            ReportType::Seo => &self.seo,
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.frontend, &self.ui_ux, &self.seo]
    }
}
