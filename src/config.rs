use std::{env, path::PathBuf, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_PAGESPEED_API_URL: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
pub const DEFAULT_JINA_READER_URL: &str = "https://r.jina.ai/";
pub const DEFAULT_LLM_MODEL: &str = "chatgpt-4o-latest";

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: SecretString,
    /// Base URL of an OpenAI-compatible API; the official endpoint when unset.
    pub openai_api_base: Option<String>,
    pub llm_model: String,
    pub vision_model: String,
    pub llm_temperature: f32,
    pub jina_ai_api_key: SecretString,
    pub pagespeed_insights_api_key: SecretString,
    pub pagespeed_api_url: String,
    pub jina_reader_url: String,
    pub output_dir: PathBuf,
    pub upstream_timeout_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
}

/// Maps the `ENVIRONMENT` selector to the dotenv file that backs it.
pub fn env_file_for(environment: &str) -> AppResult<&'static str> {
    match environment {
        "local" => Ok(".env"),
        "dev" => Ok(".env.dev"),
        "prod" => Ok(".env.prod"),
        other => Err(AppError::Configuration(format!(
            "Invalid environment: {}",
            other
        ))),
    }
}

impl Config {
    /// Loads the dotenv file selected by `ENVIRONMENT` (default `local`),
    /// then reads the process environment.
    pub fn load() -> AppResult<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        let env_file = env_file_for(&environment)?;

        match dotenvy::from_filename(env_file) {
            Ok(path) => log::info!("Loaded settings from {}", path.display()),
            Err(e) if e.not_found() => {
                log::warn!("Settings file {} not found, using process environment", env_file)
            }
            Err(e) => {
                return Err(AppError::Configuration(format!(
                    "Failed to read {}: {}",
                    env_file, e
                )))
            }
        }

        Ok(Self::from_env())
    }

    pub fn from_env() -> Self {
        let llm_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        Self {
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE").ok().filter(|b| !b.trim().is_empty()),
            vision_model: env::var("VISION_MODEL").unwrap_or_else(|_| llm_model.clone()),
            llm_model,
            llm_temperature: env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0.7),
            jina_ai_api_key: SecretString::from(env::var("JINA_AI_API_KEY").unwrap_or_default()),
            pagespeed_insights_api_key: SecretString::from(
                env::var("PAGESPEED_INSIGHTS_API_KEY").unwrap_or_default(),
            ),
            pagespeed_api_url: env::var("PAGESPEED_API_URL")
                .unwrap_or_else(|_| DEFAULT_PAGESPEED_API_URL.to_string()),
            jina_reader_url: env::var("JINA_READER_URL")
                .unwrap_or_else(|_| DEFAULT_JINA_READER_URL.to_string()),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("outputs")),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8002),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Fails with every required key that is still empty.
    pub fn validate(&self) -> AppResult<()> {
        let missing: Vec<&str> = [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("JINA_AI_API_KEY", &self.jina_ai_api_key),
            ("PAGESPEED_INSIGHTS_API_KEY", &self.pagespeed_insights_api_key),
        ]
        .into_iter()
        .filter(|(_, secret)| secret.expose_secret().trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Configuration(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )))
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: SecretString::from("test-openai-key".to_string()),
            openai_api_base: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            vision_model: DEFAULT_LLM_MODEL.to_string(),
            llm_temperature: 0.7,
            jina_ai_api_key: SecretString::from("test-jina-key".to_string()),
            pagespeed_insights_api_key: SecretString::from("test-psi-key".to_string()),
            pagespeed_api_url: DEFAULT_PAGESPEED_API_URL.to_string(),
            jina_reader_url: DEFAULT_JINA_READER_URL.to_string(),
            output_dir: PathBuf::from("outputs"),
            upstream_timeout_secs: 5,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8002,
        }
    }
}
