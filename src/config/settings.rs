//! Configuration settings for pdfquiz.

use crate::error::{PdfQuizError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory uploaded PDFs are written to.
    pub upload_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            upload_dir: "uploaded_pdfs".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Chat model endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model name sent with every chat completion request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum model round-trips per agent run.
    pub max_iterations: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai/".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            request_timeout_secs: 300,
            max_iterations: 10,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Maximum accepted upload size in megabytes.
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_mb: 200,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// TOML file with prompt overrides (`system`, `summary`, `quiz`).
    pub custom_file: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

/// Fully resolved model endpoint, ready to build a client from.
///
/// Construction fails when the API key is absent, so authentication
/// problems surface at startup instead of on the first request.
#[derive(Clone)]
pub struct ModelConfig {
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub max_iterations: usize,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

impl ModelConfig {
    /// Resolve the model endpoint from settings and the process environment.
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        Self::resolve(settings, |name| std::env::var(name).ok())
    }

    /// Resolve the model endpoint using `lookup` to read environment variables.
    pub fn resolve<F>(settings: &ModelSettings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup(&settings.api_key_env) {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            Some(_) => {
                return Err(PdfQuizError::Config(format!(
                    "{} is empty. Set it with: export {}='...'",
                    settings.api_key_env, settings.api_key_env
                )))
            }
            None => {
                return Err(PdfQuizError::Config(format!(
                    "{} not set. Set it with: export {}='...'",
                    settings.api_key_env, settings.api_key_env
                )))
            }
        };

        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            PdfQuizError::Config(format!("Invalid model base_url '{}': {}", settings.base_url, e))
        })?;

        if settings.model.trim().is_empty() {
            return Err(PdfQuizError::Config("model.model must not be empty".to_string()));
        }

        Ok(Self {
            base_url,
            api_key,
            model: settings.model.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs),
            max_iterations: settings.max_iterations.max(1),
        })
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PdfQuizError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdfquiz")
            .join("config.toml")
    }

    /// Config file in use: `custom` (from `--config`) or the default location.
    pub fn config_path(custom: Option<&str>) -> PathBuf {
        match custom {
            Some(path) => Self::expand_path(path),
            None => Self::default_config_path(),
        }
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded upload directory path.
    pub fn upload_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.upload_dir)
    }

    /// Resolve the model endpoint for this configuration.
    pub fn model_config(&self) -> Result<ModelConfig> {
        ModelConfig::from_settings(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_key(name: &str) -> Option<String> {
        (name == "GEMINI_API_KEY").then(|| "test-key".to_string())
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.upload_dir, "uploaded_pdfs");
        assert_eq!(settings.model.model, "gemini-2.0-flash");
        assert_eq!(settings.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(settings.model.max_iterations, 10);
        assert_eq!(settings.server.max_upload_mb, 200);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [model]
            model = "gpt-4o-mini"
            base_url = "https://api.openai.com/v1"
            api_key_env = "OPENAI_API_KEY"
            "#,
        )
        .unwrap();
        assert_eq!(settings.model.model, "gpt-4o-mini");
        assert_eq!(settings.model.request_timeout_secs, 300);
        assert_eq!(settings.server.port, 8501);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.server.port = 9000;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.model.base_url, settings.model.base_url);
    }

    #[test]
    fn test_config_path_prefers_custom() {
        assert_eq!(Settings::config_path(None), Settings::default_config_path());
        assert_eq!(
            Settings::config_path(Some("/tmp/pdfquiz/alt.toml")),
            PathBuf::from("/tmp/pdfquiz/alt.toml")
        );
        assert!(!Settings::config_path(Some("~/alt.toml")).starts_with("~"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.general.upload_dir, "uploaded_pdfs");
    }

    #[test]
    fn test_model_config_requires_key() {
        let err = ModelConfig::resolve(&ModelSettings::default(), |_| None).unwrap_err();
        assert!(matches!(err, PdfQuizError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY not set"));

        let err = ModelConfig::resolve(&ModelSettings::default(), |_| Some("  ".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_model_config_resolves() {
        let config = ModelConfig::resolve(&ModelSettings::default(), env_with_key).unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url.host_str(), Some("generativelanguage.googleapis.com"));
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(!format!("{:?}", config).contains("test-key"));
    }

    #[test]
    fn test_model_config_rejects_bad_url() {
        let settings = ModelSettings {
            base_url: "not a url".to_string(),
            ..ModelSettings::default()
        };
        let err = ModelConfig::resolve(&settings, env_with_key).unwrap_err();
        assert!(err.to_string().contains("Invalid model base_url"));
    }
}
