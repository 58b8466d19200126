use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const BIND_ENV: &str = "SUMMARIZER_BIND";
pub const LANGUAGES_ENV: &str = "SUMMARIZER_LANGUAGES";
pub const MODELS_ENV: &str = "SUMMARIZER_MODELS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Summarization service settings
    pub gemini: GeminiConfig,

    /// Captioning service settings
    pub transcript: TranscriptConfig,

    /// Web UI settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; usually supplied through the environment
    pub api_key: Option<String>,

    /// Models to try, in order, until one produces a summary
    pub models: Vec<String>,

    /// Base URL of the generative-language API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Preferred caption languages, most preferred first
    pub languages: Vec<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web UI listens on
    pub bind: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: vec![
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-pro".to_string(),
                "gemini-pro".to_string(),
            ],
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            timeout_secs: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file, `.env` and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_file(&Self::config_path()?, |key| std::env::var(key).ok())
    }

    /// Read the YAML file at `path` if it exists, then apply the environment lookup
    pub fn from_file<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = if path.exists() {
            tracing::debug!("Reading config file: {}", path.display());
            Some(fs_err::read_to_string(path).context("Failed to read config file")?)
        } else {
            None
        };

        Self::from_sources(content.as_deref(), env)
    }

    /// Build configuration from optional YAML content and an environment lookup.
    ///
    /// Environment values win over the file; blank values are ignored.
    pub fn from_sources<F>(file: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = match file {
            Some(content) if !content.trim().is_empty() => {
                serde_yaml::from_str(content).context("Failed to parse config file")?
            }
            _ => Config::default(),
        };

        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = env(API_KEY_ENV) {
            config.gemini.api_key = Some(key);
        }
        if let Some(bind) = env(BIND_ENV) {
            config.server.bind = bind;
        }
        if let Some(languages) = env(LANGUAGES_ENV) {
            config.transcript.languages = split_list(&languages);
        }
        if let Some(models) = env(MODELS_ENV) {
            config.gemini.models = split_list(&models);
        }

        if config.gemini.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            config.gemini.api_key = None;
        }

        if config.gemini.api_key.is_none() {
            tracing::warn!("{} is not set; summary requests will fail", API_KEY_ENV);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("video-summarizer").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.gemini.models.is_empty() {
            anyhow::bail!("At least one summarization model must be configured");
        }
        if self.transcript.languages.is_empty() {
            anyhow::bail!("At least one transcript language must be configured");
        }
        if self.gemini.timeout_secs == 0 || self.transcript.timeout_secs == 0 {
            anyhow::bail!("Request timeouts must be greater than zero");
        }

        url::Url::parse(&self.gemini.base_url).context("Invalid summarization base URL")?;

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  API Key: {}", self.masked_api_key());
        println!("  Models: {}", self.gemini.models.join(", "));
        println!("  Summarizer Timeout: {}s", self.gemini.timeout_secs);
        println!("  Transcript Languages: {}", self.transcript.languages.join(", "));
        println!("  Transcript Timeout: {}s", self.transcript.timeout_secs);
        println!("  Bind Address: {}", self.server.bind);
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        match self.gemini.api_key.as_deref() {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 4 {
                    "****".to_string()
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("****{}", tail)
                }
            }
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
