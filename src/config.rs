//! TOML configuration.
//!
//! Every section has defaults, so a missing config file (or a missing
//! section) yields a working setup that reads
//! `Module_4_Excel_Data_Analysis_with_AI.pdf` from the working directory
//! and calls Gemini with the key in `API_KEY`.
//!
//! Environment overrides, applied after the file is parsed:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `MODULE_PDF_PATH` | `document.path` |
//! | `LAB_BIND` | `server.bind` |

use anyhow::{bail, Context, Result};
use excel_lab_core::retrieve::{
    RetrievalParams, DEFAULT_BONUS, DEFAULT_BONUS_TOKEN, DEFAULT_MAX_CHARS, DEFAULT_MAX_PAGES,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    #[serde(default = "default_document_path")]
    pub path: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
        }
    }
}

fn default_document_path() -> PathBuf {
    PathBuf::from("Module_4_Excel_Data_Analysis_with_AI.pdf")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_bonus_token")]
    pub bonus_token: String,
    #[serde(default = "default_bonus")]
    pub bonus: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_chars: DEFAULT_MAX_CHARS,
            bonus_token: DEFAULT_BONUS_TOKEN.to_string(),
            bonus: DEFAULT_BONUS,
        }
    }
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}
fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
fn default_bonus_token() -> String {
    DEFAULT_BONUS_TOKEN.to_string()
}
fn default_bonus() -> usize {
    DEFAULT_BONUS
}

impl RetrievalConfig {
    pub fn params(&self) -> RetrievalParams {
        RetrievalParams {
            max_pages: self.max_pages,
            max_chars: self.max_chars,
            bonus_token: self.bonus_token.to_lowercase(),
            bonus: self.bonus,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// `"gemini"` or `"disabled"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_api_key_env() -> String {
    "API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}

impl LlmConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }

    /// Reads the API key from the configured environment variable.
    /// Empty values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

/// Loads, overrides from the environment, and validates the configuration.
///
/// A missing file is not an error: defaults are used.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config(&content)?
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

/// Applies environment overrides through `lookup` (injected for tests).
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("MODULE_PDF_PATH").filter(|v| !v.is_empty()) {
        config.document.path = PathBuf::from(path);
    }
    if let Some(bind) = lookup("LAB_BIND").filter(|v| !v.is_empty()) {
        config.server.bind = bind;
    }
}

pub fn validate(config: &Config) -> Result<()> {
    if config.retrieval.max_pages == 0 {
        bail!("retrieval.max_pages must be >= 1");
    }
    if config.retrieval.max_chars == 0 {
        bail!("retrieval.max_chars must be >= 1");
    }
    if config.retrieval.bonus_token.trim().is_empty() {
        bail!("retrieval.bonus_token must not be empty");
    }

    match config.llm.provider.as_str() {
        "gemini" | "disabled" => {}
        other => bail!(
            "Unknown llm provider: '{}'. Must be gemini or disabled.",
            other
        ),
    }
    if config.llm.is_enabled() {
        if config.llm.model.trim().is_empty() {
            bail!("llm.model must be specified when provider is '{}'", config.llm.provider);
        }
        if config.llm.api_key_env.trim().is_empty() {
            bail!("llm.api_key_env must not be empty");
        }
    }

    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }

    Ok(())
}
