//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/apiscribe/) and project (.apiscribe/) level configuration.
//!
//! Credentials are deliberately absent: they arrive with each request (web form,
//! CLI flag or environment) and never touch configuration files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{discovery, generation, network, output};
use crate::types::{Result, ScribeError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Directory service settings
    pub discovery: DiscoveryConfig,

    /// Text-generation provider settings
    pub llm: LlmConfig,

    /// Document generation settings
    pub generation: GenerationConfig,

    /// Output file settings
    pub output: OutputConfig,

    /// Web front end settings
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            discovery: DiscoveryConfig::default(),
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
            output: OutputConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ScribeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ScribeError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ScribeError::Config(format!(
                "LLM top_p must be between 0.0 and 1.0, got {}",
                self.llm.top_p
            )));
        }

        if self.llm.timeout_secs == 0 || self.discovery.timeout_secs == 0 {
            return Err(ScribeError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(ScribeError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.generation.max_resource_depth == 0 {
            return Err(ScribeError::Config(
                "generation.max_resource_depth must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.discovery.base_url).map_err(|e| {
            ScribeError::Config(format!(
                "Invalid discovery base_url '{}': {}",
                self.discovery.base_url, e
            ))
        })?;

        if self.llm.provider.parse::<ProviderKind>().is_err() {
            return Err(ScribeError::Config(format!(
                "Unknown provider: {}. Supported: gemini, openai",
                self.llm.provider
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Discovery Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Base URL of the discovery service
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            base_url: discovery::DEFAULT_BASE_URL.to_string(),
            timeout_secs: network::DISCOVERY_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Supported text-generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(format!(
                "Unknown provider: {}. Valid values: gemini, openai",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (gemini, openai)
    pub provider: String,

    /// Model name (provider default when absent)
    pub model: Option<String>,

    /// Custom API base URL
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling
    pub top_p: f32,

    /// Top-k sampling (Gemini only)
    pub top_k: u32,

    /// Maximum tokens to generate per call
    pub max_tokens: u32,

    /// Fixed wait before every call, in milliseconds
    pub min_interval_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.3,
            top_p: 0.95,
            top_k: 40,
            max_tokens: 512,
            min_interval_ms: generation::MIN_INTERVAL_MS,
        }
    }
}

impl LlmConfig {
    pub fn provider_kind(&self) -> Result<ProviderKind> {
        self.provider.parse().map_err(ScribeError::Config)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Emit an AI-generated overview section after the header
    pub ai_intro: bool,

    /// Reuse per-method generated content across the PDF and notebook passes
    pub reuse_content: bool,

    /// Maximum resource nesting depth accepted from a description
    pub max_resource_depth: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ai_intro: true,
            reuse_content: false,
            max_resource_depth: discovery::MAX_RESOURCE_DEPTH,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving generated files
    pub dir: PathBuf,

    /// Append a per-run suffix to file names so concurrent runs never collide
    pub unique_names: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(output::DEFAULT_DIR),
            unique_names: false,
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_HOST.to_string(),
            port: network::DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.output.dir, PathBuf::from("generated_docs"));
        assert!(!config.generation.reuse_content);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_interval_in_recommended_range() {
        let interval = LlmConfig::default().min_interval_ms;
        assert!(interval >= generation::RECOMMENDED_MIN_INTERVAL_MS);
        assert!(interval <= generation::RECOMMENDED_MAX_INTERVAL_MS);
    }

    #[test]
    fn test_provider_kind() {
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("claude".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.discovery.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:5000");
    }
}
