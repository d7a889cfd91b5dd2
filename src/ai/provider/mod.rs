//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for single-turn text generation.
//! Every request carries its own credential: providers hold no key of their own.
//!
//! ## Modules
//!
//! - `gemini`: Google Generative Language API (`generateContent`)
//! - `openai`: OpenAI-compatible Chat Completions API

mod gemini;
mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{LlmConfig, ProviderKind};
use crate::types::Result;

// =============================================================================
// Request / Response
// =============================================================================

/// A single-turn prompt plus the credential that pays for it
#[derive(Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub credential: SecretString,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, credential: &str) -> Self {
        Self {
            prompt: prompt.into(),
            credential: SecretString::from(credential.to_string()),
        }
    }
}

/// Generated text with usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw generated text, before normalization
    pub text: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with text only (usage unknown)
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Wall clock time of the HTTP exchange in milliseconds
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Connection and sampling settings shared by all providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    /// Model name (provider default when absent)
    pub model: Option<String>,
    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::try_from(&LlmConfig::default()).unwrap_or_else(|_| Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_base: None,
            timeout_secs: 120,
            temperature: 0.3,
            top_p: 0.95,
            top_k: 40,
            max_tokens: 512,
        })
    }
}

impl TryFrom<&LlmConfig> for ProviderConfig {
    type Error = crate::types::ScribeError;

    fn try_from(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            provider: config.provider_kind()?,
            model: config.model.clone(),
            api_base: config.api_base.clone(),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_tokens: config.max_tokens,
        })
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for single-turn text generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for one prompt
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider {
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
    }
}

/// Normalize a configured base URL: http(s) only, no trailing slash
pub(crate) fn normalize_api_base(api_base: &str) -> Result<String> {
    let url = url::Url::parse(api_base).map_err(|e| {
        crate::types::ScribeError::Config(format!("Invalid API base URL '{}': {}", api_base, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(crate::types::ScribeError::Config(format!(
            "API base must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    let mut result = url.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}
