//! AI Integration Layer
//!
//! Text generation for API documentation: providers, prompts, output
//! normalization and the rate-limited generator used by the renderers.

pub mod generator;
pub mod metrics;
pub mod normalize;
pub mod prompt;
pub mod provider;

pub use generator::{ContentCache, TextGenerator};
pub use metrics::{GenerationMetrics, GenerationSummary, SharedMetrics, create_shared_metrics};
pub use normalize::{normalize_generated_text, strip_code_fence};
pub use prompt::{PromptBuilder, PromptKind, PromptTemplates};
pub use provider::{
    ErrorCategory, ErrorClassifier, GenerationRequest, LlmError, LlmProvider, LlmResponse,
    ProviderConfig, ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage,
    create_provider,
};
