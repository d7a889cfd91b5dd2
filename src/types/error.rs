//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Propagation Policy
//!
//! - **Catalog / selection failures** abort a run before any generation starts
//! - **Render failures** abort a run and carry the underlying cause
//! - **Text-generation failures** never surface here as run failures: the
//!   generator logs them and substitutes placeholder content
//!
//! Provider errors carry an [`ErrorCategory`] for logging. Nothing in the
//! pipeline retries on the basis of a category.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Classification of text-generation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Authentication failed (missing, invalid or revoked credential)
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider unavailable or server-side failure
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Response could not be interpreted
    ParseError,
    /// Content withheld by the provider (safety filter, empty candidate list)
    Blocked,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Blocked => write!(f, "BLOCKED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Text-generation error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport-level failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 404 | 422 => ErrorCategory::BadRequest,
            500..=599 => ErrorCategory::Unavailable,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a reqwest transport error
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::ParseError
        } else if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &err.to_string(), provider);
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, err.to_string(), provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ScribeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Discovery Errors
    // -------------------------------------------------------------------------
    /// Catalog listing failed or came back empty
    #[error("API catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// Selected service is absent from a freshly fetched catalog
    #[error("API {name} not found")]
    ServiceNotFound { name: String },

    /// Discovery service answered with a non-success status
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Fetching a service description failed
    #[error("Failed to fetch description for {name} {version}: {reason}")]
    DiscoveryFetch {
        name: String,
        version: String,
        reason: String,
    },

    /// Resource tree is too deep or structurally invalid
    #[error("Malformed resource tree at '{path}': {reason}")]
    MalformedTree { path: String, reason: String },

    // -------------------------------------------------------------------------
    // Generation Errors
    // -------------------------------------------------------------------------
    /// Structured text-generation error
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Document assembly, serialization or write failed
    #[error("Failed to render {document}: {reason}")]
    RenderFailure { document: String, reason: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Invalid service name '{0}'")]
    InvalidServiceName(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<LlmError> for ScribeError {
    fn from(err: LlmError) -> Self {
        ScribeError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl ScribeError {
    pub fn catalog_unavailable(reason: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            reason: reason.into(),
        }
    }

    pub fn malformed_tree(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn render_failure(document: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::RenderFailure {
            document: document.into(),
            reason: reason.to_string(),
        }
    }

    /// Message shown to the person who submitted the form
    pub fn user_message(&self) -> String {
        match self {
            Self::CatalogUnavailable { .. } => "Failed to fetch API list".to_string(),
            other => format!("Error: {}", other),
        }
    }

}

/// Context extension trait for turning foreign errors into render failures
pub trait ResultExt<T> {
    fn render_context(self, document: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn render_context(self, document: &str) -> Result<T> {
        self.map_err(|e| ScribeError::render_failure(document, e))
    }
}

// =============================================================================
// Tests
// =============================================================================
