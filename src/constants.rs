//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Directory service constants
pub mod discovery {
    /// Default discovery endpoint
    pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/discovery/v1";

    /// Upper bound on catalog pages followed in one listing
    pub const MAX_CATALOG_PAGES: usize = 100;

    /// Maximum resource nesting accepted by the extractor
    pub const MAX_RESOURCE_DEPTH: usize = 32;
}

/// Text generation constants
pub mod generation {
    /// Fixed wait before every text-generation call (milliseconds)
    pub const MIN_INTERVAL_MS: u64 = 1200;

    /// Recommended lower bound for the wait (milliseconds)
    pub const RECOMMENDED_MIN_INTERVAL_MS: u64 = 1000;

    /// Recommended upper bound for the wait (milliseconds)
    pub const RECOMMENDED_MAX_INTERVAL_MS: u64 = 1500;

    /// Placeholder for a missing AI explanation
    pub const NARRATIVE_PLACEHOLDER: &str = "*AI explanation unavailable*";

    /// Placeholder for a missing AI code example
    pub const EXAMPLE_PLACEHOLDER: &str = "# AI example unavailable";

    /// Placeholder for a missing AI overview
    pub const INTRO_PLACEHOLDER: &str = "*AI overview unavailable*";

    /// First-line acknowledgements stripped from generated text
    pub const FILLER_TOKENS: &[&str] = &["okay", "ok", "sure", "certainly"];
}

/// Output file constants
pub mod output {
    /// Default output directory (relative to the working directory)
    pub const DEFAULT_DIR: &str = "generated_docs";

    /// Suffix for PDF manuals
    pub const PDF_SUFFIX: &str = "_documentation.pdf";

    /// Suffix for notebooks
    pub const NOTEBOOK_SUFFIX: &str = "_colab_notebook.ipynb";

    /// Media type for PDF downloads
    pub const PDF_CONTENT_TYPE: &str = "application/pdf";

    /// Media type for notebook downloads
    pub const NOTEBOOK_CONTENT_TYPE: &str = "application/x-ipynb+json";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout for text generation (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default request timeout for discovery calls (seconds)
    pub const DISCOVERY_TIMEOUT_SECS: u64 = 30;

    /// Default bind host for the web front end
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default bind port for the web front end
    pub const DEFAULT_PORT: u16 = 5000;
}
