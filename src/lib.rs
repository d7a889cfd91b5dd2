//! apiscribe - API Documentation Generator
//!
//! Lists the APIs of a public discovery directory, walks the method tree of a
//! selected API, asks a text-generation provider for an explanation and a
//! Python example per method, and renders the result as a PDF reference and a
//! Colab notebook.
//!
//! ## Quick Start
//!
//! ```ignore
//! use apiscribe::{ConfigLoader, DocumentationPipeline, GenerationJob};
//!
//! let config = ConfigLoader::load()?;
//! let pipeline = DocumentationPipeline::from_config(&config)?;
//! let job = GenerationJob::new("drive", &api_key);
//! let generated = pipeline.run(&job).await?;
//! ```
//!
//! ## Modules
//!
//! - [`discovery`]: catalog paging and method tree extraction
//! - [`ai`]: provider abstraction, prompts, response normalization
//! - [`render`]: PDF and notebook builders
//! - [`output`]: file naming and writing
//! - [`pipeline`]: one documentation run end to end
//! - [`server`]: web form and downloads
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader, ProviderKind};

// Error Types
pub use types::error::{Result, ResultExt, ScribeError};
pub use types::{MethodRecord, ServiceDescriptor, ServiceName};

// Pipeline
pub use pipeline::{DocumentSelection, DocumentationPipeline, GeneratedFiles, GenerationJob};

// AI
pub use ai::{LlmProvider, LlmResponse, SharedProvider, TextGenerator};

// Rendering
pub use render::{DocumentKind, RenderedDocument};
