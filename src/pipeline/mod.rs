//! Documentation Pipeline
//!
//! One run, strictly sequential:
//!
//! ```text
//! catalog -> resolve -> description -> extract -> PDF -> notebook
//! ```
//!
//! The service is resolved once, before either renderer starts, so an unknown
//! name fails the whole run up front. Generation failures inside a run only
//! produce placeholders; discovery and write failures abort it.

use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::ai::{
    ContentCache, GenerationSummary, ProviderConfig, SharedProvider, TextGenerator,
    create_provider,
};
use crate::config::{Config, GenerationConfig};
use crate::discovery::{ApiDescription, DirectoryClient};
use crate::output::OutputLayout;
use crate::render::{
    DocumentHeader, DocumentKind, NotebookBuilder, PdfBuilder, RenderPipeline, RenderedDocument,
};
use crate::types::{Result, ServiceDescriptor, ServiceName};

/// Which documents a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentSelection {
    #[default]
    Both,
    PdfOnly,
    NotebookOnly,
}

impl DocumentSelection {
    pub fn kinds(&self) -> &'static [DocumentKind] {
        match self {
            DocumentSelection::Both => &DocumentKind::ALL,
            DocumentSelection::PdfOnly => &[DocumentKind::Pdf],
            DocumentSelection::NotebookOnly => &[DocumentKind::Notebook],
        }
    }
}

/// Parameters of one documentation run
#[derive(Debug)]
pub struct GenerationJob {
    /// Text-generation credential; empty disables generated content
    pub credential: SecretString,
    pub service_name: String,
    /// Version shown in the document header; the catalog version when absent
    pub display_version: Option<String>,
    pub documents: DocumentSelection,
}

impl GenerationJob {
    pub fn new(service_name: impl Into<String>, credential: &str) -> Self {
        Self {
            credential: SecretString::from(credential.to_string()),
            service_name: service_name.into(),
            display_version: None,
            documents: DocumentSelection::Both,
        }
    }

    pub fn with_display_version(mut self, version: Option<String>) -> Self {
        self.display_version = version.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_documents(mut self, documents: DocumentSelection) -> Self {
        self.documents = documents;
        self
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub service: String,
    /// File stem shared by every document of the run (used in download links)
    pub stem: String,
    pub method_count: usize,
    pub files: Vec<(DocumentKind, PathBuf)>,
    pub generation: GenerationSummary,
}

impl GeneratedFiles {
    pub fn path(&self, kind: DocumentKind) -> Option<&Path> {
        self.files
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, p)| p.as_path())
    }
}

#[derive(Clone)]
pub struct DocumentationPipeline {
    directory: DirectoryClient,
    provider: SharedProvider,
    layout: OutputLayout,
    min_interval: Duration,
    generation: GenerationConfig,
}

impl DocumentationPipeline {
    pub fn new(
        directory: DirectoryClient,
        provider: SharedProvider,
        layout: OutputLayout,
        min_interval: Duration,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            directory,
            provider,
            layout,
            min_interval,
            generation,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&ProviderConfig::try_from(&config.llm)?)?;
        info!(
            "Using {} provider (model: {})",
            provider.name(),
            provider.model()
        );

        Ok(Self::new(
            DirectoryClient::from_config(&config.discovery)?,
            provider,
            OutputLayout::from_config(&config.output),
            config.llm.min_interval(),
            config.generation.clone(),
        ))
    }

    pub fn directory(&self) -> &DirectoryClient {
        &self.directory
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Catalog listing for selection UIs
    pub async fn list_services(&self) -> Result<Vec<ServiceDescriptor>> {
        self.directory.list_services().await
    }

    /// Fetch the catalog, then generate
    pub async fn run(&self, job: &GenerationJob) -> Result<GeneratedFiles> {
        let catalog = self.directory.list_services().await.inspect_err(|e| {
            error!("Documentation generation error: {}", e);
        })?;
        self.run_with_catalog(job, &catalog).await
    }

    /// Generate against a catalog the caller fetched for this request
    pub async fn run_with_catalog(
        &self,
        job: &GenerationJob,
        catalog: &[ServiceDescriptor],
    ) -> Result<GeneratedFiles> {
        let result = self.generate(job, catalog).await;
        if let Err(e) = &result {
            error!("Documentation generation error: {}", e);
        }
        result
    }

    async fn generate(
        &self,
        job: &GenerationJob,
        catalog: &[ServiceDescriptor],
    ) -> Result<GeneratedFiles> {
        let service_name = ServiceName::parse(&job.service_name)?;
        info!("Starting documentation run for {}", service_name);

        let service = DirectoryClient::resolve(catalog, service_name.as_str())?;
        let document = self.directory.fetch_description(service).await?;

        let mut description = ApiDescription::from_value_with_depth(
            &document,
            self.generation.max_resource_depth,
        )?;
        fill_from_catalog(&mut description, service);
        info!(
            "{} {}: {} methods",
            description.name,
            description.version,
            description.methods.len()
        );

        let mut generator = TextGenerator::new(self.provider.clone(), self.min_interval);
        if self.generation.reuse_content {
            generator = generator.with_cache(Arc::new(ContentCache::new()));
        }

        let header = DocumentHeader::new(&description, job.display_version.as_deref());
        let renderer = RenderPipeline::new(
            &generator,
            &description,
            header,
            job.credential.expose_secret(),
        )
        .with_ai_intro(self.generation.ai_intro);

        let stem = self.layout.run_stem(&service_name);
        let mut files = Vec::new();

        for kind in job.documents.kinds() {
            let rendered = self.render(&renderer, *kind).await?;
            let path = self.layout.write(&stem, &rendered).await?;
            files.push((*kind, path));
        }

        let generation = generator.metrics().summary();
        info!(
            "Finished {}: {}",
            service_name,
            generation.display().replace('\n', "; ")
        );

        Ok(GeneratedFiles {
            service: service_name.into_inner(),
            stem,
            method_count: description.methods.len(),
            files,
            generation,
        })
    }

    async fn render(
        &self,
        renderer: &RenderPipeline<'_>,
        kind: DocumentKind,
    ) -> Result<RenderedDocument> {
        match kind {
            DocumentKind::Pdf => renderer.render(PdfBuilder::new()).await,
            DocumentKind::Notebook => renderer.render(NotebookBuilder::new()).await,
        }
    }
}

/// Descriptions occasionally omit top-level metadata the catalog has
fn fill_from_catalog(description: &mut ApiDescription, service: &ServiceDescriptor) {
    if description.name.is_empty() {
        description.name = service.name.clone();
    }
    if description.version.is_empty() {
        description.version = service.version.clone();
    }
    if description.title.is_empty() {
        description.title = service.display_title().to_string();
    }
    if description.description.is_none() {
        description.description = service.description.clone();
    }
}
