//! Document Rendering
//!
//! Both output formats are produced by the same algorithm, [`RenderPipeline`],
//! driving a format-specific [`DocumentBuilder`]:
//!
//! 1. header section (title, name, version, date, API description)
//! 2. optional AI overview section
//! 3. one section per method, in extraction order
//!
//! A document therefore always has `1 + intro + N` sections, whatever the
//! text generator returns.

pub mod notebook;
pub mod pdf;
pub mod sanitize;

pub use notebook::NotebookBuilder;
pub use pdf::PdfBuilder;

use tracing::{debug, info};

use crate::ai::{PromptKind, PromptTemplates, TextGenerator, strip_code_fence};
use crate::constants::{generation, output};
use crate::discovery::ApiDescription;
use crate::types::{MethodRecord, Result};

// =============================================================================
// Document Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Notebook,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Pdf, DocumentKind::Notebook];

    /// Parse the `doc_type` path segment of a download URL
    ///
    /// `pdf` selects the PDF; anything else selects the notebook.
    pub fn from_download_segment(segment: &str) -> Self {
        if segment == "pdf" {
            DocumentKind::Pdf
        } else {
            DocumentKind::Notebook
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => output::PDF_CONTENT_TYPE,
            DocumentKind::Notebook => output::NOTEBOOK_CONTENT_TYPE,
        }
    }

    pub fn file_suffix(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => output::PDF_SUFFIX,
            DocumentKind::Notebook => output::NOTEBOOK_SUFFIX,
        }
    }

    /// URL segment used in download links
    pub fn download_segment(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Notebook => "notebook",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "PDF"),
            DocumentKind::Notebook => write!(f, "notebook"),
        }
    }
}

// =============================================================================
// Section Content
// =============================================================================

/// Facts shown in the header section
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub api_name: String,
    pub api_title: String,
    /// Version shown to the reader (as requested)
    pub display_version: String,
    /// Version the description was fetched with; used to build clients
    pub service_version: String,
    pub generated_on: String,
    pub description: Option<String>,
}

impl DocumentHeader {
    pub fn new(description: &ApiDescription, display_version: Option<&str>) -> Self {
        Self {
            api_name: description.name.clone(),
            api_title: description.title.clone(),
            display_version: display_version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(&description.version)
                .to_string(),
            service_version: description.version.clone(),
            generated_on: chrono::Local::now().format("%Y-%m-%d").to_string(),
            description: description.description.clone(),
        }
    }
}

/// One method plus whatever text generation produced for it
#[derive(Debug, Clone)]
pub struct MethodSection<'a> {
    pub method: &'a MethodRecord,
    pub narrative: Option<String>,
    pub example: Option<String>,
}

impl MethodSection<'_> {
    pub fn narrative_text(&self) -> &str {
        self.narrative
            .as_deref()
            .unwrap_or(generation::NARRATIVE_PLACEHOLDER)
    }

    pub fn example_text(&self) -> &str {
        self.example
            .as_deref()
            .unwrap_or(generation::EXAMPLE_PLACEHOLDER)
    }
}

// =============================================================================
// Builder Trait
// =============================================================================

/// Format-specific document assembly
///
/// Section methods never fail on content; `finish` reports serialization
/// problems as `RenderFailure`.
pub trait DocumentBuilder: Send {
    fn kind(&self) -> DocumentKind;

    fn header(&mut self, header: &DocumentHeader);

    /// Overview section; `None` renders the placeholder
    fn intro(&mut self, text: Option<&str>);

    fn method(&mut self, section: &MethodSection<'_>);

    fn finish(self) -> Result<Vec<u8>>;
}

/// A finished document, not yet written anywhere
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
    pub section_count: usize,
}

// =============================================================================
// Render Pipeline
// =============================================================================

pub struct RenderPipeline<'a> {
    generator: &'a TextGenerator,
    description: &'a ApiDescription,
    header: DocumentHeader,
    credential: &'a str,
    ai_intro: bool,
}

impl<'a> RenderPipeline<'a> {
    pub fn new(
        generator: &'a TextGenerator,
        description: &'a ApiDescription,
        header: DocumentHeader,
        credential: &'a str,
    ) -> Self {
        Self {
            generator,
            description,
            header,
            credential,
            ai_intro: true,
        }
    }

    pub fn with_ai_intro(mut self, enabled: bool) -> Self {
        self.ai_intro = enabled;
        self
    }

    /// Run the shared section algorithm against one builder
    pub async fn render<B: DocumentBuilder>(&self, mut builder: B) -> Result<RenderedDocument> {
        let kind = builder.kind();
        info!(
            "Rendering {} for {} ({} methods)",
            kind,
            self.header.api_name,
            self.description.methods.len()
        );

        builder.header(&self.header);
        let mut section_count = 1;

        if self.ai_intro {
            let prompt = PromptTemplates::overview(
                &self.header.api_title,
                &self.header.api_name,
                self.header.description.as_deref(),
            );
            let text = self
                .generator
                .generate_for(
                    &self.header.api_name,
                    PromptKind::Overview,
                    &prompt,
                    self.credential,
                )
                .await;
            builder.intro(text.as_deref());
            section_count += 1;
        }

        for method in &self.description.methods {
            debug!("Documenting {}", method.full_name);

            let narrative = self
                .generator
                .generate_for(
                    &method.full_name,
                    PromptKind::UseCases,
                    &PromptTemplates::use_cases(&self.header.api_name, method),
                    self.credential,
                )
                .await;
            let example = self
                .generator
                .generate_for(
                    &method.full_name,
                    PromptKind::CodeExample,
                    &PromptTemplates::code_example(method),
                    self.credential,
                )
                .await
                .map(|code| strip_code_fence(&code));

            builder.method(&MethodSection {
                method,
                narrative,
                example,
            });
            section_count += 1;
        }

        let bytes = builder.finish()?;
        info!(
            "Rendered {} ({} sections, {} bytes)",
            kind,
            section_count,
            bytes.len()
        );

        Ok(RenderedDocument {
            kind,
            bytes,
            section_count,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ai::generator::tests::MockProvider;
    use crate::types::ParameterInfo;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    pub(crate) fn sample_description(method_count: usize) -> ApiDescription {
        let methods = (0..method_count)
            .map(|i| MethodRecord {
                full_name: format!("files.op{}", i),
                id: format!("drive.files.op{}", i),
                http_method: "GET".to_string(),
                path: format!("files/{{fileId}}/op{}", i),
                parameters: vec![ParameterInfo {
                    name: "fileId".to_string(),
                    description: "The ID of the file | folder.".to_string(),
                    required: true,
                    location: Some("path".to_string()),
                    param_type: Some("string".to_string()),
                }],
                description: format!("Operation {} on a file.", i),
            })
            .collect();

        ApiDescription {
            name: "drive".to_string(),
            version: "v3".to_string(),
            title: "Google Drive API".to_string(),
            description: Some("Manages files in Drive.".to_string()),
            base_url: None,
            methods,
        }
    }

    fn generator(provider: Arc<MockProvider>) -> TextGenerator {
        TextGenerator::new(provider, Duration::ZERO)
    }

    #[test]
    fn test_document_kind_download_segment() {
        assert_eq!(DocumentKind::from_download_segment("pdf"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_download_segment("notebook"),
            DocumentKind::Notebook
        );
        assert_eq!(
            DocumentKind::from_download_segment("anything"),
            DocumentKind::Notebook
        );
        assert_eq!(DocumentKind::Pdf.content_type(), "application/pdf");
        assert_eq!(
            DocumentKind::Notebook.content_type(),
            "application/x-ipynb+json"
        );
    }

    #[test]
    fn test_header_version_defaults_to_service_version() {
        let description = sample_description(0);
        assert_eq!(DocumentHeader::new(&description, None).display_version, "v3");
        assert_eq!(
            DocumentHeader::new(&description, Some("  ")).display_version,
            "v3"
        );
        let header = DocumentHeader::new(&description, Some("v1"));
        assert_eq!(header.display_version, "v1");
        assert_eq!(header.service_version, "v3");
    }

    #[tokio::test]
    async fn test_section_count_with_failing_generation() {
        let provider = Arc::new(MockProvider::failing());
        let generator = generator(provider.clone());
        let description = sample_description(4);
        let header = DocumentHeader::new(&description, None);
        let pipeline = RenderPipeline::new(&generator, &description, header, "key");

        let pdf = pipeline.render(PdfBuilder::new()).await.unwrap();
        let notebook = pipeline.render(NotebookBuilder::new()).await.unwrap();

        assert_eq!(pdf.section_count, 1 + 1 + 4);
        assert_eq!(notebook.section_count, pdf.section_count);
        // intro + 2 calls per method, for each renderer
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2 * (1 + 2 * 4));
    }

    #[tokio::test]
    async fn test_without_intro_and_credential() {
        let provider = Arc::new(MockProvider::replying("text"));
        let generator = generator(provider.clone());
        let description = sample_description(2);
        let header = DocumentHeader::new(&description, None);
        let pipeline =
            RenderPipeline::new(&generator, &description, header, "").with_ai_intro(false);

        let doc = pipeline.render(NotebookBuilder::new()).await.unwrap();
        assert_eq!(doc.section_count, 1 + 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_placeholders_used_when_generation_fails() {
        let generator = generator(Arc::new(MockProvider::failing()));
        let description = sample_description(1);
        let header = DocumentHeader::new(&description, None);
        let pipeline = RenderPipeline::new(&generator, &description, header, "key");

        let doc = pipeline.render(NotebookBuilder::new()).await.unwrap();
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.contains(generation::NARRATIVE_PLACEHOLDER));
        assert!(text.contains(generation::EXAMPLE_PLACEHOLDER));
        assert!(text.contains(generation::INTRO_PLACEHOLDER));
        // a credential was supplied, so nothing may ask for one
        assert!(!text.contains("Enable Gemini"));
        assert!(!text.contains("API key for AI"));
    }

    #[tokio::test]
    async fn test_code_fences_stripped_from_examples() {
        let generator = generator(Arc::new(MockProvider::replying(
            "```python\nprint('listing')\n```",
        )));
        let description = sample_description(1);
        let header = DocumentHeader::new(&description, None);
        let pipeline = RenderPipeline::new(&generator, &description, header, "key");

        let doc = pipeline.render(NotebookBuilder::new()).await.unwrap();
        let notebook: notebook::Notebook = serde_json::from_slice(&doc.bytes).unwrap();
        let code = notebook.cells.last().unwrap().source();
        assert!(code.contains("print('listing')"));
        assert!(!code.contains("```"));
    }
}
