//! Generate Command
//!
//! Run the documentation pipeline for one API from the terminal.
//!
//! Usage:
//!   apiscribe generate --api drive [--version v3] [--pdf-only | --notebook-only]

use std::path::PathBuf;

use crate::cli::Output;
use crate::config::{ConfigLoader, ProviderKind};
use crate::pipeline::{DocumentSelection, DocumentationPipeline, GenerationJob};
use crate::types::Result;

pub struct GenerateOptions {
    pub api: String,
    pub version: Option<String>,
    pub gemini_key: Option<String>,
    pub openai_key: Option<String>,
    pub documents: DocumentSelection,
    pub output_dir: Option<PathBuf>,
    pub reuse_content: bool,
    pub quiet: bool,
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(dir) = options.output_dir {
        config.output.dir = dir;
    }
    if options.reuse_content {
        config.generation.reuse_content = true;
    }

    let out = Output::quiet(options.quiet);

    let credential = match config.llm.provider_kind()? {
        ProviderKind::Gemini => options.gemini_key,
        ProviderKind::OpenAi => options.openai_key,
    }
    .unwrap_or_default();
    if credential.trim().is_empty() {
        out.warning("No API key given; AI sections will use placeholders");
    }

    let pipeline = DocumentationPipeline::from_config(&config)?;
    let job = GenerationJob::new(&options.api, &credential)
        .with_display_version(options.version)
        .with_documents(options.documents);

    out.header(&format!("Generating documentation for {}", options.api));
    let generated = pipeline.run(&job).await?;

    out.success(&format!(
        "Documented {} methods of {}",
        generated.method_count, generated.service
    ));
    for (kind, path) in &generated.files {
        out.field(&kind.to_string(), path.display());
    }

    out.header("Generation");
    for line in generated.generation.display().lines() {
        out.info(line);
    }
    Ok(())
}
