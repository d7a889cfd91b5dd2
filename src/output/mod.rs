//! Output Layout
//!
//! Maps a service name and document kind to a file under the output
//! directory. Names are deterministic (`{service}_documentation.pdf`,
//! `{service}_colab_notebook.ipynb`), so later runs overwrite earlier ones.
//! With `unique_names` each run gets its own stem instead.

use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::config::OutputConfig;
use crate::render::{DocumentKind, RenderedDocument};
use crate::types::{Result, ScribeError, ServiceName};

#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
    unique_names: bool,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, unique_names: bool) -> Self {
        Self {
            dir: dir.into(),
            unique_names,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.dir, config.unique_names)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File stem for one run; call once and reuse for every document of the run
    pub fn run_stem(&self, service: &ServiceName) -> String {
        if self.unique_names {
            format!("{}-{}", service, Uuid::new_v4().simple())
        } else {
            service.to_string()
        }
    }

    pub fn path_for(&self, stem: &str, kind: DocumentKind) -> PathBuf {
        self.dir.join(format!("{}{}", stem, kind.file_suffix()))
    }

    /// Path for a stem taken from a download request
    pub fn download_path(&self, stem: &str, kind: DocumentKind) -> Result<PathBuf> {
        let stem = ServiceName::parse(stem)?;
        Ok(self.path_for(stem.as_str(), kind))
    }

    /// Write a rendered document, creating the output directory if needed
    pub async fn write(&self, stem: &str, document: &RenderedDocument) -> Result<PathBuf> {
        let path = self.path_for(stem, document.kind);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| write_failure(document.kind, &self.dir, e))?;
        tokio::fs::write(&path, &document.bytes)
            .await
            .map_err(|e| write_failure(document.kind, &path, e))?;

        info!("Wrote {} to {}", document.kind, path.display());
        Ok(path)
    }
}

fn write_failure(kind: DocumentKind, path: &Path, err: std::io::Error) -> ScribeError {
    ScribeError::render_failure(kind.to_string(), format!("{}: {}", path.display(), err))
}
