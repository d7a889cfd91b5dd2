//! HTML form page
//!
//! The page is an embedded Handlebars template; [`PageView`] collects what one
//! response shows and serializes into the template context. Handlebars escapes
//! every `{{value}}` substitution.

use handlebars::Handlebars;
use serde::Serialize;

use crate::pipeline::GeneratedFiles;
use crate::render::DocumentKind;
use crate::types::{Result, ResultExt, ScribeError, ServiceDescriptor};

const INDEX_TEMPLATE: &str = include_str!("templates/index.html.hbs");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Everything the page shows for one response
#[derive(Debug, Clone, Default)]
pub struct PageView {
    apis: Vec<ServiceDescriptor>,
    selected: Option<String>,
    message: Option<StatusMessage>,
    downloads: Vec<(DocumentKind, String)>,
}

impl PageView {
    pub fn with_apis(apis: Vec<ServiceDescriptor>) -> Self {
        Self {
            apis,
            ..Default::default()
        }
    }

    pub fn selected(mut self, name: &str) -> Self {
        self.selected = Some(name.to_string());
        self
    }

    pub fn message(mut self, message: StatusMessage) -> Self {
        self.message = Some(message);
        self
    }

    pub fn downloads(mut self, generated: &GeneratedFiles) -> Self {
        self.downloads = generated
            .files
            .iter()
            .map(|(kind, _)| {
                (
                    *kind,
                    format!("/download/{}/{}", kind.download_segment(), generated.stem),
                )
            })
            .collect();
        self
    }

    fn context(&self) -> PageContext<'_> {
        PageContext {
            apis: self
                .apis
                .iter()
                .map(|api| ApiOption {
                    name: &api.name,
                    version: &api.version,
                    title: api.display_title(),
                    selected: self.selected.as_deref() == Some(api.name.as_str()),
                })
                .collect(),
            message: self.message.as_ref(),
            downloads: self
                .downloads
                .iter()
                .map(|(kind, href)| DownloadLink {
                    label: kind.to_string(),
                    href,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    apis: Vec<ApiOption<'a>>,
    message: Option<&'a StatusMessage>,
    downloads: Vec<DownloadLink<'a>>,
}

#[derive(Serialize)]
struct ApiOption<'a> {
    name: &'a str,
    version: &'a str,
    title: &'a str,
    selected: bool,
}

#[derive(Serialize)]
struct DownloadLink<'a> {
    label: String,
    href: &'a str,
}

/// Template registry, built once per server
#[derive(Debug)]
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string("index", INDEX_TEMPLATE)
            .map_err(|e| ScribeError::render_failure("page template", e))?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, view: &PageView) -> Result<String> {
        self.handlebars
            .render("index", &view.context())
            .render_context("page")
    }
}
