//! Colab notebook (nbformat 4) builder

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DocumentBuilder, DocumentHeader, DocumentKind, MethodSection};
use crate::constants::generation;
use crate::types::{MethodRecord, ParameterInfo, Result, ResultExt};

const NBFORMAT: u32 = 4;
const NBFORMAT_MINOR: u32 = 4;

/// Cells emitted by [`DocumentBuilder::header`]: title, setup, install, auth, client
pub const PREAMBLE_CELLS: usize = 5;

// =============================================================================
// nbformat document model
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub nbformat: u32,
    pub nbformat_minor: u32,
    pub metadata: NotebookMetadata,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookMetadata {
    pub colab: ColabMetadata,
    pub kernelspec: KernelSpec,
    pub language_info: LanguageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColabMetadata {
    pub name: String,
    #[serde(default)]
    pub provenance: Vec<Value>,
    #[serde(default)]
    pub toc_visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpec {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        metadata: Map<String, Value>,
        source: Vec<String>,
    },
    Code {
        metadata: Map<String, Value>,
        source: Vec<String>,
        execution_count: Option<u32>,
        outputs: Vec<Value>,
    },
}

impl Cell {
    pub fn markdown(text: &str) -> Self {
        Cell::Markdown {
            metadata: Map::new(),
            source: source_lines(text),
        }
    }

    pub fn code(text: &str) -> Self {
        Cell::Code {
            metadata: Map::new(),
            source: source_lines(text),
            execution_count: None,
            outputs: Vec::new(),
        }
    }

    pub fn source(&self) -> String {
        match self {
            Cell::Markdown { source, .. } | Cell::Code { source, .. } => source.concat(),
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Cell::Code { .. })
    }
}

/// nbformat stores sources as lines, each but the last keeping its newline
fn source_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();
    if let Some(last) = lines.last_mut()
        && last.ends_with('\n')
    {
        last.pop();
    }
    lines
}

// =============================================================================
// Builder
// =============================================================================

#[derive(Debug, Default)]
pub struct NotebookBuilder {
    name: String,
    cells: Vec<Cell>,
}

impl NotebookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_markdown(&mut self, text: &str) {
        self.cells.push(Cell::markdown(text));
    }

    fn push_code(&mut self, text: &str) {
        self.cells.push(Cell::code(text));
    }

    fn into_notebook(self) -> Notebook {
        Notebook {
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
            metadata: NotebookMetadata {
                colab: ColabMetadata {
                    name: self.name,
                    provenance: Vec::new(),
                    toc_visible: true,
                },
                kernelspec: KernelSpec {
                    name: "python3".to_string(),
                    display_name: "Python 3".to_string(),
                },
                language_info: LanguageInfo {
                    name: "python".to_string(),
                },
            },
            cells: self.cells,
        }
    }
}

impl DocumentBuilder for NotebookBuilder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Notebook
    }

    fn header(&mut self, header: &DocumentHeader) {
        self.name = format!("{}{}", header.api_name, DocumentKind::Notebook.file_suffix());

        let mut title = format!(
            "# {} API Documentation\n\n**{}**\n\n- Version: `{}`\n- Generated: {}",
            header.api_name, header.api_title, header.display_version, header.generated_on
        );
        if let Some(description) = &header.description {
            title.push_str("\n\n");
            title.push_str(description);
        }
        self.push_markdown(&title);

        self.push_markdown(
            "## Setup\n\nInstall the Google API client library for Python.",
        );
        self.push_code("!pip install --quiet google-api-python-client google-auth");

        self.push_markdown(
            "## Authentication\n\nSign in with your Google account and build the service client. \
             Methods that need more than the default scopes may require extra consent.",
        );
        self.push_code(&format!(
            "from google.colab import auth\n\
             auth.authenticate_user()\n\
             \n\
             import google.auth\n\
             from googleapiclient.discovery import build\n\
             from pprint import pprint\n\
             \n\
             credentials, project = google.auth.default()\n\
             service = build('{}', '{}', credentials=credentials)",
            header.api_name, header.service_version
        ));
    }

    fn intro(&mut self, text: Option<&str>) {
        let body = text.unwrap_or(generation::INTRO_PLACEHOLDER);
        self.push_markdown(&format!("## API Overview\n\n{}", body));
    }

    fn method(&mut self, section: &MethodSection<'_>) {
        let method = section.method;
        self.push_markdown(&method_markdown(section));
        self.push_code(&method_code(method, section.example_text()));
    }

    fn finish(self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.into_notebook()).render_context("notebook")
    }
}

fn method_markdown(section: &MethodSection<'_>) -> String {
    let method = section.method;
    let mut md = format!(
        "## Endpoint: {}\n\n**HTTP Method:** `{}`  \n**Path:** `{}`\n\n{}",
        method.full_name, method.http_method, method.path, method.description
    );

    if !method.parameters.is_empty() {
        md.push_str("\n\n### Parameters\n\n");
        md.push_str("| Name | Type | Location | Required | Description |\n");
        md.push_str("|------|------|----------|----------|-------------|\n");
        for param in &method.parameters {
            md.push_str(&parameter_row(param));
        }
    }

    md.push_str(&format!(
        "\n\n<details>\n<summary>AI-Generated Documentation</summary>\n\n{}\n\n</details>",
        section.narrative_text()
    ));
    md
}

fn parameter_row(param: &ParameterInfo) -> String {
    format!(
        "| `{}` | {} | {} | {} | {} |\n",
        escape_table_cell(&param.name),
        escape_table_cell(param.param_type.as_deref().unwrap_or("-")),
        escape_table_cell(param.location.as_deref().unwrap_or("-")),
        if param.required { "yes" } else { "no" },
        escape_table_cell(&param.description),
    )
}

/// Keep a value inside a single Markdown table cell
fn escape_table_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `files.permissions.list` becomes `files().permissions().list`
fn python_call_chain(method: &MethodRecord) -> String {
    method.call_segments().collect::<Vec<_>>().join("().")
}

fn method_code(method: &MethodRecord, example: &str) -> String {
    let arguments: Vec<String> = method
        .required_parameters()
        .map(|p| format!("{}='{}'", p.name.replace(['-', '.'], "_"), p.name.to_uppercase()))
        .collect();

    format!(
        "# {} {}\n\
         request = service.{}({})\n\
         \n\
         {}\n\
         \n\
         try:\n    \
             response = request.execute()\n    \
             pprint(response)\n\
         except Exception as e:\n    \
             print(f'Request failed: {{e}}')",
        method.http_method,
        method.path,
        python_call_chain(method),
        arguments.join(", "),
        example
    )
}
