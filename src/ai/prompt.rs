//! Prompt Construction
//!
//! Fixed templates for the three kinds of generated content: the API
//! overview, per-method use cases, and per-method code examples.

use crate::types::MethodRecord;

/// What a prompt asks for; also the content cache discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Overview,
    UseCases,
    CodeExample,
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptKind::Overview => write!(f, "overview"),
            PromptKind::UseCases => write!(f, "use-cases"),
            PromptKind::CodeExample => write!(f, "code-example"),
        }
    }
}

/// Prompt section types
#[derive(Debug, Clone)]
enum PromptSection {
    Role(String),
    Objectives(Vec<String>),
    Context(Vec<(String, String)>),
    Focus(Vec<String>),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: &str) -> Self {
        self.sections.push(PromptSection::Role(role.to_string()));
        self
    }

    pub fn objectives(mut self, objectives: &[&str]) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Add a context item, merging into the last context section
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let pair = (key.to_string(), value.to_string());
        match self.sections.last_mut() {
            Some(PromptSection::Context(items)) => items.push(pair),
            _ => self.sections.push(PromptSection::Context(vec![pair])),
        }
        self
    }

    pub fn focus(mut self, rules: &[&str]) -> Self {
        self.sections.push(PromptSection::Focus(
            rules.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role(role) => {
                    prompt.push_str(&format!("You are {}.\n\n", role));
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("Generate:\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push('\n');
                }
                PromptSection::Context(items) => {
                    for (key, value) in items {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Focus(rules) => {
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push('\n');
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Overview of what the whole API offers
    pub fn overview(api_title: &str, api_name: &str, description: Option<&str>) -> String {
        let mut builder = PromptBuilder::new()
            .role("a technical writer introducing a Google API to developers")
            .context_item("API", api_title)
            .context_item("Name", api_name);
        if let Some(desc) = description {
            builder = builder.context_item("Description", desc);
        }
        builder
            .objectives(&[
                "A short overview of what this API lets developers build.",
                "Its main capabilities and typical workflows.",
                "Anything to know before making the first request.",
            ])
            .focus(&["Answer in plain prose without a greeting."])
            .build()
    }

    /// Friendly technical description and use cases for one method
    pub fn use_cases(api_name: &str, method: &MethodRecord) -> String {
        PromptBuilder::new()
            .role("a technical writer documenting REST endpoints")
            .context_item(
                &format!("For the {} API endpoint", api_name),
                &format!("{} {}", method.http_method, method.id),
            )
            .objectives(&[
                "A friendly technical description with common use cases.",
                "Example request with placeholder values.",
                "Common parameters and their purposes.",
            ])
            .focus(&["Answer in plain prose without a greeting."])
            .build()
    }

    /// Python code example for one method
    pub fn code_example(method: &MethodRecord) -> String {
        PromptBuilder::new()
            .role("a Python developer writing client library samples")
            .context_item("Service", &method.id)
            .context_item("HTTP", &format!("{} {}", method.http_method, method.path))
            .objectives(&["Create a practical Python code example for this API endpoint."])
            .focus(&[
                "Include realistic parameters and error handling.",
                "Return only code, without Markdown fences or explanation.",
            ])
            .build()
    }
}
