//! Catalog entry types

use serde::{Deserialize, Serialize};

/// One entry of the discovery catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub preferred: bool,
}

impl ServiceDescriptor {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            version: version.into(),
            description: None,
            preferred: true,
        }
    }

    /// Title used for display, falling back to the name
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    /// Case-insensitive sort key
    pub fn sort_key(&self) -> String {
        self.title.to_lowercase()
    }
}
