//! Flattened method records
//!
//! A [`MethodRecord`] is one operation of an API description with its resource
//! path folded into a dot-joined name. Records are produced by
//! [`crate::discovery::extract_methods`] and consumed read-only by the renderers.

use serde::{Deserialize, Serialize};

/// Description used when the source omits one
pub const MISSING_DESCRIPTION: &str = "No description available.";

/// One method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// `path`, `query`, ... when the description says so
    pub location: Option<String>,
    /// Declared JSON type (`string`, `integer`, ...)
    pub param_type: Option<String>,
}

/// One flattened API method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    /// Resource path and method name joined with `.` (e.g. `files.revisions.get`)
    pub full_name: String,
    /// Method id from the description (e.g. `drive.files.revisions.get`)
    pub id: String,
    pub http_method: String,
    pub path: String,
    /// Parameters in source order
    pub parameters: Vec<ParameterInfo>,
    pub description: String,
}

impl MethodRecord {
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterInfo> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// Resource segments then the method name, for client call chains
    ///
    /// Built from the tree position, never from `id`: a description id carries
    /// the API name in front, the fallback id does not.
    pub fn call_segments(&self) -> impl Iterator<Item = &str> {
        self.full_name.split('.').filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> MethodRecord {
        MethodRecord {
            full_name: "files.list".to_string(),
            id: id.to_string(),
            http_method: "GET".to_string(),
            path: "files".to_string(),
            parameters: vec![
                ParameterInfo {
                    name: "pageSize".to_string(),
                    description: "Max results".to_string(),
                    required: false,
                    location: Some("query".to_string()),
                    param_type: Some("integer".to_string()),
                },
                ParameterInfo {
                    name: "fileId".to_string(),
                    description: "The file".to_string(),
                    required: true,
                    location: Some("path".to_string()),
                    param_type: Some("string".to_string()),
                },
            ],
            description: MISSING_DESCRIPTION.to_string(),
        }
    }

    #[test]
    fn test_required_parameters() {
        let r = record("drive.files.list");
        let required: Vec<_> = r.required_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(required, vec!["fileId"]);
    }

    #[test]
    fn test_call_segments_ignore_id_shape() {
        let with_api_prefix = record("drive.files.list");
        assert_eq!(
            with_api_prefix.call_segments().collect::<Vec<_>>(),
            vec!["files", "list"]
        );

        let fallback_id = record("files.list");
        assert_eq!(
            fallback_id.call_segments().collect::<Vec<_>>(),
            vec!["files", "list"]
        );
    }
}
