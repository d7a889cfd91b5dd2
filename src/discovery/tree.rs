//! Method-Tree Extractor
//!
//! Flattens the nested `resources`/`methods` structure of a REST description
//! into an ordered list of [`MethodRecord`]s.
//!
//! Traversal is an explicit-stack, pre-order walk: every method of a node is
//! emitted before any of its child resources, and both methods and children
//! are visited in source key order. Nesting deeper than the configured limit
//! fails with [`ScribeError::MalformedTree`] instead of walking on.

use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::discovery::MAX_RESOURCE_DEPTH;
use crate::types::method::MISSING_DESCRIPTION;
use crate::types::{MethodRecord, ParameterInfo, Result, ScribeError};

/// Parsed REST description: top-level metadata plus flattened methods
#[derive(Debug, Clone)]
pub struct ApiDescription {
    pub name: String,
    pub version: String,
    pub title: String,
    pub description: Option<String>,
    /// `rootUrl` + `servicePath`, when both are present
    pub base_url: Option<String>,
    pub methods: Vec<MethodRecord>,
}

impl ApiDescription {
    /// Parse a description document with the default depth limit
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_with_depth(value, MAX_RESOURCE_DEPTH)
    }

    pub fn from_value_with_depth(value: &Value, max_depth: usize) -> Result<Self> {
        let name = string_field(value, "name").unwrap_or_default();
        let title = string_field(value, "title").unwrap_or_else(|| name.clone());
        let base_url = match (
            string_field(value, "rootUrl"),
            string_field(value, "servicePath"),
        ) {
            (Some(root), Some(service)) => Some(format!("{}{}", root, service)),
            (Some(root), None) => Some(root),
            _ => None,
        };

        Ok(Self {
            version: string_field(value, "version").unwrap_or_default(),
            description: string_field(value, "description").filter(|d| !d.trim().is_empty()),
            methods: extract_methods_with_depth(value, max_depth)?,
            name,
            title,
            base_url,
        })
    }
}

/// Flatten a description's resource tree with the default depth limit
pub fn extract_methods(description: &Value) -> Result<Vec<MethodRecord>> {
    extract_methods_with_depth(description, MAX_RESOURCE_DEPTH)
}

/// Flatten a description's resource tree
///
/// The root node may carry its own `methods`; they are emitted first, without
/// a resource prefix.
pub fn extract_methods_with_depth(
    description: &Value,
    max_depth: usize,
) -> Result<Vec<MethodRecord>> {
    struct Frame<'a> {
        node: &'a Value,
        prefix: String,
        depth: usize,
    }

    let mut records = Vec::new();
    let mut stack = vec![Frame {
        node: description,
        prefix: String::new(),
        depth: 0,
    }];

    while let Some(Frame {
        node,
        prefix,
        depth,
    }) = stack.pop()
    {
        if depth > max_depth {
            return Err(ScribeError::malformed_tree(
                prefix,
                format!("resource nesting exceeds {} levels", max_depth),
            ));
        }

        if let Some(methods) = object_member(node, "methods", &prefix)? {
            for (method_name, detail) in methods {
                let full_name = join_name(&prefix, method_name);
                let Some(detail) = detail.as_object() else {
                    return Err(ScribeError::malformed_tree(
                        full_name,
                        "method detail is not an object",
                    ));
                };
                records.push(project_method(full_name, detail));
            }
        }

        if let Some(resources) = object_member(node, "resources", &prefix)? {
            // Reversed so the first child is popped first
            for (resource_name, child) in resources.iter().rev() {
                stack.push(Frame {
                    node: child,
                    prefix: join_name(&prefix, resource_name),
                    depth: depth + 1,
                });
            }
        }
    }

    debug!("Extracted {} methods", records.len());
    Ok(records)
}

fn object_member<'a>(
    node: &'a Value,
    key: &str,
    prefix: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match node.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ScribeError::malformed_tree(
            if prefix.is_empty() { "<root>" } else { prefix },
            format!("'{}' is not an object", key),
        )),
    }
}

fn join_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn project_method(full_name: String, detail: &Map<String, Value>) -> MethodRecord {
    let text = |key: &str| {
        detail
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let parameters = match detail.get("parameters") {
        Some(Value::Object(params)) => params
            .iter()
            .map(|(name, param)| ParameterInfo {
                name: name.clone(),
                description: param
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                required: param
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                location: param
                    .get("location")
                    .and_then(Value::as_str)
                    .map(String::from),
                param_type: param.get("type").and_then(Value::as_str).map(String::from),
            })
            .collect(),
        Some(other) if !other.is_null() => {
            debug!("Ignoring non-object parameters on {}", full_name);
            Vec::new()
        }
        _ => Vec::new(),
    };

    MethodRecord {
        id: text("id").unwrap_or_else(|| full_name.clone()),
        http_method: text("httpMethod")
            .map(|m| m.to_uppercase())
            .unwrap_or_else(|| "GET".to_string()),
        path: text("path").or_else(|| text("flatPath")).unwrap_or_default(),
        description: text("description").unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
        parameters,
        full_name,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_single_resource_single_method() {
        let tree = json!({"resources": {"foo": {"methods": {"bar": {}}}}});
        let records = extract_methods(&tree).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "foo.bar");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let tree = json!({"resources": {"foo": {"methods": {"bar": {}}}}});
        let record = &extract_methods(&tree).unwrap()[0];

        assert_eq!(record.http_method, "GET");
        assert_eq!(record.description, MISSING_DESCRIPTION);
        assert!(record.parameters.is_empty());
        assert_eq!(record.id, "foo.bar");
        assert_eq!(record.path, "");
    }

    #[test]
    fn test_methods_before_children_in_source_order() {
        let tree = json!({
            "resources": {
                "zeta": {
                    "methods": {"list": {}, "get": {}},
                    "resources": {
                        "inner": {"methods": {"delete": {"httpMethod": "DELETE"}}}
                    }
                },
                "alpha": {"methods": {"create": {"httpMethod": "post"}}}
            }
        });

        let names: Vec<_> = extract_methods(&tree)
            .unwrap()
            .into_iter()
            .map(|r| r.full_name)
            .collect();

        assert_eq!(
            names,
            vec!["zeta.list", "zeta.get", "zeta.inner.delete", "alpha.create"]
        );
    }

    #[test]
    fn test_root_methods_come_first() {
        let tree = json!({
            "methods": {"batch": {"httpMethod": "POST"}},
            "resources": {"files": {"methods": {"get": {}}}}
        });
        let names: Vec<_> = extract_methods(&tree)
            .unwrap()
            .into_iter()
            .map(|r| r.full_name)
            .collect();
        assert_eq!(names, vec!["batch", "files.get"]);
    }

    #[test]
    fn test_parameters_projected_in_order() {
        let tree = json!({
            "resources": {"files": {"methods": {"get": {
                "id": "drive.files.get",
                "httpMethod": "GET",
                "path": "files/{fileId}",
                "description": "Gets a file.",
                "parameters": {
                    "fileId": {"type": "string", "required": true, "location": "path", "description": "The file ID."},
                    "fields": {"type": "string", "location": "query"}
                }
            }}}}
        });

        let record = &extract_methods(&tree).unwrap()[0];
        assert_eq!(record.id, "drive.files.get");
        assert_eq!(record.path, "files/{fileId}");
        assert_eq!(record.parameters.len(), 2);
        assert_eq!(record.parameters[0].name, "fileId");
        assert!(record.parameters[0].required);
        assert_eq!(record.parameters[0].location.as_deref(), Some("path"));
        assert_eq!(record.parameters[1].name, "fields");
        assert!(!record.parameters[1].required);
        assert_eq!(record.parameters[1].description, "");
    }

    #[test]
    fn test_depth_limit_rejects_deep_tree() {
        let mut tree = json!({"methods": {"leaf": {}}});
        for i in 0..5 {
            tree = json!({"resources": {format!("r{}", i): tree}});
        }

        assert!(extract_methods_with_depth(&tree, 5).is_ok());
        let err = extract_methods_with_depth(&tree, 4).unwrap_err();
        assert!(matches!(err, ScribeError::MalformedTree { .. }));
    }

    #[test]
    fn test_non_object_members_rejected() {
        let tree = json!({"resources": {"foo": {"methods": ["bar"]}}});
        assert!(matches!(
            extract_methods(&tree),
            Err(ScribeError::MalformedTree { .. })
        ));

        let tree = json!({"resources": {"foo": {"methods": {"bar": "GET"}}}});
        assert!(matches!(
            extract_methods(&tree),
            Err(ScribeError::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_api_description_metadata() {
        let doc = json!({
            "name": "drive",
            "version": "v3",
            "title": "Google Drive API",
            "description": "Manages files in Drive.",
            "rootUrl": "https://www.googleapis.com/",
            "servicePath": "drive/v3/",
            "resources": {"files": {"methods": {"list": {}}}}
        });

        let api = ApiDescription::from_value(&doc).unwrap();
        assert_eq!(api.name, "drive");
        assert_eq!(api.title, "Google Drive API");
        assert_eq!(
            api.base_url.as_deref(),
            Some("https://www.googleapis.com/drive/v3/")
        );
        assert_eq!(api.methods.len(), 1);
    }

    // -------------------------------------------------------------------------
    // Property: every method visited exactly once, in pre-order
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    struct Shape {
        methods: usize,
        children: Vec<Shape>,
    }

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = (0usize..4).prop_map(|methods| Shape {
            methods,
            children: Vec::new(),
        });
        leaf.prop_recursive(4, 48, 4, |inner| {
            ((0usize..4), prop::collection::vec(inner, 0..4))
                .prop_map(|(methods, children)| Shape { methods, children })
        })
    }

    fn to_value(shape: &Shape) -> Value {
        let mut node = Map::new();
        if shape.methods > 0 {
            let methods: Map<String, Value> = (0..shape.methods)
                .map(|i| (format!("m{}", i), json!({"httpMethod": "GET"})))
                .collect();
            node.insert("methods".to_string(), Value::Object(methods));
        }
        if !shape.children.is_empty() {
            let resources: Map<String, Value> = shape
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| (format!("r{}", i), to_value(child)))
                .collect();
            node.insert("resources".to_string(), Value::Object(resources));
        }
        Value::Object(node)
    }

    fn expected_names(shape: &Shape, prefix: &str, out: &mut Vec<String>) {
        for i in 0..shape.methods {
            out.push(join_name(prefix, &format!("m{}", i)));
        }
        for (i, child) in shape.children.iter().enumerate() {
            expected_names(child, &join_name(prefix, &format!("r{}", i)), out);
        }
    }

    proptest! {
        #[test]
        fn prop_every_method_visited_once(tree in shape()) {
            let value = to_value(&tree);
            let records = extract_methods(&value).unwrap();

            let mut expected = Vec::new();
            expected_names(&tree, "", &mut expected);

            let names: Vec<String> = records.iter().map(|r| r.full_name.clone()).collect();
            let unique: HashSet<&String> = names.iter().collect();

            prop_assert_eq!(records.len(), expected.len());
            prop_assert_eq!(unique.len(), names.len());
            prop_assert_eq!(names, expected);
        }
    }
}
