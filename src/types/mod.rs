pub mod error;
pub mod method;
pub mod service;

pub use error::{ErrorCategory, ErrorClassifier, LlmError, Result, ResultExt, ScribeError};
pub use method::{MethodRecord, ParameterInfo};
pub use service::ServiceDescriptor;

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

/// Type-safe wrapper for a catalog service name
///
/// Service names become file stems under the output directory and path
/// segments of the download endpoint, so only ASCII alphanumerics, `_`, `-`
/// and `.` are accepted, and the name may not start with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= 128
            && !trimmed.starts_with('.')
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ScribeError::InvalidServiceName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_accepts_catalog_names() {
        assert_eq!(ServiceName::parse("drive").unwrap().as_str(), "drive");
        assert_eq!(
            ServiceName::parse(" admin.directory_v1 ").unwrap().as_str(),
            "admin.directory_v1"
        );
        assert!(ServiceName::parse("cloud-resource-manager").is_ok());
    }

    #[test]
    fn test_service_name_rejects_path_segments() {
        assert!(ServiceName::parse("").is_err());
        assert!(ServiceName::parse("../etc/passwd").is_err());
        assert!(ServiceName::parse("a/b").is_err());
        assert!(ServiceName::parse(".hidden").is_err());
        assert!(ServiceName::parse("name with space").is_err());
    }
}
