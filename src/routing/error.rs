//! Routing error definitions.

use thiserror::Error;

/// Errors raised while compiling patterns or building a rule table.
///
/// Matching itself never fails: an unmatched request is `None`, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A `{...}` placeholder in a path template is malformed.
    #[error("Invalid pattern '{template}': {reason}")]
    InvalidPattern { template: String, reason: String },

    /// The same variable name appears twice in one template.
    #[error("Duplicate variable '{name}' in pattern '{template}'")]
    DuplicateVariable { template: String, name: String },

    /// A named include source could not be located.
    #[error("Include source not found: {0}")]
    MissingIncludeSource(String),

    /// A named include was declared but the table was built without a locator.
    #[error("No rule locator available to resolve include '{0}'")]
    NoLocator(String),

    /// A leaf rule has neither a target nor properties.
    #[error("Rule '{path}' has no target")]
    MissingTarget { path: String },

    /// A located include source could not be turned into rules.
    #[error("Invalid include source '{source_name}': {reason}")]
    InvalidSource { source_name: String, reason: String },
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoutingError::InvalidPattern {
            template: "a/{1x}".into(),
            reason: "bad identifier '1x'".into(),
        };
        assert_eq!(err.to_string(), "Invalid pattern 'a/{1x}': bad identifier '1x'");

        let err = RoutingError::MissingIncludeSource("admin".into());
        assert!(err.to_string().contains("admin"));
    }
}
