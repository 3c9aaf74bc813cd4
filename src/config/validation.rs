//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Exactly one of controller / view / include / property per rule
//! - Known HTTP methods, non-empty hostnames and property names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: &[RuleDef] → Result<(), Vec<ValidationError>>
//! - Path templates are checked when the table is built, by the compiler itself

use thiserror::Error;

use crate::config::schema::{IncludeDef, RoutesConfig, RuleDef};

/// Methods accepted in route files.
pub const KNOWN_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "CONNECT", "TRACE",
];

/// A semantic problem in one rule, located by its position (`routes[1].include[0]`).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{location}: unknown HTTP method '{method}'")]
    UnknownMethod { location: String, method: String },

    #[error("{location}: only one of controller, view, include, property may be set (found {found})")]
    ConflictingTargets { location: String, found: String },

    #[error("{location}: rule has no controller, view, include or property")]
    MissingTarget { location: String },

    #[error("{location}: property names must be non-empty and at least one must be given")]
    EmptyProperty { location: String },

    #[error("{location}: hostname must not be empty")]
    EmptyHostname { location: String },
}

/// Validate a whole route file.
pub fn validate_config(config: &RoutesConfig) -> Result<(), Vec<ValidationError>> {
    validate_rules(&config.routes, "routes")
}

/// Validate a list of rules, reporting locations under `location`.
pub fn validate_rules(rules: &[RuleDef], location: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        check_rule(rule, &format!("{location}[{i}]"), &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rule(rule: &RuleDef, location: &str, errors: &mut Vec<ValidationError>) {
    for method in &rule.methods {
        let upper = method.to_ascii_uppercase();
        if !KNOWN_METHODS.contains(&upper.as_str()) {
            errors.push(ValidationError::UnknownMethod {
                location: location.to_string(),
                method: method.clone(),
            });
        }
    }

    if rule.hostname.as_deref().is_some_and(str::is_empty) {
        errors.push(ValidationError::EmptyHostname {
            location: location.to_string(),
        });
    }

    let found: Vec<&str> = [
        ("controller", rule.controller.is_some()),
        ("view", rule.view.is_some()),
        ("include", rule.include.is_some()),
        ("property", rule.property.is_some()),
    ]
    .into_iter()
    .filter_map(|(field, set)| set.then_some(field))
    .collect();

    match found.len() {
        0 => errors.push(ValidationError::MissingTarget {
            location: location.to_string(),
        }),
        1 => {}
        _ => errors.push(ValidationError::ConflictingTargets {
            location: location.to_string(),
            found: found.join(", "),
        }),
    }

    if let Some(props) = &rule.property {
        if props.is_empty() || props.keys().any(|k| k.is_empty()) {
            errors.push(ValidationError::EmptyProperty {
                location: location.to_string(),
            });
        }
    }

    if let Some(IncludeDef::Rules(children)) = &rule.include {
        for (i, child) in children.iter().enumerate() {
            check_rule(child, &format!("{location}.include[{i}]"), errors);
        }
    }
}
