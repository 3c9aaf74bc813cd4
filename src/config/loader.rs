//! Route file loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::locator::FileLocator;
use crate::config::schema::{ControllerDef, IncludeDef, RoutesConfig, RuleDef};
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::{RoutingError, Rule, RuleTable, Target};
use crate::routing::target::DEFAULT_METHOD;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}

pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate route file contents.
pub fn parse_config(content: &str) -> Result<RoutesConfig, ConfigError> {
    let config: RoutesConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate a route file.
pub fn load_config(path: &Path) -> Result<RoutesConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load a route file and build its rule table.
pub fn load_table(path: &Path) -> Result<(RoutesConfig, RuleTable), ConfigError> {
    let config = load_config(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let table = build_table(&config, base)?;
    Ok((config, table))
}

/// Build a rule table, resolving named includes under `include_dir`
/// relative to `base`.
pub fn build_table(config: &RoutesConfig, base: &Path) -> Result<RuleTable, ConfigError> {
    let locator = FileLocator::new(include_dir(config, base));
    let rules = rules_from_defs(&config.routes);
    Ok(RuleTable::with_locator(&rules, Some(&locator))?)
}

/// Directory named includes are resolved against.
pub fn include_dir(config: &RoutesConfig, base: &Path) -> PathBuf {
    match &config.include_dir {
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    }
}

/// Convert validated definitions into rules, preserving order.
pub fn rules_from_defs(defs: &[RuleDef]) -> Vec<Rule> {
    defs.iter().map(rule_from_def).collect()
}

fn rule_from_def(def: &RuleDef) -> Rule {
    let mut rule = Rule::group(&def.path);

    if let Some(props) = &def.property {
        return rule.include(
            props
                .iter()
                .map(|(name, value)| Rule::property(name, value))
                .collect::<Vec<_>>(),
        );
    }

    if !def.methods.is_empty() {
        rule = rule.method(&def.methods);
    }
    if let Some(hostname) = &def.hostname {
        rule = rule.hostname(hostname);
    }
    if let Some(ajax) = def.ajax {
        rule = rule.ajax(ajax);
    }
    if let Some(name) = &def.name {
        rule = rule.name(name);
    }
    if !def.args.is_empty() {
        rule = rule.args(def.args.clone());
    }

    if let Some(controller) = &def.controller {
        rule = rule.target(match controller {
            ControllerDef::Class(class) => Target::controller(class, DEFAULT_METHOD),
            ControllerDef::Pair(class, method) => Target::controller(class, method),
        });
    }
    if let Some(view) = &def.view {
        rule = rule.view(view);
    }
    match &def.include {
        Some(IncludeDef::Source(source)) => rule = rule.include(source.as_str()),
        Some(IncludeDef::Rules(children)) => rule = rule.include(rules_from_defs(children)),
        None => {}
    }
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_and_build() {
        let config = parse_config(
            r#"
            [[routes]]
            path = "blog/{slug}"
            methods = ["get"]
            view = "post"
            name = "blog.post"

            [[routes]]
            path = "api/"
            include = [
                { path = "/users/{id}", controller = ["Users", "show"], args = { fmt = "json" } },
                { property = { api_version = "2" } },
            ]
            "#,
        )
        .unwrap();

        let table = build_table(&config, Path::new(".")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.property("api_version"), Some("2"));

        let m = table.match_parts("GET", "", false, "/api/users/5").unwrap();
        assert_eq!(m.target(), &Target::controller("Users", "show"));
        assert_eq!(m.arg("id"), Some("5"));
        assert_eq!(m.arg("fmt"), Some("json"));

        let m = table.match_parts("GET", "", false, "blog/hi").unwrap();
        assert_eq!(m.name(), Some("blog.post"));
        assert!(table.match_parts("POST", "", false, "blog/hi").is_none());
    }

    #[test]
    fn test_validation_error_surfaces() {
        let err = parse_config("[[routes]]\npath = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: routes[0]"));
    }

    #[test]
    fn test_invalid_pattern_fails_build() {
        let config = parse_config("[[routes]]\npath = \"a/{1}\"\nview = \"v\"\n").unwrap();
        let err = build_table(&config, Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Routing(RoutingError::InvalidPattern { .. })));
    }

    #[test]
    fn test_load_table_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[[routes]]\npath = \"\"\ncontroller = \"Home\"").unwrap();

        let (_, table) = load_table(&path).unwrap();
        let m = table.match_parts("GET", "", false, "/").unwrap();
        assert_eq!(m.target(), &Target::controller("Home", "default"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
