//! Configuration schema definitions.
//!
//! This module defines the structure of a route file. All types derive
//! Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of a route file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutesConfig {
    /// Directory holding named include sources, relative to the route file.
    /// Defaults to the route file's own directory.
    pub include_dir: Option<String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Top-level rules, in priority order.
    pub routes: Vec<RuleDef>,
}

/// Contents of a named include source.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IncludeFile {
    pub routes: Vec<RuleDef>,
}

/// One declarative rule.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RuleDef {
    /// Path template.
    pub path: String,

    /// Allowed methods; empty = any.
    #[serde(alias = "method")]
    pub methods: Vec<String>,

    /// Exact Host header to match.
    pub hostname: Option<String>,

    /// `true` requires AJAX, `false` forbids it, absent = don't care.
    pub ajax: Option<bool>,

    /// Route name.
    pub name: Option<String>,

    /// `"Class"` or `["Class", "method"]`.
    pub controller: Option<ControllerDef>,

    /// View name; may contain `{var}` placeholders.
    pub view: Option<String>,

    /// Inline child rules or the name of an include source.
    pub include: Option<IncludeDef>,

    /// Non-routable `name = value` declarations.
    pub property: Option<BTreeMap<String, String>>,

    /// Static arguments merged under path variables.
    pub args: BTreeMap<String, String>,
}

/// Controller target as written in a route file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ControllerDef {
    Class(String),
    Pair(String, String),
}

/// Include declaration as written in a route file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum IncludeDef {
    Source(String),
    Rules(Vec<RuleDef>),
}

/// Log output style.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output style.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
