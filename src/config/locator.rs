//! File-backed include sources.
//!
//! `include = "admin"` resolves to `<include_dir>/admin.toml`; a name that
//! already carries an extension is used as a relative path verbatim.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::loader::{join_errors, rules_from_defs};
use crate::config::schema::IncludeFile;
use crate::config::validation::validate_rules;
use crate::routing::{RoutingError, RoutingResult, Rule, RuleLocator};

/// Resolves named includes to TOML files under a base directory.
#[derive(Debug, Clone)]
pub struct FileLocator {
    base_dir: PathBuf,
}

impl FileLocator {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File a source name maps to.
    pub fn resolve(&self, source: &str) -> PathBuf {
        if Path::new(source).extension().is_some() {
            self.base_dir.join(source)
        } else {
            self.base_dir.join(format!("{source}.toml"))
        }
    }
}

impl RuleLocator for FileLocator {
    fn locate(&self, source: &str) -> RoutingResult<Vec<Rule>> {
        let path = self.resolve(source);
        if !path.is_file() {
            return Err(RoutingError::MissingIncludeSource(source.to_string()));
        }

        let invalid = |reason: String| RoutingError::InvalidSource {
            source_name: source.to_string(),
            reason,
        };

        let content = fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
        let file: IncludeFile = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        validate_rules(&file.routes, "routes").map_err(|errors| invalid(join_errors(&errors)))?;

        tracing::debug!(source = %source, path = ?path, rules = file.routes.len(), "Loaded include source");
        Ok(rules_from_defs(&file.routes))
    }
}
