//! Shared utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use route_rules::routing::{MatchedRoute, RuleTable};

/// A temporary directory holding a route file and its include sources.
#[allow(dead_code)]
pub struct RouteFixture {
    pub dir: TempDir,
    staging: TempDir,
}

#[allow(dead_code)]
impl RouteFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            staging: tempfile::tempdir().unwrap(),
        }
    }

    /// Write `content` to `name` under the fixture directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Atomically replace `name` by renaming a fully written file over it,
    /// so watchers never observe a half-written file.
    pub fn replace(&self, name: &str, content: &str) -> PathBuf {
        let staged = self.staging.path().join(name.replace('/', "_"));
        fs::write(&staged, content).unwrap();
        let path = self.dir.path().join(name);
        fs::rename(&staged, &path).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Match a plain GET request without host or AJAX header.
#[allow(dead_code)]
pub fn get(table: &RuleTable, path: &str) -> Option<MatchedRoute> {
    table.match_parts("GET", "", false, path)
}
