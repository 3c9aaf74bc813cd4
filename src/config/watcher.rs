//! Route file watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::{include_dir, load_table};
use crate::routing::RuleTable;

/// Watches a route file (and its include directory) and rebuilds the
/// whole table on change.
pub struct RouteFileWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RuleTable>,
}

impl RouteFileWatcher {
    /// Create a new RouteFileWatcher.
    ///
    /// Returns the watcher and a receiver for freshly built tables.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RuleTable>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread. Drop the returned watcher to stop.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Route file change detected, rebuilding table...");
                        match load_table(&path) {
                            Ok((_, table)) => {
                                let _ = tx.send(table);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to rebuild rule table: {}. Keeping current table.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Directories rather than the file itself, so default-dir includes
        // and editors that replace files by rename are both seen.
        let base = self.base_dir();
        watcher.watch(&base, RecursiveMode::NonRecursive)?;

        if let Some(dir) = self.include_dir(&base) {
            if dir.is_dir() {
                watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            }
        }

        tracing::info!(path = ?self.path, "Route file watcher started");
        Ok(watcher)
    }

    fn base_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Include directory, when it differs from the route file's directory.
    fn include_dir(&self, base: &Path) -> Option<PathBuf> {
        let config = crate::config::loader::load_config(&self.path).ok()?;
        let dir = include_dir(&config, base);
        (dir.as_path() != base).then_some(dir)
    }
}

