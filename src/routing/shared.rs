//! Hot-swappable handle to the live rule table.
//!
//! # Design Decisions
//! - Readers load an `Arc<RuleTable>` snapshot without locking
//! - Reload builds a brand-new table and swaps the pointer atomically
//! - A table is never mutated after it is published

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::routing::matched::MatchedRoute;
use crate::routing::request::RouteRequest;
use crate::routing::table::RuleTable;

/// Shared, atomically replaceable rule table.
#[derive(Debug)]
pub struct SharedRuleTable {
    current: ArcSwap<RuleTable>,
}

impl SharedRuleTable {
    pub fn new(table: RuleTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// Snapshot of the current table.
    pub fn load(&self) -> Arc<RuleTable> {
        self.current.load_full()
    }

    /// Publish a new table. In-flight matches keep their old snapshot.
    pub fn replace(&self, table: RuleTable) {
        let rules = table.len();
        self.current.store(Arc::new(table));
        tracing::info!(rules, "Rule table swapped");
    }

    pub fn match_request(&self, req: &RouteRequest<'_>) -> Option<MatchedRoute> {
        self.current.load().match_request(req)
    }
}

impl Default for SharedRuleTable {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}
