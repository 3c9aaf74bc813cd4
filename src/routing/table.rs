//! The rule table and request matching.
//!
//! # Responsibilities
//! - Flatten top-level rules into one ordered table
//! - Collect property rules into a side map
//! - Find the first rule satisfying a request
//!
//! # Design Decisions
//! - Built once, read-only afterwards; rebuilding means a new table
//! - Linear scan in declaration order: first match wins, whatever the specificity
//! - Cheap constraint checks (method, host, AJAX) run before the regex

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::observability::metrics;
use crate::routing::error::RoutingResult;
use crate::routing::matched::MatchedRoute;
use crate::routing::pattern::trim_path;
use crate::routing::request::RouteRequest;
use crate::routing::rule::{FlatRule, Flattened, Rule, RuleLocator};

/// An ordered, immutable set of flattened rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Arc<FlatRule>>,
    properties: BTreeMap<String, String>,
}

impl RuleTable {
    /// Build a table from top-level rules, without named includes.
    pub fn new(rules: &[Rule]) -> RoutingResult<Self> {
        Self::with_locator(rules, None)
    }

    /// Build a table, resolving named includes through `locator`.
    ///
    /// Any invalid pattern or missing source aborts the build.
    pub fn with_locator(rules: &[Rule], locator: Option<&dyn RuleLocator>) -> RoutingResult<Self> {
        let mut table = Self::default();

        for rule in rules {
            for entry in rule.flatten(locator)? {
                match entry {
                    Flattened::Rule(flat) => table.rules.push(Arc::new(flat)),
                    // Last write wins on duplicate keys.
                    Flattened::Property(props) => table.properties.extend(props),
                }
            }
        }

        tracing::info!(
            rules = table.rules.len(),
            properties = table.properties.len(),
            "Rule table built"
        );
        metrics::record_table_size(table.rules.len());
        Ok(table)
    }

    /// Flattened rules in match-priority order.
    pub fn rules(&self) -> &[Arc<FlatRule>] {
        &self.rules
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&FlatRule> {
        self.rules
            .iter()
            .find(|r| r.name() == Some(name))
            .map(|r| r.as_ref())
    }

    /// Match a request against the table.
    pub fn match_request(&self, req: &RouteRequest<'_>) -> Option<MatchedRoute> {
        self.match_parts(&req.method, &req.hostname, req.ajax, &req.path)
    }

    /// Match using plain request attributes. `path` must already be decoded.
    pub fn match_parts(
        &self,
        method: &str,
        hostname: &str,
        ajax: bool,
        path: &str,
    ) -> Option<MatchedRoute> {
        let path = trim_path(path);

        for rule in &self.rules {
            if !rule.accepts(method, hostname, ajax) {
                continue;
            }

            let Some(mut args) = rule.pattern().captures(path) else {
                continue;
            };

            // Path variables take precedence over static args.
            for (key, value) in rule.args() {
                args.entry(key.clone()).or_insert_with(|| value.clone());
            }

            let target = rule.target().resolve(&args);

            tracing::debug!(
                method = %method,
                path = %path,
                rule = %rule.path(),
                name = rule.name().unwrap_or(""),
                "Route matched"
            );
            metrics::record_match(true);
            return Some(MatchedRoute::new(Arc::clone(rule), target, args));
        }

        tracing::debug!(method = %method, path = %path, "No route matched");
        metrics::record_match(false);
        None
    }
}
