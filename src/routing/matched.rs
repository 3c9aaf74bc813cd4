//! Result of a successful match.

use std::fmt;
use std::sync::Arc;

use crate::routing::rule::{FlatRule, RouteArgs};
use crate::routing::target::{Target, TargetType};

/// A resolved route, ready for an external dispatcher.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    rule: Arc<FlatRule>,
    target: Target,
    args: RouteArgs,
}

impl MatchedRoute {
    pub(crate) fn new(rule: Arc<FlatRule>, target: Target, args: RouteArgs) -> Self {
        Self { rule, target, args }
    }

    pub fn name(&self) -> Option<&str> {
        self.rule.name()
    }

    /// The table record that matched.
    pub fn rule(&self) -> &FlatRule {
        &self.rule
    }

    pub fn target_type(&self) -> TargetType {
        self.target.target_type()
    }

    /// Target with `{key}` placeholders substituted.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Path variables merged over the rule's static arguments.
    pub fn args(&self) -> &RouteArgs {
        &self.args
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }

    pub fn into_parts(self) -> (Target, RouteArgs) {
        (self.target, self.args)
    }
}

/// Renders the originating rule: `GET 'blog/{slug}' -> VIEW post (blog.post)`.
impl fmt::Display for MatchedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.rule, f)
    }
}
