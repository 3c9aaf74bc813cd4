//! Rule definitions and flattening.
//!
//! # Responsibilities
//! - Fluent construction of a single route (`Rule::get("blog/{slug}", ...)`)
//! - Nesting via `include`, either inline rules or a named source
//! - Flattening a rule tree into ordered, matcher-ready `FlatRule`s
//!
//! # Design Decisions
//! - Flattening is a pure function of the tree; rules are never mutated by it
//! - Depth-first, declaration order: this order is match priority
//! - Only the path is inherited by included rules
//! - Named sources are resolved through an injected `RuleLocator`

use std::collections::BTreeMap;
use std::fmt;

use crate::routing::error::{RoutingError, RoutingResult};
use crate::routing::pattern::{join_paths, trim_path, CompiledPattern};
use crate::routing::target::{Callable, Target, TargetType, DEFAULT_METHOD};

/// Static or captured route arguments.
pub type RouteArgs = BTreeMap<String, String>;

/// AJAX constraint of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ajax {
    /// Only AJAX requests match.
    Required,
    /// Only non-AJAX requests match.
    Forbidden,
    #[default]
    Any,
}

impl Ajax {
    pub fn accepts(&self, is_ajax: bool) -> bool {
        match self {
            Ajax::Required => is_ajax,
            Ajax::Forbidden => !is_ajax,
            Ajax::Any => true,
        }
    }
}

impl From<bool> for Ajax {
    fn from(required: bool) -> Self {
        if required {
            Ajax::Required
        } else {
            Ajax::Forbidden
        }
    }
}

/// Resolves named include sources into rules.
pub trait RuleLocator: Send + Sync {
    /// Load the rules stored under `source`.
    ///
    /// Must return `RoutingError::MissingIncludeSource` if nothing is found.
    fn locate(&self, source: &str) -> RoutingResult<Vec<Rule>>;
}

/// Rules attached through `Rule::include`.
#[derive(Debug, Clone)]
pub enum RuleSource {
    Rules(Vec<Rule>),
    Named(String),
}

impl From<Vec<Rule>> for RuleSource {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSource::Rules(rules)
    }
}

impl From<Rule> for RuleSource {
    fn from(rule: Rule) -> Self {
        RuleSource::Rules(vec![rule])
    }
}

impl From<&str> for RuleSource {
    fn from(name: &str) -> Self {
        RuleSource::Named(name.to_string())
    }
}

impl From<String> for RuleSource {
    fn from(name: String) -> Self {
        RuleSource::Named(name)
    }
}

/// A declarative route definition.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    methods: Vec<String>,
    hostname: Option<String>,
    ajax: Ajax,
    path: String,
    name: Option<String>,
    target: Option<Target>,
    args: RouteArgs,
    properties: BTreeMap<String, String>,
    included: Vec<RuleSource>,
}

impl Rule {
    /// A rule for any method.
    pub fn path(path: &str, target: impl Into<Target>) -> Self {
        Self::group(path).target(target)
    }

    pub fn get(path: &str, target: impl Into<Target>) -> Self {
        Self::path(path, target).method(["GET"])
    }

    pub fn post(path: &str, target: impl Into<Target>) -> Self {
        Self::path(path, target).method(["POST"])
    }

    pub fn put(path: &str, target: impl Into<Target>) -> Self {
        Self::path(path, target).method(["PUT"])
    }

    pub fn patch(path: &str, target: impl Into<Target>) -> Self {
        Self::path(path, target).method(["PATCH"])
    }

    pub fn delete(path: &str, target: impl Into<Target>) -> Self {
        Self::path(path, target).method(["DELETE"])
    }

    pub fn options(path: &str, target: impl Into<Target>) -> Self {
        Self::path(path, target).method(["OPTIONS"])
    }

    /// GET rule for the empty path.
    pub fn default_route(target: impl Into<Target>) -> Self {
        Self::get("", target)
    }

    /// A rule without target, meant to carry `include`d rules.
    pub fn group(path: &str) -> Self {
        Self {
            path: trim_path(path).to_string(),
            ..Self::default()
        }
    }

    /// A non-routable `name = value` declaration.
    pub fn property(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut rule = Self::default();
        rule.properties.insert(name.into(), value.into());
        rule
    }

    /// Replace the allowed methods. An empty set allows any method.
    pub fn method<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods.clear();
        for method in methods {
            let method = method.as_ref().to_ascii_uppercase();
            if !self.methods.contains(&method) {
                self.methods.push(method);
            }
        }
        self
    }

    /// Alias of [`Rule::method`].
    pub fn methods<I, S>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.method(methods)
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// `true` requires an AJAX request, `false` forbids one.
    ///
    /// `false` is a real constraint, not the absence of one: an AJAX request
    /// never matches a rule built with `ajax(false)`. Leave the setter out
    /// (`Ajax::Any`) to accept both kinds of request.
    pub fn ajax(mut self, ajax: impl Into<Ajax>) -> Self {
        self.ajax = ajax.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add static arguments. Later calls win over earlier ones.
    pub fn args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in args {
            self.args.insert(key.into(), value.into());
        }
        self
    }

    /// Set the target, dispatching on its shape (see `From` impls on [`Target`]).
    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn controller(self, class: impl Into<String>, method: Option<&str>) -> Self {
        self.target(Target::controller(class, method.unwrap_or(DEFAULT_METHOD)))
    }

    pub fn callable(self, callable: Callable) -> Self {
        self.target(Target::Callable(callable))
    }

    pub fn view(self, name: impl Into<String>) -> Self {
        self.target(Target::view(name))
    }

    /// Attach child rules whose paths are prefixed with this rule's path.
    ///
    /// Named sources are not resolved until the rule is flattened.
    pub fn include(mut self, source: impl Into<RuleSource>) -> Self {
        self.included.push(source.into());
        self
    }

    pub fn get_path(&self) -> &str {
        &self.path
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get_target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn is_group(&self) -> bool {
        !self.included.is_empty()
    }

    /// Flatten this rule tree into matcher-ready entries.
    pub fn flatten(&self, locator: Option<&dyn RuleLocator>) -> RoutingResult<Vec<Flattened>> {
        let mut out = Vec::new();
        self.flatten_into("", locator, &mut out)?;
        Ok(out)
    }

    fn flatten_into(
        &self,
        prefix: &str,
        locator: Option<&dyn RuleLocator>,
        out: &mut Vec<Flattened>,
    ) -> RoutingResult<()> {
        let path = join_paths(prefix, &self.path);

        if self.is_group() {
            for source in &self.included {
                match source {
                    RuleSource::Rules(rules) => {
                        for rule in rules {
                            rule.flatten_into(&path, locator, out)?;
                        }
                    }
                    RuleSource::Named(name) => {
                        let locator =
                            locator.ok_or_else(|| RoutingError::NoLocator(name.clone()))?;
                        let rules = locator.locate(name)?;
                        tracing::debug!(source = %name, prefix = %path, rules = rules.len(), "Resolved include");
                        for rule in &rules {
                            rule.flatten_into(&path, Some(locator), out)?;
                        }
                    }
                }
            }
            return Ok(());
        }

        if !self.properties.is_empty() {
            out.push(Flattened::Property(self.properties.clone()));
            return Ok(());
        }

        let target = self
            .target
            .clone()
            .ok_or_else(|| RoutingError::MissingTarget { path: path.clone() })?;

        out.push(Flattened::Rule(FlatRule {
            pattern: CompiledPattern::compile(&path)?,
            methods: self.methods.clone(),
            hostname: self.hostname.clone(),
            ajax: self.ajax,
            path,
            name: self.name.clone(),
            target,
            args: self.args.clone(),
        }));
        Ok(())
    }
}

/// Output of flattening: a routable record or a property declaration.
#[derive(Debug, Clone)]
pub enum Flattened {
    Rule(FlatRule),
    Property(BTreeMap<String, String>),
}

/// A matcher-ready rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct FlatRule {
    methods: Vec<String>,
    hostname: Option<String>,
    ajax: Ajax,
    path: String,
    pattern: CompiledPattern,
    name: Option<String>,
    target: Target,
    args: RouteArgs,
}

impl FlatRule {
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn ajax(&self) -> Ajax {
        self.ajax
    }

    /// Full path template, prefixes included.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn target_type(&self) -> TargetType {
        self.target.target_type()
    }

    pub fn args(&self) -> &RouteArgs {
        &self.args
    }

    /// Check method, hostname and AJAX constraints.
    pub fn accepts(&self, method: &str, hostname: &str, is_ajax: bool) -> bool {
        if !self.methods.is_empty() && !self.methods.iter().any(|m| m.eq_ignore_ascii_case(method)) {
            return false;
        }
        if let Some(expected) = &self.hostname {
            if expected != hostname {
                return false;
            }
        }
        self.ajax.accepts(is_ajax)
    }
}

impl fmt::Display for FlatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.methods.is_empty() {
            f.write_str("ANY")?;
        } else {
            f.write_str(&self.methods.join(","))?;
        }
        write!(
            f,
            " '{}' -> {} {}",
            self.path,
            self.target_type().as_str().to_uppercase(),
            self.target
        )?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}
