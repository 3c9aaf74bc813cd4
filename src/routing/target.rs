//! Dispatch targets.
//!
//! A target is what a matched rule resolves to. The engine never invokes it;
//! an external dispatcher does, using the matched arguments.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Method name used when a controller is given without one.
pub const DEFAULT_METHOD: &str = "default";

/// Kind of dispatch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    Controller,
    Callable,
    View,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Controller => "controller",
            TargetType::Callable => "callable",
            TargetType::View => "view",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque invocable reference.
///
/// The engine only carries it; the dispatcher downcasts it to whatever
/// handler type it registered.
#[derive(Clone)]
pub struct Callable {
    label: String,
    handler: Arc<dyn Any + Send + Sync>,
}

impl Callable {
    pub fn new<T: Any + Send + Sync>(label: impl Into<String>, handler: T) -> Self {
        Self {
            label: label.into(),
            handler: Arc::new(handler),
        }
    }

    /// Human-readable label used in diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handler.downcast_ref::<T>()
    }

    /// Returns true if both values share the same handler allocation.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("label", &self.label).finish()
    }
}

/// Where a matched request is dispatched to.
#[derive(Debug, Clone)]
pub enum Target {
    Controller { class: String, method: String },
    Callable(Callable),
    View(String),
}

impl Target {
    pub fn controller(class: impl Into<String>, method: impl Into<String>) -> Self {
        Target::Controller {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn view(name: impl Into<String>) -> Self {
        Target::View(name.into())
    }

    pub fn callable<T: Any + Send + Sync>(label: impl Into<String>, handler: T) -> Self {
        Target::Callable(Callable::new(label, handler))
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            Target::Controller { .. } => TargetType::Controller,
            Target::Callable(_) => TargetType::Callable,
            Target::View(_) => TargetType::View,
        }
    }

    /// Substitute `{key}` placeholders in string-valued targets.
    ///
    /// Controller class and method and view names are rewritten; callables
    /// are returned as-is. Unknown keys stay in place literally.
    pub fn resolve(&self, args: &BTreeMap<String, String>) -> Target {
        match self {
            Target::Controller { class, method } => Target::Controller {
                class: substitute(class, args),
                method: substitute(method, args),
            },
            Target::View(name) => Target::View(substitute(name, args)),
            Target::Callable(callable) => Target::Callable(callable.clone()),
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Target::Controller { class, method },
                Target::Controller {
                    class: other_class,
                    method: other_method,
                },
            ) => class == other_class && method == other_method,
            (Target::View(a), Target::View(b)) => a == b,
            (Target::Callable(a), Target::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Controller { class, method } => write!(f, "{class}::{method}"),
            Target::Callable(callable) => f.write_str(callable.label()),
            Target::View(name) => f.write_str(name),
        }
    }
}

/// A bare string names a controller class with the default method.
impl From<&str> for Target {
    fn from(class: &str) -> Self {
        Target::controller(class, DEFAULT_METHOD)
    }
}

impl From<String> for Target {
    fn from(class: String) -> Self {
        Target::controller(class, DEFAULT_METHOD)
    }
}

impl<C: Into<String>, M: Into<String>> From<(C, M)> for Target {
    fn from((class, method): (C, M)) -> Self {
        Target::controller(class, method)
    }
}

impl From<Callable> for Target {
    fn from(callable: Callable) -> Self {
        Target::Callable(callable)
    }
}

/// Replace every `{key}` with its value from `args` in a single pass.
///
/// Replacement text is never rescanned.
pub fn substitute(source: &str, args: &BTreeMap<String, String>) -> String {
    if args.is_empty() || !source.contains('{') {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let replaced = tail.find('}').and_then(|close| {
            args.get(&tail[1..close]).map(|value| (value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute() {
        let a = args(&[("id", "42")]);
        assert_eq!(substitute("/profile/{id}", &a), "/profile/42");
        assert_eq!(substitute("/profile/{missing}", &a), "/profile/{missing}");
        assert_eq!(substitute("{id}-{id}", &a), "42-42");
        assert_eq!(substitute("{{id}}", &a), "{42}");
        assert_eq!(substitute("open {id", &a), "open {id");
    }

    #[test]
    fn test_substitute_does_not_rescan() {
        let a = args(&[("a", "{b}"), ("b", "x")]);
        assert_eq!(substitute("{a}", &a), "{b}");
    }

    #[test]
    fn test_substitute_multibyte() {
        let a = args(&[("nombre", "año")]);
        assert_eq!(substitute("páginas/{nombre}/ñ", &a), "páginas/año/ñ");
    }

    #[test]
    fn test_target_from_shapes() {
        assert_eq!(Target::from("Home"), Target::controller("Home", "default"));
        assert_eq!(
            Target::from(("Blog", "show")),
            Target::controller("Blog", "show")
        );
        let callable = Callable::new("hello", 7u32);
        let target = Target::from(callable.clone());
        assert_eq!(target.target_type(), TargetType::Callable);
        assert_eq!(target, Target::Callable(callable));
    }

    #[test]
    fn test_resolve() {
        let a = args(&[("section", "news"), ("action", "list")]);
        assert_eq!(
            Target::view("pages/{section}").resolve(&a),
            Target::view("pages/news")
        );
        assert_eq!(
            Target::controller("App\\{section}", "{action}").resolve(&a),
            Target::controller("App\\news", "list")
        );

        let callable = Target::callable("cb", |x: u8| x + 1);
        assert_eq!(callable.resolve(&a), callable);
    }

    #[test]
    fn test_callable_downcast() {
        let callable = Callable::new("answer", 42i64);
        assert_eq!(callable.downcast_ref::<i64>(), Some(&42));
        assert!(callable.downcast_ref::<String>().is_none());
        assert_eq!(format!("{callable:?}"), "Callable { label: \"answer\" }");
    }

    #[test]
    fn test_display() {
        assert_eq!(Target::controller("Blog", "show").to_string(), "Blog::show");
        assert_eq!(Target::view("post").to_string(), "post");
        assert_eq!(TargetType::View.to_string(), "view");
    }
}
