//! Path template compilation.
//!
//! # Template Syntax
//! - `{name}` captures one segment (no `/`), lazily
//! - `{*name}` captures one or more characters including `/`, lazily
//! - `{*}` matches like `{*name}` without capturing
//! - everything else is literal
//!
//! # Design Decisions
//! - Templates and request paths are both trimmed of `/` on the edges
//! - Compiled regexes use positional groups; names live beside them, so
//!   identifiers are not limited to what the regex engine accepts as group names
//! - Catch-alls need at least one character: `files/{*x}` does not match `files/`
//! - Duplicate names are rejected at compile time
//! - Catch-alls also span newlines (decoded `%0A`)

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use crate::routing::error::{RoutingError, RoutingResult};

/// Placeholder kinds found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placeholder {
    Segment(String),
    CatchAll(String),
    Anonymous,
}

/// A path template compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    regex: Regex,
    variables: Vec<String>,
}

impl CompiledPattern {
    /// Compile a path template. Leading and trailing `/` are ignored.
    pub fn compile(template: &str) -> RoutingResult<Self> {
        let template = trim_path(template);
        let mut source = String::from("(?s)^");
        let mut variables: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            if c != '{' {
                literal.push(c);
                continue;
            }

            let mut body = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == '}' {
                    closed = true;
                    break;
                }
                body.push(next);
            }
            if !closed {
                return Err(invalid(template, format!("unterminated placeholder '{{{body}'")));
            }

            source.push_str(&regex::escape(&literal));
            literal.clear();

            match parse_placeholder(&body).ok_or_else(|| {
                invalid(template, format!("bad identifier '{body}'"))
            })? {
                Placeholder::Segment(name) => {
                    push_variable(template, &mut variables, name)?;
                    source.push_str("([^/]+?)");
                }
                Placeholder::CatchAll(name) => {
                    push_variable(template, &mut variables, name)?;
                    source.push_str("(.+?)");
                }
                Placeholder::Anonymous => source.push_str("(?:.+?)"),
            }
        }

        source.push_str(&regex::escape(&literal));
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| invalid(template, e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            variables,
        })
    }

    /// The trimmed template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Variable names in template order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns true if the template has no placeholders at all.
    pub fn is_static(&self) -> bool {
        self.regex.captures_len() == 1 && !self.template.contains("{*}")
    }

    /// Match a path, trimming its edges first. Returns the captured variables.
    ///
    /// Groups that did not take part in the match are left out of the map.
    pub fn captures(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.regex.captures(trim_path(path))?;
        Some(
            self.variables
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1).map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }

    /// Returns true if the path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(trim_path(path))
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Strip `/` from both ends of a path.
pub fn trim_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Join two path fragments with exactly one `/`, trimming the result.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = trim_path(prefix);
    let path = trim_path(path);
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{path}"),
    }
}

fn parse_placeholder(body: &str) -> Option<Placeholder> {
    match body.strip_prefix('*') {
        Some("") => Some(Placeholder::Anonymous),
        Some(name) if is_identifier(name) => Some(Placeholder::CatchAll(name.to_string())),
        Some(_) => None,
        None if is_identifier(body) => Some(Placeholder::Segment(body.to_string())),
        None => None,
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, with Unicode letters and digits allowed.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn push_variable(template: &str, variables: &mut Vec<String>, name: String) -> RoutingResult<()> {
    if variables.contains(&name) {
        return Err(RoutingError::DuplicateVariable {
            template: template.to_string(),
            name,
        });
    }
    variables.push(name);
    Ok(())
}

fn invalid(template: &str, reason: String) -> RoutingError {
    RoutingError::InvalidPattern {
        template: template.to_string(),
        reason,
    }
}
