//! Routing engine.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Rule[] (possibly nested via include)
//!     → rule.rs (flatten depth-first, prefix paths)
//!     → pattern.rs (compile each template)
//!     → table.rs (freeze as immutable RuleTable)
//!
//! Incoming Request (method, host, ajax, decoded path)
//!     → request.rs (plain attributes)
//!     → table.rs (linear scan, first match wins)
//!     → target.rs (substitute {vars} in string targets)
//!     → Return: MatchedRoute or None
//! ```
//!
//! # Design Decisions
//! - Declaration order is match priority; no sorting, no index
//! - Tables are immutable; reload swaps a new one in (shared.rs)
//! - No runtime errors: a miss is `None`

pub mod error;
pub mod matched;
pub mod pattern;
pub mod request;
pub mod rule;
pub mod shared;
pub mod table;
pub mod target;

pub use error::{RoutingError, RoutingResult};
pub use matched::MatchedRoute;
pub use pattern::CompiledPattern;
pub use request::RouteRequest;
pub use rule::{Ajax, FlatRule, Flattened, RouteArgs, Rule, RuleLocator, RuleSource};
pub use shared::SharedRuleTable;
pub use table::RuleTable;
pub use target::{Callable, Target, TargetType};
