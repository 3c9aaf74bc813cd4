//! Route file configuration.
//!
//! # Data Flow
//! ```text
//! route file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → loader.rs (RuleDef → Rule)
//!     → RuleTable (named includes resolved by locator.rs)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs builds a brand-new RuleTable
//!     → sent to the owner, who swaps it into a SharedRuleTable
//! ```
//!
//! # Design Decisions
//! - A failed reload never replaces the live table
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks
//! - Callable targets are code-only; files declare controllers and views

pub mod loader;
pub mod locator;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{build_table, load_config, load_table, ConfigError};
pub use locator::FileLocator;
pub use schema::{ObservabilityConfig, RoutesConfig, RuleDef};
