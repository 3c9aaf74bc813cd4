//! URL routing-rule engine library

pub mod config;
pub mod observability;
pub mod routing;

pub use config::schema::RoutesConfig;
pub use routing::{MatchedRoute, RouteRequest, Rule, RuleTable, SharedRuleTable, Target};
