//! Routing metrics.
//!
//! # Metrics
//! - `route_match_total` (counter): match attempts, labelled `result=hit|miss`
//! - `route_table_rules` (gauge): rules in the most recently built table
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   these calls are no-ops
//! - No exporter is started by this crate

/// Record the outcome of one match attempt.
pub fn record_match(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    ::metrics::counter!("route_match_total", "result" => result).increment(1);
}

/// Record the size of a freshly built table.
pub fn record_table_size(rules: usize) {
    ::metrics::gauge!("route_table_rules").set(rules as f64);
}
