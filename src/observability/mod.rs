//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / config produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (match counters, table size gauge)
//!
//! Consumers:
//!     → stderr (pretty or compact)
//!     → any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Match hits and misses log at debug level; the hot path stays quiet at info
//! - Metrics are cheap facade calls

pub mod logging;
pub mod metrics;
