//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//! ```
//!
//! # Design Decisions
//! - Log lines are the harness's only user-visible output
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
