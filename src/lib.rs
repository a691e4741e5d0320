//! PID 1 zombie reaper test harness library.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod reaper;
pub mod workers;

pub use config::{HarnessConfig, ReapConfig};
pub use lifecycle::{ReaperMode, Supervisor};
pub use reaper::{ReapEngine, ReapStatus, SignalReaper};
