//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Supervisor → probes → SIGUSR1 armed → first workers → scaler
//!
//! Supervisor (supervisor.rs):
//!     Config file → configured or fallback reap loop
//!
//! Signals (signals.rs):
//!     SIGUSR1 → launch another worker tree
//! ```
//!
//! # Design Decisions
//! - No graceful shutdown: background loops end with the process
//! - The signal is armed before any worker exists

pub mod signals;
pub mod startup;
pub mod supervisor;

pub use signals::{Scaler, SignalStream};
pub use supervisor::{ReaperMode, Supervisor};
