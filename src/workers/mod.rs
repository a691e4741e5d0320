//! Worker processes.
//!
//! # Data Flow
//! ```text
//! launcher.rs:
//!     exe dir + bin/script.sh N → spawn → released (reaper collects it)
//!
//! probe.rs:
//!     sleep 1 (own group or not) → grace delay → own wait → verdict
//! ```
//!
//! # Design Decisions
//! - std::process only; tokio's child handling would reap on its own
//! - Nothing tracks a worker after spawn

pub mod launcher;
pub mod probe;

pub use launcher::{Launch, LaunchError, LaunchedWorker, ScriptLauncher};
pub use probe::{classify, OrphanProbe, OrphanTestOutcome, ProbeVerdict};
