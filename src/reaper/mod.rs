//! Zombie reaping subsystem.
//!
//! # Data Flow
//! ```text
//! SIGCHLD
//!     → engine.rs (waitpid pass on a blocking thread)
//!     → status.rs Notifier
//!         → on_reap callback (synchronous)
//!         → bounded status channel → drain.rs (log)
//! ```
//!
//! # Design Decisions
//! - The engine sits behind `ReapEngine` so the supervisor can be driven by a fake
//! - Both sinks see every event; there is no ordering between them
//! - A slow consumer delays notifications, never the reap loop

pub mod drain;
pub mod engine;
pub mod status;

pub use drain::drain;
pub use engine::{ReapEngine, ReapError, SignalReaper};
pub use status::{Notifier, ReapStatus};
