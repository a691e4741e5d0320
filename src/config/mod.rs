//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! /reaper/config/reaper.json (optional)
//!     → loader.rs (open & decode onto defaults)
//!     → ReapConfig (observers attached by the supervisor)
//!     → moved into the reap loop, immutable from then on
//!
//! HarnessConfig::default()
//!     → supervisor, launcher, probe
//! ```
//!
//! # Design Decisions
//! - Every JSON field has a default, so `{}` is a valid config
//! - Observers are never deserialized
//! - A missing or broken file is not an error for the harness, only for the loader

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{HarnessConfig, ReapCallback, ReapConfig, REAPER_JSON_CONFIG};
