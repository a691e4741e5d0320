//! `testpid1`: exercises a zombie reaper running as PID 1.
//!
//! # Architecture Overview
//!
//! ```text
//!   reaper.json ──▶ Supervisor ──▶ SignalReaper (SIGCHLD → waitpid)
//!                       │                 │
//!                       │                 ├──▶ on_reap callback (log)
//!                       │                 └──▶ status channel ──▶ drain (log)
//!                       │
//!                       └──▶ orphan probes (detached / attached)
//!
//!   SIGUSR1 ──▶ Scaler ──▶ bin/script.sh 3 ──▶ orphaned grandchildren
//! ```
//!
//! Runs until killed.

use reaper_harness::config::HarnessConfig;
use reaper_harness::lifecycle::startup;
use reaper_harness::observability::logging;
use reaper_harness::SignalReaper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!(pid = std::process::id(), "testpid1 v0.1.0 starting");

    startup::run(SignalReaper, HarnessConfig::default()).await?;

    Ok(())
}
