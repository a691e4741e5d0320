//! Reaper supervision.
//!
//! Picks the reap mode from the optional config file and starts exactly one
//! reap loop:
//!
//! ```text
//! config decodes  → observers attached → drain spawned → engine.start(config)
//! missing/broken  → engine.reap() (no observers)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use tokio::sync::mpsc;

use crate::config::{load_config, HarnessConfig, ReapCallback};
use crate::reaper::{drain, ReapEngine, ReapStatus};

/// Which reap loop the supervisor started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaperMode {
    /// File config with callback and status channel.
    Configured,
    /// Defaults, nobody notified.
    Fallback,
}

pub struct Supervisor<E> {
    engine: E,
    config_path: PathBuf,
    status_capacity: usize,
    on_reap: ReapCallback,
}

impl<E: ReapEngine> Supervisor<E> {
    pub fn new(engine: E, config: &HarnessConfig) -> Self {
        Self {
            engine,
            config_path: config.config_path.clone(),
            status_capacity: config.status_capacity,
            on_reap: log_on_reap(),
        }
    }

    /// Replace the per-child callback used in configured mode.
    pub fn with_on_reap(mut self, on_reap: ReapCallback) -> Self {
        self.on_reap = on_reap;
        self
    }

    /// Start the reap loop. Returns without waiting for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> ReaperMode {
        let config = match load_config(&self.config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    error = %e,
                    "Reaper config unavailable, using defaults"
                );
                self.engine.reap();
                return ReaperMode::Fallback;
            }
        };

        tracing::info!(path = %self.config_path.display(), config = ?config, "Using reaper config");

        let (status_tx, status_rx) = mpsc::channel(self.status_capacity.max(1));
        let config = config.with_observers(self.on_reap.clone(), status_tx);

        // The drain goes first; the buffer absorbs anything produced before
        // it is scheduled.
        tokio::spawn(drain(status_rx));
        self.engine.start(config);

        ReaperMode::Configured
    }
}

/// Callback that logs every reaped child.
pub fn log_on_reap() -> ReapCallback {
    Arc::new(|pid: Pid, wait_status: WaitStatus| {
        let exit_code = ReapStatus::from_wait_status(wait_status)
            .map(|s| s.exit_code)
            .unwrap_or(-1);
        tracing::info!(pid = %pid, exit_code, "Child process exited");
    })
}
