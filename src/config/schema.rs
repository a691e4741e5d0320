//! Configuration schema definitions.
//!
//! `ReapConfig` is what the reaping engine runs with. Its plain fields can be
//! overlaid from a JSON file; the observers (`on_reap`, `status_tx`) are
//! skipped by serde and only ever attached in code.
//!
//! `HarnessConfig` holds the harness's own knobs and is built in code.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::reaper::ReapStatus;

/// Well-known location of the optional reaper configuration file.
pub const REAPER_JSON_CONFIG: &str = "/reaper/config/reaper.json";

/// Callback invoked synchronously for every reaped child.
pub type ReapCallback = Arc<dyn Fn(Pid, WaitStatus) + Send + Sync>;

/// Configuration of a reap loop.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ReapConfig {
    /// `waitpid` selector: -1 for any child, 0 for the caller's process group,
    /// `< -1` for the group `|pid|`, `> 0` for one process.
    #[serde(rename = "Pid")]
    pub pid: i32,

    /// Raw `waitpid` option bits (e.g. `WNOHANG`, `WUNTRACED`).
    #[serde(rename = "Options")]
    pub options: i32,

    /// Run the loop even when this process is not PID 1.
    #[serde(rename = "DisablePid1Check")]
    pub disable_pid1_check: bool,

    /// Register as a child subreaper before reaping.
    #[serde(rename = "EnableChildSubreaper")]
    pub enable_child_subreaper: bool,

    #[serde(skip)]
    pub on_reap: Option<ReapCallback>,

    #[serde(skip)]
    pub status_tx: Option<mpsc::Sender<ReapStatus>>,
}

impl Default for ReapConfig {
    fn default() -> Self {
        Self {
            pid: -1,
            options: 0,
            disable_pid1_check: false,
            enable_child_subreaper: false,
            on_reap: None,
            status_tx: None,
        }
    }
}

impl ReapConfig {
    /// Attach the observers. Any previous observers are replaced.
    pub fn with_observers(
        mut self,
        on_reap: ReapCallback,
        status_tx: mpsc::Sender<ReapStatus>,
    ) -> Self {
        self.on_reap = Some(on_reap);
        self.status_tx = Some(status_tx);
        self
    }

    /// True when at least one observer will see reap events.
    pub fn is_observed(&self) -> bool {
        self.on_reap.is_some() || self.status_tx.is_some()
    }
}

impl fmt::Debug for ReapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReapConfig")
            .field("pid", &self.pid)
            .field("options", &self.options)
            .field("disable_pid1_check", &self.disable_pid1_check)
            .field("enable_child_subreaper", &self.enable_child_subreaper)
            .field("on_reap", &self.on_reap.is_some())
            .field("status_tx", &self.status_tx.is_some())
            .finish()
    }
}

/// Harness settings.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Path of the optional JSON reaper configuration.
    pub config_path: PathBuf,

    /// Capacity of the reap notification channel.
    pub status_capacity: usize,

    /// Worker script path, relative to the executable's directory.
    pub worker_script: PathBuf,

    /// Argument handed to the worker script.
    pub worker_count: u32,

    /// Program and arguments of the orphan probe's child.
    pub probe_program: String,
    pub probe_args: Vec<String>,

    /// How long the probe waits before its own explicit wait.
    /// Must exceed the child's runtime.
    pub probe_grace: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(REAPER_JSON_CONFIG),
            status_capacity: 42,
            worker_script: PathBuf::from("bin/script.sh"),
            worker_count: 3,
            probe_program: "sleep".to_string(),
            probe_args: vec!["1".to_string()],
            probe_grace: Duration::from_secs(4),
        }
    }
}
