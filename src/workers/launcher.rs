//! Worker launching.
//!
//! # Responsibilities
//! - Resolve the worker script next to the running executable
//! - Start it with the worker count and inherited stdout/stderr
//! - Release the child immediately; the reaper collects it later

use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::config::HarnessConfig;
use crate::observability::metrics;

/// Errors that skip a worker launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("cannot resolve executable directory: {0}")]
    ExeDir(std::io::Error),

    #[error("executable path {} has no parent directory", .0.display())]
    NoParent(PathBuf),

    #[error("failed to start {}: {}", .script.display(), .source)]
    Spawn {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A worker tree root that was started and released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedWorker {
    pub pid: u32,
    pub script: PathBuf,
    /// Worker count handed to the script.
    pub workers: u32,
}

/// Something that can start one worker tree.
pub trait Launch: Send + Sync {
    fn launch(&self) -> Result<LaunchedWorker, LaunchError>;

    /// Launch, logging the result. Errors are not propagated.
    fn start_workers(&self) -> bool {
        match self.launch() {
            Ok(worker) => {
                metrics::record_worker_launch(true);
                tracing::info!(
                    pid = worker.pid,
                    script = %worker.script.display(),
                    workers = worker.workers,
                    "Started worker"
                );
                true
            }
            Err(e) => {
                metrics::record_worker_launch(false);
                tracing::error!(error = %e, "Worker launch skipped");
                false
            }
        }
    }
}

/// Launches the external worker script.
#[derive(Debug, Clone)]
pub struct ScriptLauncher {
    script: PathBuf,
    worker_count: u32,
}

impl ScriptLauncher {
    /// `script` is resolved against the executable's directory when relative.
    pub fn new(script: impl Into<PathBuf>, worker_count: u32) -> Self {
        Self {
            script: script.into(),
            worker_count,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.worker_script.clone(), config.worker_count)
    }

    /// Absolute path of the script that will be started.
    pub fn script_path(&self) -> Result<PathBuf, LaunchError> {
        if self.script.is_absolute() {
            return Ok(self.script.clone());
        }
        Ok(exe_dir()?.join(&self.script))
    }
}

impl Launch for ScriptLauncher {
    fn launch(&self) -> Result<LaunchedWorker, LaunchError> {
        let script = self.script_path()?;
        let child = Command::new(&script)
            .arg(self.worker_count.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                script: script.clone(),
                source,
            })?;

        // Dropping a std Child neither kills nor waits for it.
        Ok(LaunchedWorker {
            pid: child.id(),
            script,
            workers: self.worker_count,
        })
    }
}

fn exe_dir() -> Result<PathBuf, LaunchError> {
    let exe = std::env::current_exe().map_err(LaunchError::ExeDir)?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(LaunchError::NoParent(exe)),
    }
}
