//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reaper_harness::config::{HarnessConfig, ReapConfig};
use reaper_harness::reaper::ReapEngine;
use reaper_harness::workers::{Launch, LaunchError, LaunchedWorker};
use tokio::task::JoinHandle;

/// A call recorded by [`FakeEngine`].
#[derive(Debug, Clone)]
pub enum EngineCall {
    Start(ReapConfig),
    Reap,
}

/// Reap engine that records how it was started and does nothing else.
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ReapEngine for FakeEngine {
    fn start(&self, config: ReapConfig) -> JoinHandle<()> {
        self.calls.lock().unwrap().push(EngineCall::Start(config));
        tokio::spawn(async {})
    }

    fn reap(&self) -> JoinHandle<()> {
        self.calls.lock().unwrap().push(EngineCall::Reap);
        tokio::spawn(async {})
    }
}

/// Launcher that counts calls and fails every other one.
#[derive(Clone, Default)]
pub struct FlakyLauncher {
    pub calls: Arc<AtomicUsize>,
}

impl Launch for FlakyLauncher {
    fn launch(&self) -> Result<LaunchedWorker, LaunchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            Ok(LaunchedWorker {
                pid: n as u32 + 1000,
                script: PathBuf::from("/bin/true"),
                workers: 3,
            })
        } else {
            Err(LaunchError::Spawn {
                script: PathBuf::from("/nonexistent"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }
}

/// Write `contents` to a temporary config file.
pub fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Harness config pointing at `path`.
pub fn harness_config(path: impl Into<PathBuf>) -> HarnessConfig {
    HarnessConfig {
        config_path: path.into(),
        ..HarnessConfig::default()
    }
}

/// Poll `f` until it returns true or `timeout` elapses.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, f: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if f() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    f()
}
