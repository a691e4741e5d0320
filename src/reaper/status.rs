//! Reap notifications.

use std::fmt;

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::config::ReapCallback;
use crate::observability::metrics;

/// Exit status of one reaped child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapStatus {
    pub pid: Pid,
    /// Exit code for a normal exit, -1 otherwise.
    pub exit_code: i32,
    pub wait_status: WaitStatus,
}

impl ReapStatus {
    /// Build a status from a `waitpid` result. `None` for results that
    /// carry no pid (`StillAlive`).
    pub fn from_wait_status(wait_status: WaitStatus) -> Option<Self> {
        let pid = wait_status.pid()?;
        let exit_code = match wait_status {
            WaitStatus::Exited(_, code) => code,
            _ => -1,
        };
        Some(Self {
            pid,
            exit_code,
            wait_status,
        })
    }
}

impl fmt::Display for ReapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pid={} exit_code={} status={:?}",
            self.pid, self.exit_code, self.wait_status
        )
    }
}

/// Fans a reap event out to the callback and the status channel.
///
/// Delivery never blocks the caller. A full channel hands the send to a
/// detached task on `handle`, so events are delayed but not dropped.
#[derive(Clone)]
pub struct Notifier {
    on_reap: Option<ReapCallback>,
    status_tx: Option<mpsc::Sender<ReapStatus>>,
    handle: Handle,
}

impl Notifier {
    pub fn new(
        on_reap: Option<ReapCallback>,
        status_tx: Option<mpsc::Sender<ReapStatus>>,
        handle: Handle,
    ) -> Self {
        Self {
            on_reap,
            status_tx,
            handle,
        }
    }

    pub fn notify(&self, status: ReapStatus) {
        metrics::record_reaped();

        if let Some(on_reap) = &self.on_reap {
            on_reap(status.pid, status.wait_status);
        }

        let Some(tx) = &self.status_tx else {
            return;
        };
        match tx.try_send(status) {
            Ok(()) => {}
            Err(TrySendError::Full(status)) => {
                tracing::debug!(pid = %status.pid, "Status channel full, deferring notification");
                let tx = tx.clone();
                self.handle.spawn(async move {
                    let _ = tx.send(status).await;
                });
            }
            Err(TrySendError::Closed(status)) => {
                tracing::debug!(pid = %status.pid, "Status channel closed, notification dropped");
            }
        }
    }
}
