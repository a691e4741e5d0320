//! The reap loop.
//!
//! # Responsibilities
//! - Decide whether reaping is allowed (PID 1 check)
//! - Optionally register as a child subreaper
//! - Collect exit statuses on every SIGCHLD and fan them out
//!
//! # Design Decisions
//! - `waitpid` runs on a blocking thread; `Options` may omit `WNOHANG`
//! - One pass at a time; SIGCHLDs arriving during a pass coalesce into the next one
//! - The loop only ends with the process

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::{getpid, Pid};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use crate::config::ReapConfig;
use crate::reaper::status::{Notifier, ReapStatus};

/// Errors that stop a reap loop from starting.
#[derive(Debug, Error)]
pub enum ReapError {
    #[error("failed to subscribe to SIGCHLD: {0}")]
    Signal(std::io::Error),

    #[error("failed to become child subreaper: {0}")]
    Subreaper(std::io::Error),
}

/// Capability to run a reap loop.
///
/// Both entry points return immediately; the loop runs on the returned task.
pub trait ReapEngine: Send + Sync + 'static {
    /// Run a loop with an explicit configuration and its observers.
    fn start(&self, config: ReapConfig) -> JoinHandle<()>;

    /// Reap everything, notify nobody.
    fn reap(&self) -> JoinHandle<()> {
        self.start(ReapConfig::default())
    }
}

/// The real engine: SIGCHLD-driven `waitpid` loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalReaper;

impl ReapEngine for SignalReaper {
    fn start(&self, config: ReapConfig) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = run(config).await {
                tracing::error!(error = %e, "Reaper failed to start");
            }
        })
    }
}

/// Run the reap loop until SIGCHLD delivery ends (in practice, never).
pub async fn run(config: ReapConfig) -> Result<(), ReapError> {
    let pid = getpid();
    if !config.disable_pid1_check && pid.as_raw() != 1 {
        tracing::info!(pid = %pid, "Not running as PID 1, reaper disabled");
        return Ok(());
    }

    if config.enable_child_subreaper {
        set_child_subreaper().map_err(ReapError::Subreaper)?;
        tracing::info!("Registered as child subreaper");
    }

    let mut sigchld = signal(SignalKind::child()).map_err(ReapError::Signal)?;

    let target = Pid::from_raw(config.pid);
    let flags = wait_flags(config.options);
    let observed = config.is_observed();
    let notifier = Notifier::new(config.on_reap, config.status_tx, Handle::current());

    tracing::info!(
        target_pid = config.pid,
        options = config.options,
        observed,
        "Reaper started"
    );

    loop {
        // Children may have exited before SIGCHLD was subscribed, so the
        // first pass runs unconditionally.
        let pass_notifier = notifier.clone();
        let pass = tokio::task::spawn_blocking(move || reap_pass(target, flags, &pass_notifier));
        match pass.await {
            Ok(0) => {}
            Ok(reaped) => tracing::trace!(reaped, "Reap pass finished"),
            Err(e) => tracing::error!(error = %e, "Reap pass aborted"),
        }

        if sigchld.recv().await.is_none() {
            tracing::warn!("SIGCHLD stream ended, reaper exiting");
            return Ok(());
        }
    }
}

/// Collect every currently claimable child matching `target`.
///
/// Returns the number of statuses delivered.
pub fn reap_pass(target: Pid, flags: WaitPidFlag, notifier: &Notifier) -> usize {
    let mut reaped = 0;
    loop {
        match waitpid(target, Some(flags)) {
            Ok(wait_status) => match ReapStatus::from_wait_status(wait_status) {
                Some(status) => {
                    tracing::debug!(
                        pid = %status.pid,
                        exit_code = status.exit_code,
                        "Reaped child"
                    );
                    notifier.notify(status);
                    reaped += 1;
                }
                None => break,
            },
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => break,
            Err(e) => {
                tracing::warn!(error = %e, "waitpid failed");
                break;
            }
        }
    }
    reaped
}

/// Convert raw `Options` bits, dropping (and reporting) any the platform
/// does not know.
pub fn wait_flags(options: i32) -> WaitPidFlag {
    match WaitPidFlag::from_bits(options) {
        Some(flags) => flags,
        None => {
            let flags = WaitPidFlag::from_bits_truncate(options);
            tracing::warn!(
                options,
                unknown = options & !flags.bits(),
                "Ignoring unknown waitpid option bits"
            );
            flags
        }
    }
}

#[cfg(target_os = "linux")]
fn set_child_subreaper() -> std::io::Result<()> {
    // SAFETY: PR_SET_CHILD_SUBREAPER takes a plain integer flag.
    let code = unsafe { libc::prctl(libc::PR_SET_CHILD_SUBREAPER, 1, 0, 0, 0) };
    if code != 0 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
fn set_child_subreaper() -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::wait::WaitStatus;
    use std::process::Command;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_pid1_check_disables_loop() {
        // Test binaries never run as PID 1.
        assert_ne!(getpid().as_raw(), 1);
        let (tx, mut rx) = mpsc::channel(1);
        let on_reap = std::sync::Arc::new(|_: Pid, _: WaitStatus| {});
        let config = ReapConfig::default().with_observers(on_reap, tx);

        run(config).await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_reap_pass_collects_specific_child() {
        let child = Command::new("true").spawn().unwrap();
        let pid = Pid::from_raw(child.id() as i32);

        let (tx, mut rx) = mpsc::channel(4);
        let notifier = Notifier::new(None, Some(tx), Handle::current());

        let pass = tokio::task::spawn_blocking(move || {
            reap_pass(pid, WaitPidFlag::empty(), &notifier)
        });
        let reaped = pass.await.unwrap();

        assert_eq!(reaped, 1);
        let status = rx.recv().await.unwrap();
        assert_eq!(status.pid, pid);
        assert_eq!(status.exit_code, 0);
    }

    #[tokio::test]
    async fn test_reap_pass_nohang_on_running_child() {
        let mut child = Command::new("sleep").arg("1").spawn().unwrap();
        let pid = Pid::from_raw(child.id() as i32);
        let notifier = Notifier::new(None, None, Handle::current());

        assert_eq!(reap_pass(pid, WaitPidFlag::WNOHANG, &notifier), 0);
        assert!(child.wait().unwrap().success());
    }

    #[test]
    fn test_wait_flags_known_bits() {
        assert_eq!(wait_flags(0), WaitPidFlag::empty());
        assert_eq!(wait_flags(libc::WNOHANG), WaitPidFlag::WNOHANG);
        assert_eq!(
            wait_flags(libc::WNOHANG | libc::WUNTRACED),
            WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED
        );
    }

    #[test]
    fn test_wait_flags_drops_unknown_bits() {
        let unknown = 0x100;
        assert!(WaitPidFlag::from_bits(libc::WNOHANG | unknown).is_none());
        assert_eq!(wait_flags(libc::WNOHANG | unknown), WaitPidFlag::WNOHANG);
    }
}
