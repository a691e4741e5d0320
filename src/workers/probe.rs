//! Orphan probe.
//!
//! Starts a short-lived child, optionally in its own process group, waits
//! longer than the child runs, then issues its own wait. With a reaper running
//! the detached child should already be gone (wait fails); the attached child
//! should still be waitable.
//!
//! Precondition: the probe's child is released to whoever calls `waitpid`
//! first. Only the background reaper and this probe ever do.

use std::fmt;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::observability::metrics;

/// Result of one probe run.
#[derive(Debug)]
pub struct OrphanTestOutcome {
    /// The child was put in its own process group.
    pub attributes_set: bool,
    pub wait_error: Option<std::io::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    Expected,
    Anomaly,
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeVerdict::Expected => write!(f, "expected"),
            ProbeVerdict::Anomaly => write!(f, "anomaly"),
        }
    }
}

/// A detached child should have been reaped by someone else; an attached
/// one should not.
pub fn classify(detach: bool, wait_failed: bool) -> ProbeVerdict {
    if detach == wait_failed {
        ProbeVerdict::Expected
    } else {
        ProbeVerdict::Anomaly
    }
}

impl OrphanTestOutcome {
    pub fn verdict(&self) -> ProbeVerdict {
        classify(self.attributes_set, self.wait_error.is_some())
    }
}

#[derive(Debug, Clone)]
pub struct OrphanProbe {
    program: String,
    args: Vec<String>,
    grace: Duration,
}

impl OrphanProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>, grace: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            grace,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.probe_program.clone(), config.probe_args.clone(), config.probe_grace)
    }

    /// Run the probe once. Only a failure to start the child is an error;
    /// the wait result is reported in the outcome.
    pub async fn probe(&self, detach: bool) -> std::io::Result<OrphanTestOutcome> {
        tracing::info!(detach, "Orphan probe starting");

        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        if detach {
            command.process_group(0);
        }

        let mut child = command.spawn().map_err(|e| {
            tracing::error!(program = %self.program, error = %e, "Error starting probe command");
            e
        })?;
        let pid = child.id();

        tokio::time::sleep(self.grace).await;

        let wait_error = match tokio::task::spawn_blocking(move || child.wait()).await {
            Ok(Ok(status)) if status.success() => None,
            Ok(Ok(status)) => Some(std::io::Error::other(format!("child exited with {}", status))),
            Ok(Err(e)) => Some(e),
            Err(e) => Some(std::io::Error::other(e)),
        };

        let outcome = OrphanTestOutcome {
            attributes_set: detach,
            wait_error,
        };
        let verdict = outcome.verdict();
        metrics::record_probe(detach, verdict == ProbeVerdict::Expected);

        match (&outcome.wait_error, verdict) {
            (Some(e), ProbeVerdict::Expected) => tracing::info!(
                pid,
                detach,
                verdict = %verdict,
                error = %e,
                "Expected wait failure, reaper claimed the child"
            ),
            (Some(e), ProbeVerdict::Anomaly) => tracing::error!(
                pid,
                detach,
                verdict = %verdict,
                error = %e,
                "Error waiting for command"
            ),
            (None, ProbeVerdict::Expected) => {
                tracing::info!(pid, detach, verdict = %verdict, "Wait succeeded")
            }
            (None, ProbeVerdict::Anomaly) => tracing::warn!(
                pid,
                detach,
                verdict = %verdict,
                "Wait succeeded, reaper did not claim the detached child"
            ),
        }

        Ok(outcome)
    }
}
