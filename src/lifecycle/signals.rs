//! OS signal handling.
//!
//! # Responsibilities
//! - Subscribe to SIGUSR1 before the first worker starts
//! - Launch one more worker tree per delivery
//!
//! # Design Decisions
//! - Signals are consumed as a stream, so tests can feed the scaler from a channel
//! - Launch failures do not stop the loop
//! - No other signal is intercepted

use std::future::Future;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::mpsc;

use crate::observability::metrics;
use crate::workers::Launch;

/// A single-subscriber stream of signal deliveries.
pub trait SignalStream: Send {
    /// Next delivery, or `None` once the stream is closed.
    fn recv(&mut self) -> impl Future<Output = Option<()>> + Send;
}

impl SignalStream for Signal {
    async fn recv(&mut self) -> Option<()> {
        Signal::recv(self).await
    }
}

impl SignalStream for mpsc::Receiver<()> {
    async fn recv(&mut self) -> Option<()> {
        mpsc::Receiver::recv(self).await
    }
}

/// Subscribe to the worker-scaling signal (SIGUSR1).
pub fn user_signal() -> std::io::Result<Signal> {
    signal(SignalKind::user_defined1())
}

/// Grows the worker population on every signal.
pub struct Scaler<L, S> {
    launcher: L,
    signals: S,
}

impl<L: Launch, S: SignalStream> Scaler<L, S> {
    pub fn new(launcher: L, signals: S) -> Self {
        Self { launcher, signals }
    }

    /// Handle signals until the stream closes. Returns the number of
    /// launches attempted.
    pub async fn run(mut self) -> usize {
        let mut launches = 0;
        while self.signals.recv().await.is_some() {
            metrics::record_signal();
            tracing::info!("Got SIGUSR1, adding workers");
            self.launcher.start_workers();
            launches += 1;
        }
        tracing::warn!(launches, "Signal stream closed");
        launches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::{LaunchError, LaunchedWorker};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Launch for Counting {
        fn launch(&self) -> Result<LaunchedWorker, LaunchError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) as u32;
            Ok(LaunchedWorker {
                pid: n + 1,
                script: "worker.sh".into(),
                workers: 1,
            })
        }
    }

    #[tokio::test]
    async fn test_no_signals_no_launches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<()>(1);
        drop(tx);

        let launches = Scaler::new(Counting(calls.clone()), rx).run().await;
        assert_eq!(launches, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
