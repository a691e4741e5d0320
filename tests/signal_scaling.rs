//! Signal-driven worker scaling.

use std::sync::atomic::Ordering;
use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::getpid;
use reaper_harness::lifecycle::signals::user_signal;
use reaper_harness::lifecycle::Scaler;
use tokio::sync::mpsc;

mod common;
use common::{wait_until, FlakyLauncher};

#[tokio::test]
async fn test_each_signal_launches_once() {
    let launcher = FlakyLauncher::default();
    let calls = launcher.calls.clone();
    let (tx, rx) = mpsc::channel(16);

    for _ in 0..5 {
        tx.send(()).await.unwrap();
    }
    drop(tx);

    let launches = Scaler::new(launcher, rx).run().await;
    assert_eq!(launches, 5);
    // Failed launches (every other one) do not stop the loop.
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_real_sigusr1_triggers_launch() {
    let launcher = FlakyLauncher::default();
    let calls = launcher.calls.clone();

    let signals = user_signal().unwrap();
    let scaler = tokio::spawn(Scaler::new(launcher, signals).run());

    kill(getpid(), Signal::SIGUSR1).unwrap();

    let launched = wait_until(Duration::from_secs(2), || calls.load(Ordering::SeqCst) >= 1).await;
    assert!(launched, "SIGUSR1 did not trigger a launch");

    scaler.abort();
}
