//! Status drain: reports every reap notification.

use tokio::sync::mpsc;

use crate::reaper::ReapStatus;

/// Consume the status channel, logging each event.
///
/// Runs until every sender is gone; the supervisor keeps one alive inside the
/// reap loop, so in the harness this never returns. Returns the number of
/// events drained.
pub async fn drain(mut rx: mpsc::Receiver<ReapStatus>) -> usize {
    let mut drained = 0;
    while let Some(status) = rx.recv().await {
        drained += 1;
        tracing::info!(status = %status, "Child exit status notification");
    }
    tracing::debug!(drained, "Status channel closed");
    drained
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::wait::WaitStatus;
    use nix::unistd::Pid;

    #[tokio::test]
    async fn test_drain_counts_until_closed() {
        let (tx, rx) = mpsc::channel(2);
        let handle = tokio::spawn(drain(rx));

        for pid in 100..105 {
            let ws = WaitStatus::Exited(Pid::from_raw(pid), 1);
            tx.send(ReapStatus::from_wait_status(ws).unwrap()).await.unwrap();
        }
        drop(tx);

        assert_eq!(handle.await.unwrap(), 5);
    }
}
