//! Startup orchestration.
//!
//! # Order
//! 1. Reaper supervisor (and, in configured mode, the drain and both orphan probes)
//! 2. SIGUSR1 subscription
//! 3. Initial worker tree
//! 4. Signal-driven scaling, forever

use crate::config::HarnessConfig;
use crate::lifecycle::signals::{user_signal, Scaler};
use crate::lifecycle::supervisor::{ReaperMode, Supervisor};
use crate::reaper::ReapEngine;
use crate::workers::{Launch, OrphanProbe, ScriptLauncher};

/// Run the harness. Only returns early if SIGUSR1 cannot be subscribed.
pub async fn run<E: ReapEngine>(engine: E, config: HarnessConfig) -> std::io::Result<()> {
    let supervisor = Supervisor::new(engine, &config);
    if supervisor.start() == ReaperMode::Configured {
        spawn_probes(OrphanProbe::from_config(&config));
    }

    let signals = user_signal()?;

    let launcher = ScriptLauncher::from_config(&config);
    launcher.start_workers();

    Scaler::new(launcher, signals).run().await;
    Ok(())
}

fn spawn_probes(probe: OrphanProbe) {
    for detach in [true, false] {
        let probe = probe.clone();
        tokio::spawn(async move {
            // Spawn failures are logged by the probe itself.
            let _ = probe.probe(detach).await;
        });
    }
}
