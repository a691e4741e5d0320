//! Harness metrics.
//!
//! # Metrics
//! - `reaper_children_reaped_total` (counter): statuses collected by the reap loop
//! - `harness_workers_launched_total` (counter): worker launches by result
//! - `harness_signals_total` (counter): scaling signals received
//! - `harness_probe_runs_total` (counter): orphan probe runs by mode and verdict
//!
//! # Design Decisions
//! - No exporter is installed here; whoever embeds the harness picks a recorder
//! - Without a recorder every call is a no-op

use metrics::counter;

pub fn record_reaped() {
    counter!("reaper_children_reaped_total").increment(1);
}

pub fn record_worker_launch(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("harness_workers_launched_total", "result" => result).increment(1);
}

pub fn record_signal() {
    counter!("harness_signals_total").increment(1);
}

pub fn record_probe(detach: bool, expected: bool) {
    let detach = if detach { "true" } else { "false" };
    let outcome = if expected { "expected" } else { "anomaly" };
    counter!("harness_probe_runs_total", "detach" => detach, "outcome" => outcome).increment(1);
}
