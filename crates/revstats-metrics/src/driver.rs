//! Report loop — feeds collector output into a [`StatsReporter`].
//!
//! The upstream collector sends one [`RequestStatsReport`] per reporting
//! tick. A failed tick is logged and skipped; the next tick proceeds.

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use revstats_core::RequestStatsReport;

use crate::reporter::StatsReporter;

/// Outcome counts for one run of [`run_report_loop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub reported: u64,
    pub failed: u64,
}

/// Report every stats snapshot received on `stats` until the channel closes
/// or `shutdown` fires.
pub async fn run_report_loop(
    reporter: &StatsReporter,
    mut stats: mpsc::Receiver<RequestStatsReport>,
    mut shutdown: watch::Receiver<bool>,
) -> LoopSummary {
    let mut summary = LoopSummary::default();
    info!(
        revision = reporter.identity().revision(),
        period_ms = reporter.reporting_period().as_millis() as u64,
        "report loop started"
    );

    loop {
        tokio::select! {
            next = stats.recv() => {
                let Some(report) = next else {
                    info!("stats channel closed");
                    break;
                };
                match reporter.report(&report) {
                    Ok(()) => summary.reported += 1,
                    Err(e) => {
                        summary.failed += 1;
                        warn!(error = %e, "stats report failed, skipping tick");
                    }
                }
            }
            _ = shutdown.changed() => {
                info!("report loop shutting down");
                break;
            }
        }
    }

    info!(
        reported = summary.reported,
        failed = summary.failed,
        "report loop stopped"
    );
    summary
}
