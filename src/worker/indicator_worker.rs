use crate::services::{IndicatorRefresher, SharedHealthStats};
use crate::worker::RefreshSchedule;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Refresh valuation indicators now, then on every scheduled tick
#[instrument(skip(refresher, health_stats))]
pub async fn run(refresher: IndicatorRefresher, schedule: RefreshSchedule, health_stats: SharedHealthStats) {
    info!(
        worker = "Indicator",
        adapters = refresher.adapter_count(),
        schedule = %schedule,
        "Starting indicator worker"
    );

    let mut iteration_count = 0u64;

    loop {
        iteration_count += 1;
        let loop_start = std::time::Instant::now();

        info!(worker = "Indicator", iteration = iteration_count, "Starting refresh");

        let report = refresher.refresh_all().await;

        if !report.failed.is_empty() {
            warn!(
                worker = "Indicator",
                iteration = iteration_count,
                failed = ?report.failed,
                "Some indicators failed to refresh"
            );
        }

        {
            let indicator_count = refresher.store().len().await;
            let mut health = health_stats.write().await;
            health.indicator_last_sync = Some(Utc::now().to_rfc3339());
            health.indicator_iteration_count = iteration_count;
            health.last_refresh_succeeded = report.succeeded.len();
            health.last_refresh_failed = report.failed.len();
            health.failed_indicators = report.failed.clone();
            health.indicator_count = indicator_count;
        }

        let next_sync = schedule.next_delay();

        info!(
            worker = "Indicator",
            iteration = iteration_count,
            loop_duration_secs = loop_start.elapsed().as_secs_f64(),
            next_sync_secs = next_sync.as_secs(),
            "Iteration completed"
        );

        sleep(next_sync).await;
    }
}
