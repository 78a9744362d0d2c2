use crate::models::TokenVenue;
use crate::services::{SharedHealthStats, TokenFeeds};
use crate::worker::RefreshSchedule;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, instrument};

/// Poll TLX and Toros token prices now, then on every scheduled tick
#[instrument(skip(feeds, health_stats))]
pub async fn run(feeds: TokenFeeds, schedule: RefreshSchedule, health_stats: SharedHealthStats) {
    info!(worker = "Token", schedule = %schedule, "Starting leveraged token worker");

    let mut iteration_count = 0u64;

    loop {
        iteration_count += 1;
        let loop_start = std::time::Instant::now();

        let report = feeds.refresh_all().await;

        {
            let tlx_count = feeds.store().asset_count(TokenVenue::Tlx).await;
            let toros_count = feeds.store().asset_count(TokenVenue::Toros).await;
            let mut health = health_stats.write().await;
            health.token_last_sync = Some(Utc::now().to_rfc3339());
            health.token_iteration_count = iteration_count;
            health.tlx_asset_count = tlx_count;
            health.toros_asset_count = toros_count;
        }

        let next_sync = schedule.next_delay();

        info!(
            worker = "Token",
            iteration = iteration_count,
            tlx_succeeded = report.tlx_succeeded,
            tlx_failed = report.tlx_failed,
            toros_succeeded = report.toros_succeeded,
            toros_failed = report.toros_failed,
            loop_duration_secs = loop_start.elapsed().as_secs_f64(),
            next_sync_secs = next_sync.as_secs(),
            "Iteration completed"
        );

        sleep(next_sync).await;
    }
}
