use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health statistics reported by `/health`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStats {
    // Worker statistics
    pub indicator_last_sync: Option<String>,
    pub token_last_sync: Option<String>,
    pub indicator_iteration_count: u64,
    pub token_iteration_count: u64,

    // Last indicator pass
    pub last_refresh_succeeded: usize,
    pub last_refresh_failed: usize,
    pub failed_indicators: Vec<String>,

    // Store statistics
    pub indicator_count: usize,
    pub tlx_asset_count: usize,
    pub toros_asset_count: usize,

    // System info
    pub uptime_secs: u64,
    pub current_system_time: String,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            indicator_last_sync: None,
            token_last_sync: None,
            indicator_iteration_count: 0,
            token_iteration_count: 0,
            last_refresh_succeeded: 0,
            last_refresh_failed: 0,
            failed_indicators: Vec::new(),
            indicator_count: 0,
            tlx_asset_count: 0,
            toros_asset_count: 0,
            uptime_secs: 0,
            current_system_time: Utc::now().to_rfc3339(),
        }
    }
}

pub type SharedHealthStats = Arc<RwLock<HealthStats>>;

pub fn shared_health_stats() -> SharedHealthStats {
    Arc::new(RwLock::new(HealthStats::default()))
}
