pub mod dates;
pub mod deduplication;

pub use dates::{epoch_millis_now, millis_to_rfc3339, normalize_date, normalize_timestamp_value};
pub use deduplication::DateDeduplicator;

use std::path::PathBuf;
use std::time::Duration;

/// Default HTTP timeout for external chart sources
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Get historical price CSV directory from environment variable or use default
pub fn get_price_data_dir() -> PathBuf {
    std::env::var("PRICE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Get static frontend directory from environment variable or use default
pub fn get_public_dir() -> PathBuf {
    std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("dist"))
}

/// Get the managed-volatility paper served by the optimizer page
pub fn get_reference_doc_path() -> PathBuf {
    std::env::var("REFERENCE_DOC_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            get_price_data_dir().join("alpha-generation-and-risk-smoothing-using-managed-volatility.pdf")
        })
}

/// Fixed refresh interval override. `None` means the hourly wall-clock schedule.
pub fn get_refresh_interval() -> Option<Duration> {
    std::env::var("REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Timeout applied to every outbound request
pub fn get_http_timeout() -> Duration {
    let secs = std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
