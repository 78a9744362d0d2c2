//! Indicator source adapters
//!
//! Each chart site gets one adapter behind the [`SourceAdapter`] trait. The
//! adapters only know how to pull a raw `name / timestamps / values` triple off
//! their site; date normalization and storage happen in the refresher.

mod chainexposed;
mod checkonchain;
mod lookintobitcoin;
pub mod plotly;
mod woocharts;

pub use chainexposed::ChainExposedAdapter;
pub use checkonchain::CheckOnChainAdapter;
pub use lookintobitcoin::LookIntoBitcoinAdapter;
pub use woocharts::WooChartsAdapter;

use crate::constants::{
    BITCOIN_PRICE_NAME, BITCOIN_PRICE_URL, CHAINEXPOSED_INDICATORS, CHECKONCHAIN_INDICATORS,
    LOOKINTOBITCOIN_INDICATORS, WOOCHARTS_INDICATORS,
};
use crate::error::AppError;
use crate::models::{IndicatorSeries, IndicatorSource, RawSeries};
use crate::utils::normalize_timestamp_value;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::debug;

#[derive(ThisError, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Missing markup: {0}")]
    MissingMarkup(String),

    #[error("Series '{0}' not found in response")]
    MissingSeries(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// A single external indicator feed
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Name the fetched series is stored under
    fn key(&self) -> &str;

    fn source(&self) -> IndicatorSource;

    /// Pull the current series from the source
    async fn fetch(&self) -> Result<RawSeries, FetchError>;
}

/// Configured `(source, series selector)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    CheckOnChain {
        url: String,
        column: String,
    },
    WooCharts {
        name: String,
        url: String,
    },
    LookIntoBitcoin {
        trace: String,
        slug: String,
        endpoint: String,
        url: String,
    },
    ChainExposed {
        name: String,
        url: String,
    },
}

impl SourceConfig {
    /// Store key of the series this config produces
    pub fn key(&self) -> &str {
        match self {
            SourceConfig::CheckOnChain { column, .. } => column,
            SourceConfig::WooCharts { name, .. } => name,
            SourceConfig::LookIntoBitcoin { slug, .. } => slug,
            SourceConfig::ChainExposed { name, .. } => name,
        }
    }

    pub fn source(&self) -> IndicatorSource {
        match self {
            SourceConfig::CheckOnChain { .. } => IndicatorSource::CheckOnChain,
            SourceConfig::WooCharts { .. } => IndicatorSource::WooCharts,
            SourceConfig::LookIntoBitcoin { .. } => IndicatorSource::LookIntoBitcoin,
            SourceConfig::ChainExposed { .. } => IndicatorSource::ChainExposed,
        }
    }

    /// Build the adapter for this config on a shared HTTP client
    pub fn into_adapter(self, client: reqwest::Client) -> Result<Arc<dyn SourceAdapter>, FetchError> {
        let adapter: Arc<dyn SourceAdapter> = match self {
            SourceConfig::CheckOnChain { url, column } => {
                Arc::new(CheckOnChainAdapter::new(client, url, column))
            }
            SourceConfig::WooCharts { name, url } => {
                Arc::new(WooChartsAdapter::new(client, name, url))
            }
            SourceConfig::LookIntoBitcoin { trace, slug, endpoint, url } => {
                Arc::new(LookIntoBitcoinAdapter::new(client, trace, slug, endpoint, url))
            }
            SourceConfig::ChainExposed { name, url } => {
                Arc::new(ChainExposedAdapter::new(client, name, url)?)
            }
        };
        Ok(adapter)
    }

    /// Every valuation indicator shown on the dashboard
    pub fn default_indicators() -> Vec<SourceConfig> {
        let mut configs = Vec::new();

        for (name, url) in WOOCHARTS_INDICATORS {
            configs.push(SourceConfig::WooCharts {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
        for (url, column) in CHECKONCHAIN_INDICATORS {
            configs.push(SourceConfig::CheckOnChain {
                url: url.to_string(),
                column: column.to_string(),
            });
        }
        for (trace, slug, endpoint, url) in LOOKINTOBITCOIN_INDICATORS {
            configs.push(SourceConfig::LookIntoBitcoin {
                trace: trace.to_string(),
                slug: slug.to_string(),
                endpoint: endpoint.to_string(),
                url: url.to_string(),
            });
        }
        for (name, url) in CHAINEXPOSED_INDICATORS {
            configs.push(SourceConfig::ChainExposed {
                name: name.to_string(),
                url: url.to_string(),
            });
        }

        configs
    }

    /// Bitcoin price reference line
    pub fn bitcoin_price() -> SourceConfig {
        SourceConfig::CheckOnChain {
            url: BITCOIN_PRICE_URL.to_string(),
            column: BITCOIN_PRICE_NAME.to_string(),
        }
    }
}

/// Shared client for all chart sources
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a raw series into a stored one.
///
/// Points without a numeric value are dropped along with their timestamp. Any
/// timestamp that is not a recognizable date fails the whole series.
pub fn normalize(raw: RawSeries) -> Result<IndicatorSeries, FetchError> {
    let mut dates = Vec::with_capacity(raw.timestamps.len());
    let mut values = Vec::with_capacity(raw.values.len());
    let mut skipped = 0usize;

    for (timestamp, value) in raw.timestamps.iter().zip(raw.values.iter()) {
        let Some(value) = value else {
            skipped += 1;
            continue;
        };
        let date = normalize_timestamp_value(timestamp).ok_or_else(|| {
            FetchError::Parse(format!("Invalid date {} in series '{}'", timestamp, raw.name))
        })?;
        dates.push(date);
        values.push(*value);
    }

    if skipped > 0 {
        debug!(indicator = %raw.name, skipped, "Dropped points without a value");
    }

    Ok(IndicatorSeries::new(raw.name, raw.source, raw.url, dates, values))
}

/// GET a URL and return the body, failing on non-success status
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Numeric chart value: JSON numbers or numeric strings, anything else is a gap
pub(crate) fn parse_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Read the `x` / `y` arrays of a Plotly-style trace object
pub(crate) fn xy_columns(trace: &Value, name: &str) -> Result<(Vec<Value>, Vec<Option<f64>>), FetchError> {
    let x = trace
        .get("x")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Parse(format!("Series '{}' has no x array", name)))?;
    let y = trace
        .get("y")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Parse(format!("Series '{}' has no y array", name)))?;

    Ok((x.clone(), y.iter().map(parse_value).collect()))
}
