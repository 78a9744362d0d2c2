use crate::error::{AppError, Result};
use crate::services::indicator_store::SharedIndicatorStore;
use crate::services::sources::{build_http_client, normalize, FetchError, SourceAdapter, SourceConfig};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// Outcome of one refresh pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Store keys written this pass
    pub succeeded: Vec<String>,
    /// Store keys whose fetch failed, prior data kept
    pub failed: Vec<String>,
    /// Whether the Bitcoin price line was refreshed
    pub bitcoin_price_updated: bool,
}

impl RefreshReport {
    pub fn stored_anything(&self) -> bool {
        !self.succeeded.is_empty() || self.bitcoin_price_updated
    }
}

/// Runs every configured source adapter and writes results into the store
pub struct IndicatorRefresher {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    price_adapter: Option<Arc<dyn SourceAdapter>>,
    store: SharedIndicatorStore,
}

impl IndicatorRefresher {
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        price_adapter: Option<Arc<dyn SourceAdapter>>,
        store: SharedIndicatorStore,
    ) -> Self {
        Self {
            adapters,
            price_adapter,
            store,
        }
    }

    /// Refresher over the default indicator table and the Bitcoin price page
    pub fn from_defaults(store: SharedIndicatorStore, timeout: Duration) -> Result<Self> {
        let client = build_http_client(timeout)?;

        let adapters = SourceConfig::default_indicators()
            .into_iter()
            .map(|config| config.into_adapter(client.clone()))
            .collect::<std::result::Result<Vec<_>, FetchError>>()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let price_adapter = SourceConfig::bitcoin_price()
            .into_adapter(client)
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self::new(adapters, Some(price_adapter), store))
    }

    pub fn store(&self) -> &SharedIndicatorStore {
        &self.store
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Fetch every source concurrently.
    ///
    /// Failures are isolated per adapter: a failed source keeps its previous
    /// entry. `last_updated` moves only when something was stored.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> RefreshReport {
        let start = Instant::now();

        let indicator_fetches = join_all(self.adapters.iter().map(|adapter| async move {
            let result = adapter.fetch().await.and_then(normalize);
            (adapter, result)
        }));
        let price_fetch = async {
            match &self.price_adapter {
                Some(adapter) => Some(adapter.fetch().await.and_then(normalize)),
                None => None,
            }
        };

        let (results, price_result) = futures::join!(indicator_fetches, price_fetch);

        let mut report = RefreshReport::default();

        for (adapter, result) in results {
            match result {
                Ok(series) => {
                    report.succeeded.push(adapter.key().to_string());
                    self.store.replace(series).await;
                }
                Err(e) => {
                    warn!(
                        indicator = %adapter.key(),
                        source = %adapter.source(),
                        error = %e,
                        "Indicator fetch failed, keeping previous data"
                    );
                    report.failed.push(adapter.key().to_string());
                }
            }
        }

        match price_result {
            Some(Ok(series)) => {
                self.store.replace_bitcoin_price(series).await;
                report.bitcoin_price_updated = true;
            }
            Some(Err(e)) => {
                error!(error = %e, "Bitcoin price fetch failed");
            }
            None => {}
        }

        if report.stored_anything() {
            self.store.touch();
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            bitcoin_price = report.bitcoin_price_updated,
            duration_secs = start.elapsed().as_secs_f64(),
            "Refresh pass completed"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, IndicatorSource, RawSeries};
    use crate::services::indicator_store::IndicatorStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixtureAdapter {
        key: String,
        fail: AtomicBool,
        values: Vec<Option<f64>>,
    }

    fn as_dyn(adapter: &Arc<FixtureAdapter>) -> Arc<dyn SourceAdapter> {
        adapter.clone()
    }

    impl FixtureAdapter {
        fn new(key: &str, values: Vec<Option<f64>>) -> Arc<Self> {
            Arc::new(Self {
                key: key.to_string(),
                fail: AtomicBool::new(false),
                values,
            })
        }

        fn failing(key: &str) -> Arc<Self> {
            let adapter = Self::new(key, vec![]);
            adapter.fail.store(true, Ordering::SeqCst);
            adapter
        }
    }

    #[async_trait]
    impl SourceAdapter for FixtureAdapter {
        fn key(&self) -> &str {
            &self.key
        }

        fn source(&self) -> IndicatorSource {
            IndicatorSource::WooCharts
        }

        async fn fetch(&self) -> std::result::Result<RawSeries, FetchError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Status {
                    url: "https://example.com".to_string(),
                    status: 503,
                });
            }
            let timestamps = (0..self.values.len())
                .map(|i| json!(format!("2024-01-{:02}", i + 1)))
                .collect();
            Ok(RawSeries {
                name: self.key.clone(),
                source: IndicatorSource::WooCharts,
                url: "https://example.com".to_string(),
                timestamps,
                values: self.values.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let store = IndicatorStore::shared();
        let good = FixtureAdapter::new("index", vec![Some(1.0), Some(2.0)]);
        let flaky = FixtureAdapter::new("mvrv_z", vec![Some(5.0)]);

        let refresher = IndicatorRefresher::new(
            vec![as_dyn(&good), as_dyn(&flaky)],
            None,
            store.clone(),
        );
        let first = refresher.refresh_all().await;
        assert_eq!(first.failed.len(), 0);
        assert_eq!(store.len().await, 2);

        flaky.fail.store(true, Ordering::SeqCst);
        let second = refresher.refresh_all().await;
        assert_eq!(second.succeeded, vec!["index"]);
        assert_eq!(second.failed, vec!["mvrv_z"]);

        let kept = store.get_indicator("mvrv_z", &DateRange::unbounded()).await.unwrap();
        assert_eq!(kept.values, vec![5.0]);
    }

    #[tokio::test]
    async fn test_all_failed_keeps_last_updated() {
        let store = IndicatorStore::shared();
        let before = store.last_updated();

        let refresher = IndicatorRefresher::new(
            vec![as_dyn(&FixtureAdapter::failing("a")), as_dyn(&FixtureAdapter::failing("b"))],
            Some(as_dyn(&FixtureAdapter::failing("Price"))),
            store.clone(),
        );
        let report = refresher.refresh_all().await;

        assert!(!report.stored_anything());
        assert_eq!(report.failed.len(), 2);
        assert!(store.is_empty().await);
        assert_eq!(store.last_updated(), before);
    }

    #[tokio::test]
    async fn test_price_adapter_fills_bitcoin_store() {
        let store = IndicatorStore::shared();
        let refresher = IndicatorRefresher::new(
            vec![],
            Some(as_dyn(&FixtureAdapter::new("Price", vec![Some(42000.0), None, Some(43000.0)]))),
            store.clone(),
        );

        let report = refresher.refresh_all().await;
        assert!(report.bitcoin_price_updated);
        assert!(report.stored_anything());

        let price = store.get_bitcoin_price(&DateRange::unbounded()).await;
        assert_eq!(price.dates, vec!["2024-01-01", "2024-01-03"]);
        assert_eq!(price.values, vec![42000.0, 43000.0]);
        // the price line is not an indicator
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_from_defaults_builds_every_adapter() {
        let refresher =
            IndicatorRefresher::from_defaults(IndicatorStore::shared(), Duration::from_secs(5)).unwrap();
        assert_eq!(refresher.adapter_count(), 13);
    }
}
