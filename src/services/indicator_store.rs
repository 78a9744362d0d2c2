use crate::models::{AggregateSeries, DateRange, IndicatorMap, IndicatorSeries};
use crate::services::zscore;
use crate::utils::epoch_millis_now;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared indicator store for passing between the worker and the handlers
pub type SharedIndicatorStore = Arc<IndicatorStore>;

/// Bitcoin close prices as served by `/bitcoin-price`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

/// In-memory indicator data: name -> latest successfully fetched series.
///
/// Writers replace whole entries; readers clone out under a short read lock,
/// so a slow refresh never blocks a query.
pub struct IndicatorStore {
    indicators: RwLock<IndicatorMap>,
    bitcoin_price: RwLock<Option<IndicatorSeries>>,
    last_updated: AtomicI64,
}

impl IndicatorStore {
    pub fn new() -> Self {
        Self {
            indicators: RwLock::new(IndicatorMap::new()),
            bitcoin_price: RwLock::new(None),
            last_updated: AtomicI64::new(epoch_millis_now()),
        }
    }

    pub fn shared() -> SharedIndicatorStore {
        Arc::new(Self::new())
    }

    /// Insert or replace the series stored under `series.name`
    pub async fn replace(&self, series: IndicatorSeries) {
        let mut indicators = self.indicators.write().await;
        debug!(indicator = %series.name, points = series.len(), "Storing indicator");
        indicators.insert(series.name.clone(), series);
    }

    pub async fn replace_bitcoin_price(&self, series: IndicatorSeries) {
        let mut price = self.bitcoin_price.write().await;
        *price = Some(series);
    }

    /// One indicator, sliced to the window
    pub async fn get_indicator(&self, name: &str, range: &DateRange) -> Option<IndicatorSeries> {
        let indicators = self.indicators.read().await;
        indicators.get(name).map(|series| series.filter_by_date(range))
    }

    /// Cross-indicator mean z-score per date inside the window
    pub async fn get_aggregate(&self, range: &DateRange) -> AggregateSeries {
        let indicators = self.indicators.read().await;
        zscore::average_by_date(&indicators, range)
    }

    /// Bitcoin price inside the window; empty until the first successful fetch
    pub async fn get_bitcoin_price(&self, range: &DateRange) -> PriceSeries {
        let price = self.bitcoin_price.read().await;
        match price.as_ref() {
            Some(series) => {
                let filtered = series.filter_by_date(range);
                PriceSeries {
                    dates: filtered.dates,
                    values: filtered.values,
                }
            }
            None => PriceSeries::default(),
        }
    }

    /// Epoch millis of the last refresh pass that stored anything
    pub fn last_updated(&self) -> i64 {
        self.last_updated.load(Ordering::Relaxed)
    }

    /// Stamp `last_updated` with the current time
    pub fn touch(&self) {
        self.last_updated.store(epoch_millis_now(), Ordering::Relaxed);
    }

    /// Stored indicator names, sorted
    pub async fn names(&self) -> Vec<String> {
        let indicators = self.indicators.read().await;
        let mut names: Vec<String> = indicators.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.indicators.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.indicators.read().await.is_empty()
    }
}

impl Default for IndicatorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorSource;

    fn series(name: &str, dates: &[&str], values: &[f64]) -> IndicatorSeries {
        IndicatorSeries::new(
            name,
            IndicatorSource::CheckOnChain,
            "https://example.com",
            dates.iter().map(|d| d.to_string()).collect(),
            values.to_vec(),
        )
    }

    #[tokio::test]
    async fn test_replace_is_last_write_wins() {
        let store = IndicatorStore::new();
        store.replace(series("MVRV", &["2024-01-01"], &[1.0])).await;
        store.replace(series("MVRV", &["2024-01-02"], &[2.0])).await;

        assert_eq!(store.len().await, 1);
        let stored = store.get_indicator("MVRV", &DateRange::unbounded()).await.unwrap();
        assert_eq!(stored.dates, vec!["2024-01-02"]);
        assert_eq!(stored.values, vec![2.0]);
    }

    #[tokio::test]
    async fn test_get_indicator_missing() {
        let store = IndicatorStore::new();
        assert!(store.get_indicator("nope", &DateRange::unbounded()).await.is_none());
    }

    #[tokio::test]
    async fn test_get_indicator_filters_window() {
        let store = IndicatorStore::new();
        store
            .replace(series("SOPR 7D-EMA", &["2024-01-01", "2024-01-02", "2024-01-03"], &[1.0, 2.0, 3.0]))
            .await;

        let range = DateRange::new(Some("2024-01-02".into()), Some("2024-01-02".into()));
        let filtered = store.get_indicator("SOPR 7D-EMA", &range).await.unwrap();
        assert_eq!(filtered.dates, vec!["2024-01-02"]);
        assert_eq!(filtered.values, vec![2.0]);
    }

    #[tokio::test]
    async fn test_aggregate_over_store() {
        let store = IndicatorStore::new();
        store.replace(series("a", &["2024-01-01", "2024-01-02"], &[0.0, 2.0])).await;

        let aggregate = store.get_aggregate(&DateRange::unbounded()).await;
        assert_eq!(aggregate.len(), 2);
        assert!((aggregate["2024-01-01"] + 1.0).abs() < 1e-9);
        assert!((aggregate["2024-01-02"] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bitcoin_price_empty_before_first_fetch() {
        let store = IndicatorStore::new();
        let price = store.get_bitcoin_price(&DateRange::unbounded()).await;
        assert!(price.dates.is_empty());
        assert!(price.values.is_empty());

        store
            .replace_bitcoin_price(series("Price", &["2024-01-01", "2024-01-02"], &[42000.0, 43000.0]))
            .await;
        let range = DateRange::new(None, Some("2024-01-01".into()));
        let price = store.get_bitcoin_price(&range).await;
        assert_eq!(price.dates, vec!["2024-01-01"]);
        assert_eq!(price.values, vec![42000.0]);
    }

    #[tokio::test]
    async fn test_names_sorted() {
        let store = IndicatorStore::new();
        store.replace(series("mvrv_z", &[], &[])).await;
        store.replace(series("LTH-NUPL", &[], &[])).await;
        assert_eq!(store.names().await, vec!["LTH-NUPL", "mvrv_z"]);
    }

    #[test]
    fn test_touch_moves_last_updated_forward() {
        let store = IndicatorStore::new();
        let created = store.last_updated();
        assert!(created > 0);
        store.touch();
        assert!(store.last_updated() >= created);
    }
}
