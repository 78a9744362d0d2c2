use super::{get_text, xy_columns, FetchError, SourceAdapter};
use crate::constants::WOOCHARTS_DATA_URL;
use crate::models::{IndicatorSource, RawSeries};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

/// WooCharts oscillator series, all served from one shared JSON document
pub struct WooChartsAdapter {
    client: reqwest::Client,
    name: String,
    url: String,
    data_url: String,
}

impl WooChartsAdapter {
    pub fn new(client: reqwest::Client, name: String, url: String) -> Self {
        Self {
            client,
            name,
            url,
            data_url: WOOCHARTS_DATA_URL.to_string(),
        }
    }

    /// Read `document[name].x / .y`
    pub fn parse_document(&self, document: &Value) -> Result<RawSeries, FetchError> {
        let column = document
            .get(&self.name)
            .ok_or_else(|| FetchError::MissingSeries(self.name.clone()))?;

        let (timestamps, values) = xy_columns(column, &self.name)?;

        Ok(RawSeries {
            name: self.name.clone(),
            source: IndicatorSource::WooCharts,
            url: self.url.clone(),
            timestamps,
            values,
        })
    }
}

#[async_trait]
impl SourceAdapter for WooChartsAdapter {
    fn key(&self) -> &str {
        &self.name
    }

    fn source(&self) -> IndicatorSource {
        IndicatorSource::WooCharts
    }

    #[instrument(skip(self), fields(indicator = %self.name))]
    async fn fetch(&self) -> Result<RawSeries, FetchError> {
        let body = get_text(&self.client, &self.data_url).await?;
        let document: Value = serde_json::from_str(&body)?;
        let raw = self.parse_document(&document)?;
        debug!(points = raw.values.len(), "Fetched WooCharts series");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter(name: &str) -> WooChartsAdapter {
        WooChartsAdapter::new(
            reqwest::Client::new(),
            name.to_string(),
            "https://woocharts.com/bitcoin-mvrv-z/".to_string(),
        )
    }

    #[test]
    fn test_parse_document() {
        let document = json!({
            "index": {"x": ["2024-01-01"], "y": [0.1]},
            "mvrv_z": {"x": [1704067200000i64, 1704153600000i64], "y": [1.9, "2.1"]}
        });

        let raw = adapter("mvrv_z").parse_document(&document).unwrap();
        assert_eq!(raw.name, "mvrv_z");
        assert_eq!(raw.source, IndicatorSource::WooCharts);
        assert_eq!(raw.url, "https://woocharts.com/bitcoin-mvrv-z/");
        assert_eq!(raw.timestamps.len(), 2);
        assert_eq!(raw.values, vec![Some(1.9), Some(2.1)]);
    }

    #[test]
    fn test_missing_key() {
        let result = adapter("mvrv_z").parse_document(&json!({"index": {"x": [], "y": []}}));
        assert!(matches!(result, Err(FetchError::MissingSeries(_))));
    }

    #[test]
    fn test_missing_y_array() {
        let result = adapter("index").parse_document(&json!({"index": {"x": []}}));
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }
}
