use super::{xy_columns, FetchError, SourceAdapter};
use crate::models::{IndicatorSource, RawSeries};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// LookIntoBitcoin chart served through a Dash callback endpoint.
///
/// The series is the trace named `trace` in the returned figure, but it is
/// stored under the chart `slug`.
pub struct LookIntoBitcoinAdapter {
    client: reqwest::Client,
    trace: String,
    slug: String,
    endpoint: String,
    url: String,
}

impl LookIntoBitcoinAdapter {
    pub fn new(
        client: reqwest::Client,
        trace: String,
        slug: String,
        endpoint: String,
        url: String,
    ) -> Self {
        Self {
            client,
            trace,
            slug,
            endpoint,
            url,
        }
    }

    /// Dash callback body asking for the chart figure of `/charts/{slug}/`
    pub fn payload(&self) -> Value {
        json!({
            "output": "chart.figure",
            "outputs": {"id": "chart", "property": "figure"},
            "inputs": [{
                "id": "url",
                "property": "pathname",
                "value": format!("/charts/{}/", self.slug)
            }],
            "changedPropIds": ["url.pathname"]
        })
    }

    /// Pick the configured trace out of `response.chart.figure.data`; the last plot with that name wins
    pub fn parse_response(&self, body: &Value) -> Result<RawSeries, FetchError> {
        let data = body
            .pointer("/response/chart/figure/data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                FetchError::MissingMarkup("response.chart.figure.data not present".to_string())
            })?;

        let plot = data
            .iter()
            .rev()
            .find(|plot| plot.get("name").and_then(Value::as_str) == Some(self.trace.as_str()))
            .ok_or_else(|| FetchError::MissingSeries(self.trace.clone()))?;

        let (timestamps, values) = xy_columns(plot, &self.trace)?;

        Ok(RawSeries {
            name: self.slug.clone(),
            source: IndicatorSource::LookIntoBitcoin,
            url: self.url.clone(),
            timestamps,
            values,
        })
    }
}

#[async_trait]
impl SourceAdapter for LookIntoBitcoinAdapter {
    fn key(&self) -> &str {
        &self.slug
    }

    fn source(&self) -> IndicatorSource {
        IndicatorSource::LookIntoBitcoin
    }

    #[instrument(skip(self), fields(indicator = %self.slug))]
    async fn fetch(&self) -> Result<RawSeries, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.payload())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let raw = self.parse_response(&body)?;
        debug!(points = raw.values.len(), "Fetched LookIntoBitcoin chart");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> LookIntoBitcoinAdapter {
        LookIntoBitcoinAdapter::new(
            reqwest::Client::new(),
            "Oscillator".to_string(),
            "pi_cycle_top_bottom_indicator".to_string(),
            "https://www.lookintobitcoin.com/django_plotly_dash/app/pi/_dash-update-component".to_string(),
            "https://www.lookintobitcoin.com/charts/pi-cycle-top-bottom-indicator/".to_string(),
        )
    }

    #[test]
    fn test_payload_targets_slug() {
        let payload = adapter().payload();
        assert_eq!(payload["inputs"][0]["value"], "/charts/pi_cycle_top_bottom_indicator/");
        assert_eq!(payload["changedPropIds"][0], "url.pathname");
        assert_eq!(payload["outputs"]["property"], "figure");
    }

    #[test]
    fn test_parse_response_stores_under_slug() {
        let body = json!({
            "response": {"chart": {"figure": {"data": [
                {"name": "BTC Price", "x": ["2024-01-01"], "y": [42000.0]},
                {"name": "Oscillator", "x": ["2024-01-01", "2024-01-02"], "y": [0.31, 0.33]}
            ]}}}
        });

        let raw = adapter().parse_response(&body).unwrap();
        assert_eq!(raw.name, "pi_cycle_top_bottom_indicator");
        assert_eq!(raw.source, IndicatorSource::LookIntoBitcoin);
        assert_eq!(raw.values, vec![Some(0.31), Some(0.33)]);
        assert_eq!(raw.url, "https://www.lookintobitcoin.com/charts/pi-cycle-top-bottom-indicator/");
    }

    #[test]
    fn test_parse_response_repeated_trace_takes_last() {
        let body = json!({
            "response": {"chart": {"figure": {"data": [
                {"name": "Oscillator", "x": ["2024-01-01"], "y": [0.10]},
                {"name": "BTC Price", "x": ["2024-01-01"], "y": [42000.0]},
                {"name": "Oscillator", "x": ["2024-01-01", "2024-01-02"], "y": [0.31, 0.33]}
            ]}}}
        });

        let raw = adapter().parse_response(&body).unwrap();
        assert_eq!(raw.values, vec![Some(0.31), Some(0.33)]);
        assert_eq!(raw.timestamps.len(), 2);
    }

    #[test]
    fn test_parse_response_without_trace() {
        let body = json!({"response": {"chart": {"figure": {"data": []}}}});
        assert!(matches!(
            adapter().parse_response(&body),
            Err(FetchError::MissingSeries(_))
        ));
    }

    #[test]
    fn test_parse_response_wrong_shape() {
        assert!(matches!(
            adapter().parse_response(&json!({"multi": true})),
            Err(FetchError::MissingMarkup(_))
        ));
    }
}
