use super::plotly::{find_plotly_script, ScriptPick};
use super::{get_text, parse_value, FetchError, SourceAdapter};
use crate::models::{IndicatorSource, RawSeries};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument};

/// `var trace1 = { ... x: [...] ... y: [...] }` with x and y captured
const TRACE1_PATTERN: &str =
    r"var trace1\s*=\s*\{[^}]*x\s*:\s*(\[[^\]]*\])[^}]*y\s*:\s*(\[[^\]]*\])";

/// ChainExposed page; the series is the inline `trace1` of the last Plotly script
pub struct ChainExposedAdapter {
    client: reqwest::Client,
    name: String,
    url: String,
    trace1: Regex,
}

impl ChainExposedAdapter {
    pub fn new(client: reqwest::Client, name: String, url: String) -> Result<Self, FetchError> {
        let trace1 = Regex::new(TRACE1_PATTERN)
            .map_err(|e| FetchError::Parse(format!("Invalid trace1 pattern: {}", e)))?;
        Ok(Self {
            client,
            name,
            url,
            trace1,
        })
    }

    pub fn parse_page(&self, html: &str) -> Result<RawSeries, FetchError> {
        let script = find_plotly_script(html, ScriptPick::Last)
            .ok_or_else(|| FetchError::MissingMarkup("Plotly not found".to_string()))?;

        let captures = self
            .trace1
            .captures(script)
            .ok_or_else(|| FetchError::MissingSeries("trace1".to_string()))?;

        let x: Vec<Value> = serde_json::from_str(&captures[1])?;
        let y: Vec<Value> = serde_json::from_str(&captures[2])?;

        Ok(RawSeries {
            name: self.name.clone(),
            source: IndicatorSource::ChainExposed,
            url: self.url.clone(),
            timestamps: x,
            values: y.iter().map(parse_value).collect(),
        })
    }
}

#[async_trait]
impl SourceAdapter for ChainExposedAdapter {
    fn key(&self) -> &str {
        &self.name
    }

    fn source(&self) -> IndicatorSource {
        IndicatorSource::ChainExposed
    }

    #[instrument(skip(self), fields(indicator = %self.name))]
    async fn fetch(&self) -> Result<RawSeries, FetchError> {
        let html = get_text(&self.client, &self.url).await?;
        let raw = self.parse_page(&html)?;
        debug!(points = raw.values.len(), "Fetched ChainExposed page");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> ChainExposedAdapter {
        ChainExposedAdapter::new(
            reqwest::Client::new(),
            "MVRV".to_string(),
            "https://chainexposed.com/XthMVRVShortTermHolderAddress.html".to_string(),
        )
        .unwrap()
    }

    const PAGE: &str = r#"<html><head><script src="plotly.js"></script></head><body>
<script>
var trace0 = {x: ["2024-01-01"], y: ["9.9"], name: 'Other'};
Plotly.newPlot('warmup', [trace0]);
</script>
<script>
var trace1 = {
  x: ["2024-01-01", "2024-01-02", "2024-01-03"],
  y: ["1.05", "1.10", "NaN"],
  mode: 'lines',
  name: 'STH MVRV'
};
Plotly.newPlot('chart', [trace1]);
</script>
</body></html>"#;

    #[test]
    fn test_parse_page_uses_last_plotly_script() {
        let raw = adapter().parse_page(PAGE).unwrap();

        assert_eq!(raw.name, "MVRV");
        assert_eq!(raw.source, IndicatorSource::ChainExposed);
        assert_eq!(raw.timestamps.len(), 3);
        assert_eq!(raw.timestamps[0], "2024-01-01");
        assert_eq!(raw.values, vec![Some(1.05), Some(1.10), None]);
    }

    #[test]
    fn test_parse_page_without_trace1() {
        let html = "<script>var trace2 = {x: [], y: []}; Plotly.newPlot('c', [trace2]);</script>";
        assert!(matches!(
            adapter().parse_page(html),
            Err(FetchError::MissingSeries(_))
        ));
    }

    #[test]
    fn test_parse_page_without_plotly() {
        assert!(matches!(
            adapter().parse_page("<html></html>"),
            Err(FetchError::MissingMarkup(_))
        ));
    }
}
