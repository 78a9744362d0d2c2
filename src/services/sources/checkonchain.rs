use super::plotly::{extract_embedded_traces, find_plotly_script, find_trace, ScriptPick};
use super::{get_text, xy_columns, FetchError, SourceAdapter};
use crate::models::{IndicatorSource, RawSeries};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// CheckOnChain chart page; the series is a named trace in the embedded Plotly JSON
pub struct CheckOnChainAdapter {
    client: reqwest::Client,
    url: String,
    column: String,
}

impl CheckOnChainAdapter {
    pub fn new(client: reqwest::Client, url: String, column: String) -> Self {
        Self { client, url, column }
    }

    /// Pull the configured trace out of a fetched page
    pub fn parse_page(&self, html: &str) -> Result<RawSeries, FetchError> {
        let script = find_plotly_script(html, ScriptPick::First).ok_or_else(|| {
            FetchError::MissingMarkup(format!("Plotly script not found on webpage {}", self.url))
        })?;

        let traces = extract_embedded_traces(script)?;
        let trace = find_trace(&traces, &self.column)
            .ok_or_else(|| FetchError::MissingSeries(self.column.clone()))?;

        let (timestamps, values) = xy_columns(trace, &self.column)?;

        Ok(RawSeries {
            name: self.column.clone(),
            source: IndicatorSource::CheckOnChain,
            url: self.url.clone(),
            timestamps,
            values,
        })
    }
}

#[async_trait]
impl SourceAdapter for CheckOnChainAdapter {
    fn key(&self) -> &str {
        &self.column
    }

    fn source(&self) -> IndicatorSource {
        IndicatorSource::CheckOnChain
    }

    #[instrument(skip(self), fields(indicator = %self.column))]
    async fn fetch(&self) -> Result<RawSeries, FetchError> {
        let html = get_text(&self.client, &self.url).await?;
        let raw = self.parse_page(&html)?;
        debug!(points = raw.values.len(), "Fetched CheckOnChain page");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(column: &str) -> CheckOnChainAdapter {
        CheckOnChainAdapter::new(
            reqwest::Client::new(),
            "https://charts.checkonchain.com/test.html".to_string(),
            column.to_string(),
        )
    }

    const PAGE: &str = r#"<!DOCTYPE html><html><body>
<div id="plot"></div>
<script type="text/javascript">
window.PLOTLYENV=window.PLOTLYENV || {};
if (document.getElementById("plot")) {
  Plotly.newPlot("plot", [{"hovertemplate":"%{y:,.0f}","line":{"color":"black"},"name":"Price","x":["2024-01-01T00:00:00","2024-01-02T00:00:00"],"y":[42280.2,44180.1],"type":"scatter","yaxis":"y2"},{"hovertemplate":"%{y:.2f}","name":"Mayer Multiple Z","x":["2024-01-01T00:00:00","2024-01-02T00:00:00","2024-01-03T00:00:00"],"y":[0.41,null,0.52],"type":"scatter","xaxis":"x"}], {"template":{"data":{}}}, {"responsive": true})
};
</script>
</body></html>"#;

    #[test]
    fn test_parse_page_picks_named_trace() {
        let raw = adapter("Mayer Multiple Z").parse_page(PAGE).unwrap();

        assert_eq!(raw.name, "Mayer Multiple Z");
        assert_eq!(raw.source, IndicatorSource::CheckOnChain);
        assert_eq!(raw.timestamps.len(), 3);
        assert_eq!(raw.values, vec![Some(0.41), None, Some(0.52)]);
    }

    #[test]
    fn test_parse_page_price_trace() {
        let raw = adapter("Price").parse_page(PAGE).unwrap();
        assert_eq!(raw.values, vec![Some(42280.2), Some(44180.1)]);
        assert_eq!(raw.url, "https://charts.checkonchain.com/test.html");
    }

    #[test]
    fn test_parse_page_missing_trace() {
        let result = adapter("SOPR 7D-EMA").parse_page(PAGE);
        assert!(matches!(result, Err(FetchError::MissingSeries(name)) if name == "SOPR 7D-EMA"));
    }

    #[test]
    fn test_parse_page_without_plotly() {
        let result = adapter("Price").parse_page("<html><script>var x = 1;</script></html>");
        assert!(matches!(result, Err(FetchError::MissingMarkup(_))));
    }
}
