//! Helpers for pulling chart data out of pages rendered with Plotly
//!
//! Both CheckOnChain and ChainExposed publish static HTML where the series
//! live inside the `<script>` that calls `Plotly.newPlot`. Only the script
//! bodies matter, so a tag scan is enough; no DOM is built.

use super::FetchError;
use crate::constants::PLOTLY_MARKER;
use serde_json::Value;

const SCRIPT_OPEN: &str = "<script";
const SCRIPT_CLOSE: &str = "</script>";

/// Start and end markers of the embedded trace array on CheckOnChain pages
const TRACES_START: &str = "[{";
const TRACES_END: &str = "}\"}]";

/// Which of several matching scripts to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPick {
    First,
    Last,
}

/// Bodies of every `<script>` element, in document order
pub fn script_bodies(html: &str) -> Vec<&str> {
    // ASCII lowercasing keeps byte offsets identical to the original
    let lower = html.to_ascii_lowercase();
    let mut bodies = Vec::new();
    let mut cursor = 0;

    while let Some(open_rel) = lower[cursor..].find(SCRIPT_OPEN) {
        let open = cursor + open_rel;
        let Some(tag_end_rel) = lower[open..].find('>') else {
            break;
        };
        let body_start = open + tag_end_rel + 1;
        let Some(close_rel) = lower[body_start..].find(SCRIPT_CLOSE) else {
            break;
        };
        let body_end = body_start + close_rel;

        bodies.push(&html[body_start..body_end]);
        cursor = body_end + SCRIPT_CLOSE.len();
    }

    bodies
}

/// The script that draws the chart
pub fn find_plotly_script(html: &str, pick: ScriptPick) -> Option<&str> {
    let mut matching = script_bodies(html)
        .into_iter()
        .filter(|body| body.contains(PLOTLY_MARKER));

    match pick {
        ScriptPick::First => matching.next(),
        ScriptPick::Last => matching.last(),
    }
}

/// Parse the trace array embedded in a CheckOnChain chart script.
///
/// The array runs from the first `[{` to the last `}"}]`, terminator included.
pub fn extract_embedded_traces(script: &str) -> Result<Vec<Value>, FetchError> {
    let start = script.find(TRACES_START);
    let end = script.rfind(TRACES_END);

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if end >= start => (start, end + TRACES_END.len()),
        _ => {
            return Err(FetchError::MissingMarkup(
                "JSON data not found within the Plotly script".to_string(),
            ))
        }
    };

    let traces: Vec<Value> = serde_json::from_str(&script[start..end])?;
    Ok(traces)
}

/// Find a trace by its `name`
pub fn find_trace<'a>(traces: &'a [Value], name: &str) -> Option<&'a Value> {
    traces
        .iter()
        .find(|trace| trace.get("name").and_then(Value::as_str) == Some(name))
}
