//! Provenance of an indicator series
//!
//! Only affects display on the dashboard; normalization treats every source alike.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorSource {
    /// charts.checkonchain.com Plotly pages
    CheckOnChain,

    /// woocharts.com shared chart JSON
    WooCharts,

    /// lookintobitcoin.com Dash callbacks
    LookIntoBitcoin,

    /// chainexposed.com inline Plotly traces
    ChainExposed,
}

impl IndicatorSource {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorSource::CheckOnChain => "CheckOnChain",
            IndicatorSource::WooCharts => "WooCharts",
            IndicatorSource::LookIntoBitcoin => "LookIntoBitcoin",
            IndicatorSource::ChainExposed => "ChainExposed",
        }
    }
}

impl fmt::Display for IndicatorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_display_name() {
        for source in [
            IndicatorSource::CheckOnChain,
            IndicatorSource::WooCharts,
            IndicatorSource::LookIntoBitcoin,
            IndicatorSource::ChainExposed,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source));
        }
    }
}
