//! Cross-indicator z-score normalization
//!
//! Every indicator is standardized against its own full history, then the
//! z-scores of all indicators are averaged per calendar date. The query window
//! only selects which dates appear in the output; it never changes the mean or
//! deviation used to standardize a series.

use crate::models::{AggregateSeries, DateRange, IndicatorMap, ZScoreMap};

/// Arithmetic mean, NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with divisor `n`
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standardize a series. A constant series maps to all zeros.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let std = population_std(values);

    if std == 0.0 || !std.is_finite() {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - m) / std).collect()
}

/// Group every indicator's z-scores by date
pub fn build_zscore_map(indicators: &IndicatorMap) -> ZScoreMap {
    let mut by_date = ZScoreMap::new();

    for series in indicators.values() {
        let scores = z_scores(&series.values);
        for (date, score) in series.dates.iter().zip(scores) {
            by_date.entry(date.clone()).or_default().push(score);
        }
    }

    by_date
}

/// Mean z-score for each date inside the window, ordered by date
pub fn average_by_date(indicators: &IndicatorMap, range: &DateRange) -> AggregateSeries {
    build_zscore_map(indicators)
        .into_iter()
        .filter(|(date, _)| range.contains(date))
        .map(|(date, scores)| {
            let avg = mean(&scores);
            (date, avg)
        })
        .collect()
}
