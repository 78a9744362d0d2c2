use crate::models::{DateRange, IndicatorSource};
use crate::utils::DateDeduplicator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Series exactly as an adapter pulled it off the wire.
///
/// Timestamps are still in source format (strings or epoch millis) and values
/// may be missing where the chart had gaps.
#[derive(Debug, Clone)]
pub struct RawSeries {
    pub name: String,
    pub source: IndicatorSource,
    pub url: String,
    pub timestamps: Vec<Value>,
    pub values: Vec<Option<f64>>,
}

/// One named indicator time series, keyed by calendar date.
///
/// `dates` and `values` are index-aligned and each date appears once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub dates: Vec<String>,
    pub values: Vec<f64>,
    pub source: IndicatorSource,
    pub url: String,
}

impl IndicatorSeries {
    /// Build a series from already-normalized, possibly repeated dates
    pub fn new(
        name: impl Into<String>,
        source: IndicatorSource,
        url: impl Into<String>,
        dates: Vec<String>,
        values: Vec<f64>,
    ) -> Self {
        let (dates, values) = DateDeduplicator::filter_duplicates(dates, values);
        Self {
            name: name.into(),
            dates,
            values,
            source,
            url: url.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Slice the series to a date window.
    ///
    /// Dates are filtered independently of position and every kept date takes
    /// the value at the first index holding that date.
    pub fn filter_by_date(&self, range: &DateRange) -> IndicatorSeries {
        let first_index = DateDeduplicator::first_index_map(&self.dates);

        let dates: Vec<String> = self
            .dates
            .iter()
            .filter(|date| range.contains(date))
            .cloned()
            .collect();

        let values = dates
            .iter()
            .filter_map(|date| first_index.get(date.as_str()))
            .filter_map(|&idx| self.values.get(idx).copied())
            .collect();

        IndicatorSeries {
            name: self.name.clone(),
            dates,
            values,
            source: self.source,
            url: self.url.clone(),
        }
    }

    /// First and last stored dates, in stored order
    pub fn span(&self) -> Option<(&str, &str)> {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => Some((first.as_str(), last.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(dates: &[&str], values: &[f64]) -> IndicatorSeries {
        IndicatorSeries::new(
            "MVRV",
            IndicatorSource::ChainExposed,
            "https://example.com/mvrv",
            dates.iter().map(|s| s.to_string()).collect(),
            values.to_vec(),
        )
    }

    #[test]
    fn test_new_dedups_by_date() {
        let s = series(&["2024-01-01", "2024-01-01", "2024-01-02"], &[1.0, 5.0, 2.0]);
        assert_eq!(s.dates, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(s.values, vec![1.0, 2.0]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_filter_by_date_keeps_alignment() {
        let s = series(
            &["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"],
            &[1.0, 2.0, 3.0, 4.0],
        );
        let range = DateRange::new(Some("2024-01-02".into()), Some("2024-01-03".into()));
        let filtered = s.filter_by_date(&range);

        assert_eq!(filtered.dates, vec!["2024-01-02", "2024-01-03"]);
        assert_eq!(filtered.values, vec![2.0, 3.0]);
        assert_eq!(filtered.name, "MVRV");
        assert_eq!(filtered.source, IndicatorSource::ChainExposed);
    }

    #[test]
    fn test_filter_unsorted_dates() {
        let s = series(&["2024-01-03", "2024-01-01", "2024-01-02"], &[3.0, 1.0, 2.0]);
        let range = DateRange::new(Some("2024-01-02".into()), None);
        let filtered = s.filter_by_date(&range);

        assert_eq!(filtered.dates, vec!["2024-01-03", "2024-01-02"]);
        assert_eq!(filtered.values, vec![3.0, 2.0]);
    }

    #[test]
    fn test_filter_inverted_range_is_empty() {
        let s = series(&["2024-01-01", "2024-01-02"], &[1.0, 2.0]);
        let range = DateRange::new(Some("2024-02-01".into()), Some("2024-01-01".into()));
        let filtered = s.filter_by_date(&range);
        assert!(filtered.is_empty());
        assert!(filtered.values.is_empty());
    }

    #[test]
    fn test_span() {
        let s = series(&["2024-01-01", "2024-01-09"], &[1.0, 2.0]);
        assert_eq!(s.span(), Some(("2024-01-01", "2024-01-09")));
        assert_eq!(series(&[], &[]).span(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let s = series(&["2024-01-01"], &[1.5]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["name"], "MVRV");
        assert_eq!(json["source"], "ChainExposed");
        assert_eq!(json["dates"][0], "2024-01-01");
        assert_eq!(json["values"][0], 1.5);
        assert_eq!(json["url"], "https://example.com/mvrv");
    }
}
