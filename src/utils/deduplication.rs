//! Date-keyed deduplication for indicator series
//!
//! Sources occasionally emit several points for the same calendar day once
//! timestamps are truncated to `YYYY-MM-DD`. A stored series carries exactly
//! one value per date, so the first occurrence wins.

use std::collections::{HashMap, HashSet};

pub struct DateDeduplicator {
    seen_keys: HashSet<String>,
}

impl Default for DateDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl DateDeduplicator {
    /// Create a new deduplicator
    pub fn new() -> Self {
        Self {
            seen_keys: HashSet::new(),
        }
    }

    /// Check if a date was already seen (records it otherwise)
    pub fn is_duplicate(&mut self, date: &str) -> bool {
        !self.seen_keys.insert(date.to_string())
    }

    /// Drop repeated dates from index-aligned `dates`/`values`, keeping the first occurrence
    pub fn filter_duplicates(dates: Vec<String>, values: Vec<f64>) -> (Vec<String>, Vec<f64>) {
        let mut dedup = Self::new();
        let mut kept_dates = Vec::with_capacity(dates.len());
        let mut kept_values = Vec::with_capacity(values.len());

        for (date, value) in dates.into_iter().zip(values) {
            if !dedup.is_duplicate(&date) {
                kept_dates.push(date);
                kept_values.push(value);
            }
        }

        (kept_dates, kept_values)
    }

    /// Map every date to the first index holding it
    pub fn first_index_map(dates: &[String]) -> HashMap<&str, usize> {
        let mut first_index = HashMap::with_capacity(dates.len());
        for (idx, date) in dates.iter().enumerate() {
            first_index.entry(date.as_str()).or_insert(idx);
        }
        first_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_keeps_first_occurrence() {
        let (d, v) = DateDeduplicator::filter_duplicates(
            dates(&["2024-01-01", "2024-01-02", "2024-01-01", "2024-01-03"]),
            vec![1.0, 2.0, 9.0, 3.0],
        );
        assert_eq!(d, dates(&["2024-01-01", "2024-01-02", "2024-01-03"]));
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_first_index_map() {
        let d = dates(&["2024-01-02", "2024-01-01", "2024-01-02"]);
        let map = DateDeduplicator::first_index_map(&d);
        assert_eq!(map["2024-01-02"], 0);
        assert_eq!(map["2024-01-01"], 1);
    }
}
