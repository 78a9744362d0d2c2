use serde::Deserialize;

/// Inclusive `YYYY-MM-DD` window used by the indicator and price queries.
///
/// Bounds compare as plain strings, which is sound because the format is
/// fixed-width and zero-padded. A window whose start is after its end matches
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    /// Build a range; empty strings count as "no bound"
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start: start.filter(|s| !s.is_empty()),
            end: end.filter(|s| !s.is_empty()),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Check whether a date falls inside the window
    pub fn contains(&self, date: &str) -> bool {
        if let Some(start) = &self.start {
            if date < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end {
            if date > end.as_str() {
                return false;
            }
        }
        true
    }
}

/// Query parameters shared by the date-filtered GET endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    /// Start date filter (YYYY-MM-DD)
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,

    /// End date filter (YYYY-MM-DD)
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

impl From<DateRangeQuery> for DateRange {
    fn from(query: DateRangeQuery) -> Self {
        DateRange::new(query.start_date, query.end_date)
    }
}
