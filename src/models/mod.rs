mod date_range;
mod indicator_series;
mod leveraged_token;
mod optimization;
mod source;

pub use date_range::{DateRange, DateRangeQuery};
pub use indicator_series::{IndicatorSeries, RawSeries};
pub use leveraged_token::{TokenVenue, TorosPricePoint};
pub use optimization::{OptimizationResult, OptimizeParams, OptimizeRequest, PricePoint};
pub use source::IndicatorSource;

use std::collections::{BTreeMap, HashMap};

/// Indicator name -> stored series
pub type IndicatorMap = HashMap<String, IndicatorSeries>;

/// Date -> z-scores observed on that date, one per indicator
pub type ZScoreMap = HashMap<String, Vec<f64>>;

/// Date -> cross-indicator mean z-score, ordered by ISO date
pub type AggregateSeries = BTreeMap<String, f64>;
