use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of a ticker's historical price file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Body of `POST /optimize-leverage` as sent by the client; every field optional
///
/// Form inputs arrive as strings once edited, so the numeric fields take
/// either JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizeRequest {
    pub ticker: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub lower_lev: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub upper_lev: Option<f64>,
    /// Annualized fee in percent (e.g. 3.65 means 3.65% per year)
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub fees: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// `2.5`, `"2.5"` -> `Some(2.5)`; `null`, `""` -> `None`
fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got \"{}\"", s)))
        }
    }
}

/// Validated optimizer input with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeParams {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lower_lev: f64,
    pub upper_lev: f64,
    pub fees: f64,
}

/// Reward curve over the leverage grid plus the return statistics behind it
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub ticker: String,
    /// Leverage grid
    pub k: Vec<f64>,
    /// Expected daily log-growth per grid point
    #[serde(rename = "R")]
    pub r: Vec<f64>,
    /// `R` net of the daily fee drag
    #[serde(rename = "R_fees")]
    pub r_fees: Vec<f64>,
    pub k_max: f64,
    #[serde(rename = "R_max")]
    pub r_max: f64,
    /// Mean daily simple return
    pub mu: f64,
    /// Sample standard deviation of daily returns
    pub std: f64,
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
}
