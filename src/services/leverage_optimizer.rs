//! Optimal constant leverage from historical daily closes
//!
//! Daily simple returns give a mean `mu` and sample deviation `std`. For each
//! point `k` of an evenly spaced leverage grid the expected daily log-growth is
//!
//! ```text
//! R(k) = k*mu - 0.5 * k^2 * std^2 / (1 + k*std)
//! ```
//!
//! and `R_fees(k)` subtracts a daily fee drag of `fees / 36500` (annual percent
//! spread over 365 days). The optimum is the first grid point with maximal `R`.

use crate::constants::{
    DEFAULT_END_DATE, DEFAULT_FEES_PERCENT, DEFAULT_LOWER_LEVERAGE, DEFAULT_START_DATE,
    DEFAULT_UPPER_LEVERAGE, FEE_DAYS_DIVISOR, LEVERAGE_GRID_POINTS, PRICE_FILE_SUFFIX,
};
use crate::models::{OptimizationResult, OptimizeParams, OptimizeRequest, PricePoint};
use crate::utils::dates::DATE_FORMAT;
use axum::http::StatusCode;
use chrono::NaiveDate;
use csv::Reader;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{debug, instrument};

#[derive(ThisError, Debug)]
pub enum OptimizeError {
    #[error("{0} not provided")]
    MissingParameter(String),

    #[error("Invalid ticker")]
    InvalidTicker,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid ticker or no data in the specified date range")]
    NoDataInRange,

    #[error("{0}")]
    Unexpected(String),
}

impl OptimizeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OptimizeError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<csv::Error> for OptimizeError {
    fn from(err: csv::Error) -> Self {
        OptimizeError::Unexpected(format!("CSV error: {}", err))
    }
}

/// Tickers name files, so only plain symbol characters are accepted
fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.contains("..")
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, OptimizeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        OptimizeError::InvalidInput(format!("Invalid {}: '{}', expected YYYY-MM-DD", field, value))
    })
}

fn check_finite(field: &str, value: f64) -> Result<f64, OptimizeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OptimizeError::InvalidInput(format!("{} must be a finite number", field)))
    }
}

impl TryFrom<OptimizeRequest> for OptimizeParams {
    type Error = OptimizeError;

    fn try_from(request: OptimizeRequest) -> Result<Self, Self::Error> {
        let ticker = request
            .ticker
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| OptimizeError::MissingParameter("Ticker".to_string()))?;

        if !is_valid_ticker(&ticker) {
            return Err(OptimizeError::InvalidTicker);
        }

        let start_date = parse_date(
            "start_date",
            request.start_date.as_deref().unwrap_or(DEFAULT_START_DATE),
        )?;
        let end_date = parse_date(
            "end_date",
            request.end_date.as_deref().unwrap_or(DEFAULT_END_DATE),
        )?;

        Ok(OptimizeParams {
            ticker,
            start_date,
            end_date,
            lower_lev: check_finite("lower_lev", request.lower_lev.unwrap_or(DEFAULT_LOWER_LEVERAGE))?,
            upper_lev: check_finite("upper_lev", request.upper_lev.unwrap_or(DEFAULT_UPPER_LEVERAGE))?,
            fees: check_finite("fees", request.fees.unwrap_or(DEFAULT_FEES_PERCENT))?,
        })
    }
}

/// Location of a ticker's price file
pub fn price_file_path(data_dir: &Path, ticker: &str) -> PathBuf {
    data_dir.join(format!("{}{}", ticker, PRICE_FILE_SUFFIX))
}

/// Read `Date` / `Close` columns from a price CSV.
///
/// Rows whose date or close does not parse (e.g. `null` closes) are skipped.
pub fn load_price_history(path: &Path) -> Result<Vec<PricePoint>, OptimizeError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OptimizeError::InvalidTicker)
        }
        Err(e) => return Err(OptimizeError::Unexpected(e.to_string())),
    };

    let mut reader = Reader::from_reader(file);
    let headers = reader.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| OptimizeError::Unexpected(format!("Missing '{}' column in price file", name)))
    };
    let date_idx = column("Date")?;
    let close_idx = column("Close")?;

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result?;

        let date = record
            .get(date_idx)
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok());
        let close = record
            .get(close_idx)
            .and_then(|c| c.trim().parse::<f64>().ok())
            .filter(|c| c.is_finite());

        match (date, close) {
            (Some(date), Some(close)) => points.push(PricePoint { date, close }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(path = %path.display(), skipped, "Skipped unparseable price rows");
    }

    Ok(points)
}

/// `n` evenly spaced points from `lower` to `upper`, both included
pub fn leverage_grid(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lower],
        _ => {
            let step = (upper - lower) / (n - 1) as f64;
            (0..n).map(|i| lower + i as f64 * step).collect()
        }
    }
}

/// Expected daily log-growth at leverage `k`
pub fn expected_growth(k: f64, mu: f64, std: f64) -> f64 {
    k * mu - 0.5 * k.powi(2) * std.powi(2) / (1.0 + k * std)
}

fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Sample standard deviation (divisor `n - 1`), NaN below two values
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() as f64 - 1.0)).sqrt()
}

/// Index of the first maximum; NaN never beats anything
fn first_argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Optimize over an already-loaded price history
pub fn optimize(params: &OptimizeParams, history: &[PricePoint]) -> Result<OptimizationResult, OptimizeError> {
    let window: Vec<&PricePoint> = history
        .iter()
        .filter(|p| p.date >= params.start_date && p.date <= params.end_date)
        .collect();

    if window.is_empty() {
        return Err(OptimizeError::NoDataInRange);
    }

    let dates: Vec<String> = window.iter().map(|p| p.date.format(DATE_FORMAT).to_string()).collect();
    let prices: Vec<f64> = window.iter().map(|p| p.close).collect();

    let returns = daily_returns(&prices);
    let mu = returns.iter().sum::<f64>() / returns.len() as f64;
    let std = sample_std(&returns, mu);

    let k = leverage_grid(params.lower_lev, params.upper_lev, LEVERAGE_GRID_POINTS);
    let r: Vec<f64> = k.iter().map(|&k_i| expected_growth(k_i, mu, std)).collect();
    let fee_drag = params.fees / FEE_DAYS_DIVISOR;
    let r_fees: Vec<f64> = r.iter().map(|r_i| r_i - fee_drag).collect();

    let best = first_argmax(&r);

    Ok(OptimizationResult {
        ticker: params.ticker.clone(),
        k_max: k[best],
        r_max: r[best],
        k,
        r,
        r_fees,
        mu,
        std,
        dates,
        prices,
    })
}

/// Load the ticker's price file from `data_dir` and optimize
#[instrument(skip(params), fields(ticker = %params.ticker))]
pub fn run(params: &OptimizeParams, data_dir: &Path) -> Result<OptimizationResult, OptimizeError> {
    let history = load_price_history(&price_file_path(data_dir, &params.ticker))?;
    let result = optimize(params, &history)?;
    debug!(
        rows = result.prices.len(),
        k_max = result.k_max,
        r_max = result.r_max,
        "Leverage optimization completed"
    );
    Ok(result)
}
