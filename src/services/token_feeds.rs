//! Price history of TLX and Toros leveraged tokens
//!
//! Both venues are polled asset by asset. A failed asset keeps whatever was
//! stored for it before; every successful asset bumps the feeds' own
//! `last_updated`, independent of the indicator store.

use crate::constants::{
    TLX_PRICE_QUERY, TLX_PRICE_URL, TLX_TOKENS, TOROS_CANDLES_QUERY, TOROS_CANDLE_INTERVAL,
    TOROS_CANDLE_PERIOD, TOROS_GRAPHQL_URL, TOROS_PRICE_SCALE, TOROS_TOKENS,
};
use crate::models::{TokenVenue, TorosPricePoint};
use crate::services::sources::{get_text, parse_value, FetchError};
use crate::utils::{epoch_millis_now, millis_to_rfc3339};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

pub type SharedTokenStore = Arc<LeveragedTokenStore>;

/// Latest price history per venue and asset key
pub struct LeveragedTokenStore {
    tlx: RwLock<HashMap<String, Value>>,
    toros: RwLock<HashMap<String, Vec<TorosPricePoint>>>,
    last_updated: AtomicI64,
}

impl LeveragedTokenStore {
    pub fn new() -> Self {
        Self {
            tlx: RwLock::new(HashMap::new()),
            toros: RwLock::new(HashMap::new()),
            last_updated: AtomicI64::new(epoch_millis_now()),
        }
    }

    pub fn shared() -> SharedTokenStore {
        Arc::new(Self::new())
    }

    pub async fn set_tlx(&self, asset: &str, body: Value) {
        self.tlx.write().await.insert(asset.to_string(), body);
        self.touch();
    }

    pub async fn set_toros(&self, asset: &str, points: Vec<TorosPricePoint>) {
        self.toros.write().await.insert(asset.to_string(), points);
        self.touch();
    }

    /// Stored history for an asset, rendered as the JSON served to clients
    pub async fn get_asset(&self, venue: TokenVenue, asset: &str) -> Option<Value> {
        match venue {
            TokenVenue::Tlx => self.tlx.read().await.get(asset).cloned(),
            TokenVenue::Toros => {
                let toros = self.toros.read().await;
                toros
                    .get(asset)
                    .and_then(|points| serde_json::to_value(points).ok())
            }
        }
    }

    pub async fn asset_count(&self, venue: TokenVenue) -> usize {
        match venue {
            TokenVenue::Tlx => self.tlx.read().await.len(),
            TokenVenue::Toros => self.toros.read().await.len(),
        }
    }

    pub fn last_updated(&self) -> i64 {
        self.last_updated.load(Ordering::Relaxed)
    }

    fn touch(&self) {
        self.last_updated.store(epoch_millis_now(), Ordering::Relaxed);
    }
}

impl Default for LeveragedTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-venue counts from one polling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenRefreshReport {
    pub tlx_succeeded: usize,
    pub tlx_failed: usize,
    pub toros_succeeded: usize,
    pub toros_failed: usize,
}

/// GraphQL request for one Toros vault's daily candles
pub fn toros_candles_payload(address: &str) -> Value {
    json!({
        "query": TOROS_CANDLES_QUERY,
        "variables": {
            "address": address,
            "period": TOROS_CANDLE_PERIOD,
            "interval": TOROS_CANDLE_INTERVAL
        },
        "operationName": "GetTokenPriceCandles"
    })
}

/// Turn `data.tokenPriceCandles` into `{ timestamp, price }` points.
///
/// Timestamps are epoch millis (string or number); closes are 18-decimal
/// fixed point.
pub fn parse_toros_candles(body: &Value) -> Result<Vec<TorosPricePoint>, FetchError> {
    let candles = body
        .pointer("/data/tokenPriceCandles")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::MissingSeries("tokenPriceCandles".to_string()))?;

    candles
        .iter()
        .map(|candle| {
            let millis = candle
                .get("timestamp")
                .and_then(parse_value)
                .ok_or_else(|| FetchError::Parse(format!("Invalid candle timestamp: {}", candle)))?;
            let timestamp = millis_to_rfc3339(millis as i64)
                .ok_or_else(|| FetchError::Parse(format!("Candle timestamp out of range: {}", millis)))?;
            let close = candle
                .get("close")
                .and_then(parse_value)
                .ok_or_else(|| FetchError::Parse(format!("Invalid candle close: {}", candle)))?;

            Ok(TorosPricePoint {
                timestamp,
                price: close / TOROS_PRICE_SCALE,
            })
        })
        .collect()
}

/// Polls both venues into a [`LeveragedTokenStore`]
pub struct TokenFeeds {
    client: reqwest::Client,
    store: SharedTokenStore,
}

impl TokenFeeds {
    pub fn new(client: reqwest::Client, store: SharedTokenStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &SharedTokenStore {
        &self.store
    }

    async fn fetch_tlx(&self, address: &str) -> Result<Value, FetchError> {
        let url = format!("{}/{}?{}", TLX_PRICE_URL, address, TLX_PRICE_QUERY);
        let body = get_text(&self.client, &url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_toros(&self, address: &str) -> Result<Vec<TorosPricePoint>, FetchError> {
        let response = self
            .client
            .post(TOROS_GRAPHQL_URL)
            .json(&toros_candles_payload(address))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: TOROS_GRAPHQL_URL.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        parse_toros_candles(&body)
    }

    /// Poll every TLX asset in turn; returns (succeeded, failed)
    #[instrument(skip(self))]
    pub async fn refresh_tlx(&self) -> (usize, usize) {
        let mut succeeded = 0;
        let mut failed = 0;

        for (asset, address) in TLX_TOKENS {
            match self.fetch_tlx(address).await {
                Ok(body) => {
                    self.store.set_tlx(asset, body).await;
                    debug!(venue = "tlx", asset, "Fetched token prices");
                    succeeded += 1;
                }
                Err(e) => {
                    warn!(venue = "tlx", asset, error = %e, "Token price fetch failed");
                    failed += 1;
                }
            }
        }

        (succeeded, failed)
    }

    /// Poll every Toros asset in turn; returns (succeeded, failed)
    #[instrument(skip(self))]
    pub async fn refresh_toros(&self) -> (usize, usize) {
        let mut succeeded = 0;
        let mut failed = 0;

        for (asset, address) in TOROS_TOKENS {
            match self.fetch_toros(address).await {
                Ok(points) => {
                    debug!(venue = "toros", asset, candles = points.len(), "Fetched token prices");
                    self.store.set_toros(asset, points).await;
                    succeeded += 1;
                }
                Err(e) => {
                    warn!(venue = "toros", asset, error = %e, "Token price fetch failed");
                    failed += 1;
                }
            }
        }

        (succeeded, failed)
    }

    /// Both venues run side by side, assets within a venue one at a time
    pub async fn refresh_all(&self) -> TokenRefreshReport {
        let ((tlx_succeeded, tlx_failed), (toros_succeeded, toros_failed)) =
            futures::join!(self.refresh_tlx(), self.refresh_toros());

        let report = TokenRefreshReport {
            tlx_succeeded,
            tlx_failed,
            toros_succeeded,
            toros_failed,
        };
        info!(?report, "Token feeds refreshed");
        report
    }
}
