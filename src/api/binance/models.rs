use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::models::TickerSummary;

fn de_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

/// One row of GET /api/v3/klines
///
/// Binance sends each kline as a positional array with decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchedKline(
    pub u64,
    #[serde(deserialize_with = "de_string_to_f64")] pub f64,
    #[serde(deserialize_with = "de_string_to_f64")] pub f64,
    #[serde(deserialize_with = "de_string_to_f64")] pub f64,
    #[serde(deserialize_with = "de_string_to_f64")] pub f64,
    #[serde(deserialize_with = "de_string_to_f64")] pub f64,
    pub u64,
    pub String,
    pub u64,
    pub String,
    pub String,
    pub String,
);

impl FetchedKline {
    pub fn close(&self) -> f64 {
        self.4
    }
}

/// Response from GET /api/v3/ticker/24hr
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub last_price: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub price_change: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub price_change_percent: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub high_price: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub low_price: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    pub weighted_avg_price: f64,
}

impl From<Ticker24h> for TickerSummary {
    fn from(ticker: Ticker24h) -> Self {
        TickerSummary {
            last_price: ticker.last_price,
            price_change: ticker.price_change,
            price_change_percent: ticker.price_change_percent,
            high_price: ticker.high_price,
            low_price: ticker.low_price,
            weighted_avg_price: ticker.weighted_avg_price,
        }
    }
}

/// Error body Binance returns with 4xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Errors from the market data API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request, usually an unknown symbol
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 418/429, the IP is being rate limited
    #[error("Rate Limited. Retry after {retry_after} s")]
    RateLimited { retry_after: u64 },
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
    /// The response held fewer samples than requested
    #[error("Insufficient data: expected {expected} samples, got {got}")]
    InsufficientData { expected: usize, got: usize },
}
