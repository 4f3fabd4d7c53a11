use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, ErrorResponse, FetchedKline, Ticker24h};
use crate::api::MarketData;
use crate::models::TickerSummary;

/// Binance spot REST client for klines and 24h statistics
pub struct BinanceClient {
    http_client: HttpClient,
    base_url: String,
}

impl BinanceClient {
    /// Create a new client against `base_url`, e.g. `https://api.binance.com`
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            400 => match serde_json::from_str::<ErrorResponse>(&body_text) {
                Ok(err) => ApiError::BadRequest(format!("{} (code {})", err.msg, err.code)),
                Err(_) => ApiError::BadRequest(body_text),
            },
            418 | 429 => {
                let retry_after = retry_after.unwrap_or(60);
                warn!("Rate limited by market data API, retry after {} s", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl MarketData for BinanceClient {
    /// GET /api/v3/klines
    ///
    /// Returns the close prices of the last `limit` klines, oldest first.
    async fn fetch_closes(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<f64>, ApiError> {
        let klines: Vec<FetchedKline> = self
            .get(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        closes_from_klines(&klines, limit)
    }

    /// GET /api/v3/ticker/24hr
    async fn fetch_summary(&self, symbol: &str) -> Result<TickerSummary, ApiError> {
        let ticker: Ticker24h = self
            .get("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await?;
        debug!("24h summary for {}: last {}", ticker.symbol, ticker.last_price);

        Ok(ticker.into())
    }
}

/// Close prices of the klines, rejecting short responses
pub fn closes_from_klines(klines: &[FetchedKline], expected: usize) -> Result<Vec<f64>, ApiError> {
    if klines.len() < expected {
        return Err(ApiError::InsufficientData {
            expected,
            got: klines.len(),
        });
    }

    Ok(klines.iter().map(FetchedKline::close).collect())
}
