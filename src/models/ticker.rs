//! Market data models

/// Rolling 24h statistics for one symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerSummary {
    pub last_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub weighted_avg_price: f64,
}

/// Everything fetched for one render cycle
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    /// Closing prices, oldest first
    pub closes: Vec<f64>,
    pub summary: TickerSummary,
}
