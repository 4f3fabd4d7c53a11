use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::render_service;
use crate::api::binance::ApiError;
use crate::api::MarketData;
use crate::models::{FrameValues, InstanceSettings, MarketSnapshot};

/// Kline interval of the price series
pub const KLINE_INTERVAL: &str = "1h";
/// Samples in the price series
pub const KLINE_LIMIT: usize = 10;

/// How a frame was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Rendered from freshly fetched data
    Fresh,
    /// Fetch failed, last good values re-rendered
    Cached,
    /// Fetch failed and nothing was cached
    Placeholder,
}

/// Result of one refresh cycle
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub svg: String,
    pub kind: FrameKind,
}

/// Fetch the price series and the 24h summary for a symbol
pub async fn fetch_snapshot(market: &dyn MarketData, symbol: &str) -> Result<MarketSnapshot, ApiError> {
    let (closes, summary) = tokio::try_join!(
        market.fetch_closes(symbol, KLINE_INTERVAL, KLINE_LIMIT),
        market.fetch_summary(symbol),
    )?;

    Ok(MarketSnapshot { closes, summary })
}

/// Fetch and render one frame for an instance.
///
/// On success `last_good` is replaced with the new values. On failure the
/// cached values are re-rendered, or the placeholder if there are none.
pub async fn refresh(
    market: &dyn MarketData,
    settings: &InstanceSettings,
    last_good: &mut Option<FrameValues>,
    now: NaiveDateTime,
) -> RefreshResult {
    match fetch_snapshot(market, &settings.symbol).await {
        Ok(snapshot) => {
            let (svg, values) =
                render_service::render_snapshot(&settings.label(), &snapshot, settings.style, now);
            debug!(
                "📈 {} {} {} ({:?})",
                settings.symbol, values.price, values.change, values.trend.trend
            );
            *last_good = Some(values);
            RefreshResult { svg, kind: FrameKind::Fresh }
        }
        Err(e) => {
            warn!("Ticker fetch failed for {}: {}", settings.symbol, e);
            match last_good {
                Some(values) => RefreshResult {
                    svg: render_service::render_cached(values, settings.style, now),
                    kind: FrameKind::Cached,
                },
                None => RefreshResult {
                    svg: render_service::render_placeholder(settings.style, now),
                    kind: FrameKind::Placeholder,
                },
            }
        }
    }
}
