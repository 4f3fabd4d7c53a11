pub mod binance;
pub mod streamdeck;

use async_trait::async_trait;

use crate::models::TickerSummary;
use crate::utils::errors::Result;
use binance::ApiError;
use streamdeck::{ImagePayload, OutboundMessage};

/// Source of prices for the ticker
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Last `limit` close prices at the given interval, oldest first
    async fn fetch_closes(&self, symbol: &str, interval: &str, limit: usize)
        -> Result<Vec<f64>, ApiError>;

    /// Rolling 24h statistics
    async fn fetch_summary(&self, symbol: &str) -> Result<TickerSummary, ApiError>;
}

/// Where rendered frames and settings go
#[async_trait]
pub trait HostSurface: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<()>;

    /// Show an image on the key
    async fn set_image(&self, context: &str, image: String) -> Result<()> {
        self.send(OutboundMessage::SetImage {
            context: context.to_string(),
            payload: ImagePayload { image, target: 0 },
        })
        .await
    }

    /// Persist the instance settings in the host
    async fn set_settings(&self, context: &str, settings: serde_json::Value) -> Result<()> {
        self.send(OutboundMessage::SetSettings {
            context: context.to_string(),
            payload: settings,
        })
        .await
    }

    /// Flash the warning triangle on the key
    async fn show_alert(&self, context: &str) -> Result<()> {
        self.send(OutboundMessage::ShowAlert {
            context: context.to_string(),
        })
        .await
    }
}
