use thiserror::Error;

use crate::api::binance::ApiError;

/// Errors that stop the plugin from starting or from talking to the host
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Market data error: {0}")]
    Api(#[from] ApiError),
    #[error("Host connection closed")]
    HostClosed,
}

pub type Result<T, E = PluginError> = std::result::Result<T, E>;
