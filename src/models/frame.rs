//! Rendering models

use serde::{Deserialize, Serialize};

use super::TrendStyle;

/// Face layout drawn on the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Price line and area chart over the recent hours
    #[default]
    Compact,
    /// 24h low/high range gauge
    Extended,
}

impl RenderStyle {
    pub fn toggled(self) -> Self {
        match self {
            RenderStyle::Compact => RenderStyle::Extended,
            RenderStyle::Extended => RenderStyle::Compact,
        }
    }

    /// Parse a host setting value, falling back to Compact
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "extended" => RenderStyle::Extended,
            _ => RenderStyle::Compact,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStyle::Compact => "compact",
            RenderStyle::Extended => "extended",
        }
    }
}

/// Formatted text of a frame, kept as the fallback for failed fetches
#[derive(Debug, Clone, PartialEq)]
pub struct FrameValues {
    pub label: String,
    pub price: String,
    pub change: String,
    pub trend: TrendStyle,
}
