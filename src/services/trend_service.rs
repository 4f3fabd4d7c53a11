use crate::models::{Trend, TrendStyle};

pub const UP: TrendStyle = TrendStyle {
    trend: Trend::Up,
    arrow: "▲",
    arrow_color: "#34C759",
    tint_color: "#275C35",
};

pub const DOWN: TrendStyle = TrendStyle {
    trend: Trend::Down,
    arrow: "▼",
    arrow_color: "#FF3B30",
    tint_color: "#650212",
};

pub const FLAT: TrendStyle = TrendStyle {
    trend: Trend::Flat,
    arrow: "■",
    arrow_color: "#5c5c5c",
    tint_color: "#4b4b4b",
};

/// Pick the arrow and colors from the sign of the price change.
/// NaN falls through to flat.
pub fn classify(price_change: f64) -> TrendStyle {
    if price_change > 0.0 {
        UP
    } else if price_change < 0.0 {
        DOWN
    } else {
        FLAT
    }
}
