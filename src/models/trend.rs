//! Trend direction and its colors

/// Direction of the 24h price change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Arrow glyph, arrow color and background tint for a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendStyle {
    pub trend: Trend,
    pub arrow: &'static str,
    pub arrow_color: &'static str,
    pub tint_color: &'static str,
}
