use chrono::{Duration, NaiveDateTime, Timelike};

use crate::models::TickerSummary;

/// Canvas size of a key image, in pixels
pub const CANVAS_SIZE: f64 = 100.0;

/// Vertical band the price line is drawn in (Compact)
pub const CHART_TOP: f64 = 64.0;
pub const CHART_BOTTOM: f64 = 88.0;
/// The filled area runs down to the canvas edge
pub const AREA_BOTTOM: f64 = CANVAS_SIZE;
pub const CHART_WIDTH: f64 = CANVAS_SIZE;

/// Horizontal band of the range gauge (Extended)
pub const GAUGE_LEFT: f64 = 8.0;
pub const GAUGE_RIGHT: f64 = 92.0;

/// Number of grid positions on the time axis
pub const TIME_SLOTS: usize = 5;
/// Grid position that carries the current hour
const CURRENT_HOUR_SLOT: usize = 3;
const HOURS_PER_SLOT: i64 = 3;

/// Pixel geometry of the Compact price chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    /// Price line, one point per sample
    pub line: Vec<(f64, f64)>,
    /// Line points closed down to the canvas bottom
    pub area: Vec<(f64, f64)>,
    /// Y of the series mean
    pub average_y: f64,
}

/// Marker positions of the Extended range gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub average_x: f64,
    pub current_x: f64,
}

/// One grid line of the time axis
#[derive(Debug, Clone, PartialEq)]
pub struct TimeLabel {
    pub x: f64,
    pub text: Option<String>,
}

/// Map a price series into the chart band.
/// Returns None when there are fewer than 2 samples.
pub fn chart_geometry(closes: &[f64]) -> Option<ChartGeometry> {
    if closes.len() < 2 {
        return None;
    }

    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = non_zero_range(max - min);
    let step_x = CHART_WIDTH / (closes.len() - 1) as f64;

    let to_y = |v: f64| CHART_BOTTOM - ((v - min) / range) * (CHART_BOTTOM - CHART_TOP);

    let line: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &v)| (step_x * i as f64, to_y(v)))
        .collect();

    let last_x = step_x * (closes.len() - 1) as f64;
    let mut area = line.clone();
    area.push((last_x, AREA_BOTTOM));
    area.push((0.0, AREA_BOTTOM));

    let mean = closes.iter().sum::<f64>() / closes.len() as f64;

    Some(ChartGeometry {
        line,
        area,
        average_y: to_y(mean),
    })
}

/// Place the 24h average and current price inside the low/high band
pub fn gauge_geometry(summary: &TickerSummary) -> GaugeGeometry {
    GaugeGeometry {
        average_x: gauge_position(summary.weighted_avg_price, summary.low_price, summary.high_price),
        current_x: gauge_position(summary.last_price, summary.low_price, summary.high_price),
    }
}

/// Linear map of `price` from [low, high] onto the gauge band, clamped to the band
pub fn gauge_position(price: f64, low: f64, high: f64) -> f64 {
    let range = non_zero_range(high - low);
    let x = GAUGE_LEFT + ((price - low) / range) * (GAUGE_RIGHT - GAUGE_LEFT);
    if x.is_nan() {
        return GAUGE_LEFT;
    }
    x.clamp(GAUGE_LEFT, GAUGE_RIGHT)
}

/// Grid lines of the coarse time axis.
///
/// Slot 3 carries the current hour; slots 0 to 2 step back 3 hours each.
/// The last slot is an unlabeled grid line.
pub fn time_labels(now: NaiveDateTime) -> Vec<TimeLabel> {
    let spacing = CANVAS_SIZE / TIME_SLOTS as f64;

    (0..TIME_SLOTS)
        .map(|slot| {
            let x = spacing * slot as f64 + spacing / 2.0;
            let text = (slot <= CURRENT_HOUR_SLOT).then(|| {
                let hours_back = (CURRENT_HOUR_SLOT - slot) as i64 * HOURS_PER_SLOT;
                hour_12((now - Duration::hours(hours_back)).hour()).to_string()
            });
            TimeLabel { x, text }
        })
        .collect()
}

/// 0..=23 to 1..=12
fn hour_12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn non_zero_range(range: f64) -> f64 {
    if range == 0.0 || !range.is_finite() {
        1.0
    } else {
        range
    }
}
