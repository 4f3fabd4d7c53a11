use std::fmt::Write;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::NaiveDateTime;

use super::chart_service::{
    self, ChartGeometry, GaugeGeometry, CHART_BOTTOM, CHART_TOP, GAUGE_LEFT, GAUGE_RIGHT,
};
use super::{price_service, trend_service};
use crate::models::{FrameValues, MarketSnapshot, RenderStyle, TickerSummary};

/// Label shown when nothing is known about the ticker
pub const PLACEHOLDER_LABEL: &str = "--";

const GRID_GRAY: &str = "#3a3a3c";
const MUTED_TEXT: &str = "#8e8e93";
const PLACEHOLDER_ARROW_OPACITY: &str = "0.4";

const GAUGE_TOP: f64 = 70.0;
const GAUGE_HEIGHT: f64 = 8.0;

/// What goes under the header of the face
enum Body<'a> {
    Chart(Option<&'a ChartGeometry>),
    Gauge(Option<GaugeGeometry>),
}

/// Formatted header values for a fresh summary
pub fn frame_values(label: &str, summary: &TickerSummary) -> FrameValues {
    FrameValues {
        label: label.to_string(),
        price: price_service::format_price(summary.last_price),
        change: price_service::format_change_percent(summary.price_change_percent),
        trend: trend_service::classify(summary.price_change),
    }
}

/// Render a full frame from freshly fetched data.
/// Returns the SVG and the values to cache as the fallback.
pub fn render_snapshot(
    label: &str,
    snapshot: &MarketSnapshot,
    style: RenderStyle,
    now: NaiveDateTime,
) -> (String, FrameValues) {
    let values = frame_values(label, &snapshot.summary);

    let svg = match style {
        RenderStyle::Compact => {
            let chart = chart_service::chart_geometry(&snapshot.closes);
            render_face(&values, Body::Chart(chart.as_ref()), now, false)
        }
        RenderStyle::Extended => {
            let gauge = chart_service::gauge_geometry(&snapshot.summary);
            render_face(&values, Body::Gauge(Some(gauge)), now, false)
        }
    };

    (svg, values)
}

/// Re-render the last good values without chart geometry
pub fn render_cached(values: &FrameValues, style: RenderStyle, now: NaiveDateTime) -> String {
    render_face(values, empty_body(style), now, false)
}

/// Frame for an instance that has never fetched successfully
pub fn render_placeholder(style: RenderStyle, now: NaiveDateTime) -> String {
    let values = FrameValues {
        label: PLACEHOLDER_LABEL.to_string(),
        price: price_service::PLACEHOLDER_PRICE.to_string(),
        change: price_service::PLACEHOLDER_CHANGE.to_string(),
        trend: trend_service::FLAT,
    };
    render_face(&values, empty_body(style), now, true)
}

/// Wrap an SVG document as an image URI the host accepts
pub fn to_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

fn empty_body<'a>(style: RenderStyle) -> Body<'a> {
    match style {
        RenderStyle::Compact => Body::Chart(None),
        RenderStyle::Extended => Body::Gauge(None),
    }
}

fn render_face(values: &FrameValues, body: Body<'_>, now: NaiveDateTime, placeholder: bool) -> String {
    let trend = &values.trend;
    let grid_color = if placeholder { GRID_GRAY } else { trend.tint_color };

    let mut svg = String::with_capacity(2048);
    svg.push_str(r#"<svg width="100" height="100" viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg">"#);
    let _ = write!(
        svg,
        concat!(
            r#"<defs><linearGradient id="areaGradient" x1="0" y1="0" x2="0" y2="1">"#,
            r##"<stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="#000000"/>"##,
            r#"</linearGradient></defs>"#,
        ),
        trend.tint_color
    );
    svg.push_str(r##"<rect width="100" height="100" fill="#000000"/>"##);

    match body {
        Body::Chart(chart) => {
            write_time_grid(&mut svg, grid_color, now);
            if let Some(chart) = chart {
                write_chart(&mut svg, chart, trend.arrow_color);
            }
        }
        Body::Gauge(gauge) => {
            write_gauge_track(&mut svg, grid_color);
            if let Some(gauge) = gauge {
                write_gauge_markers(&mut svg, &gauge, trend.tint_color, trend.arrow_color);
            }
        }
    }

    let arrow_opacity = if placeholder {
        format!(r#" opacity="{}""#, PLACEHOLDER_ARROW_OPACITY)
    } else {
        String::new()
    };

    let _ = write!(
        svg,
        r#"<text x="6" y="22" font-size="20" font-weight="900" fill="white" font-family="Arial">{}</text>"#,
        escape_xml(&values.label)
    );
    let _ = write!(
        svg,
        r#"<text x="94" y="22" font-size="14" text-anchor="end" fill="{}"{} font-family="Arial">{}</text>"#,
        trend.arrow_color, arrow_opacity, trend.arrow
    );
    let _ = write!(
        svg,
        r#"<text x="6" y="42" font-size="15" font-weight="700" fill="white" font-family="Arial">{}</text>"#,
        escape_xml(&values.price)
    );
    let _ = write!(
        svg,
        r#"<text x="6" y="58" font-size="12" font-weight="700" fill="{}" font-family="Arial">{}</text>"#,
        trend.arrow_color,
        escape_xml(&values.change)
    );
    svg.push_str("</svg>");
    svg
}

fn write_time_grid(svg: &mut String, grid_color: &str, now: NaiveDateTime) {
    for label in chart_service::time_labels(now) {
        let x = fmt_num(label.x);
        let _ = write!(
            svg,
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{}" stroke-width="0.5" stroke-dasharray="1,2"/>"#,
            fmt_num(CHART_TOP - 4.0),
            fmt_num(CHART_BOTTOM + 2.0),
            grid_color,
        );
        if let Some(text) = label.text {
            let _ = write!(
                svg,
                r#"<text x="{x}" y="98" font-size="7" text-anchor="middle" fill="{}" font-family="Arial">{}</text>"#,
                MUTED_TEXT, text
            );
        }
    }
}

fn write_chart(svg: &mut String, chart: &ChartGeometry, line_color: &str) {
    let _ = write!(
        svg,
        r#"<polygon points="{}" fill="url(#areaGradient)"/>"#,
        fmt_points(&chart.area)
    );
    let avg = fmt_num(chart.average_y);
    let _ = write!(
        svg,
        r#"<line x1="0" y1="{avg}" x2="100" y2="{avg}" stroke="{}" stroke-width="1" stroke-dasharray="3,2" opacity="0.7"/>"#,
        MUTED_TEXT
    );
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2" stroke-linejoin="round"/>"#,
        fmt_points(&chart.line),
        line_color
    );
}

fn write_gauge_track(svg: &mut String, grid_color: &str) {
    let _ = write!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="0.5"/>"#,
        fmt_num(GAUGE_LEFT),
        fmt_num(GAUGE_TOP),
        fmt_num(GAUGE_RIGHT - GAUGE_LEFT),
        fmt_num(GAUGE_HEIGHT),
        grid_color
    );
    for quarter in 1..4 {
        let x = fmt_num(GAUGE_LEFT + (GAUGE_RIGHT - GAUGE_LEFT) * quarter as f64 / 4.0);
        let _ = write!(
            svg,
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{}" stroke-width="0.5" stroke-dasharray="1,2"/>"#,
            fmt_num(GAUGE_TOP),
            fmt_num(GAUGE_TOP + GAUGE_HEIGHT),
            grid_color
        );
    }
    let _ = write!(
        svg,
        r#"<text x="2" y="94" font-size="9" font-weight="700" fill="{}" font-family="Arial">L</text>"#,
        MUTED_TEXT
    );
    let _ = write!(
        svg,
        r#"<text x="98" y="94" font-size="9" font-weight="700" text-anchor="end" fill="{}" font-family="Arial">H</text>"#,
        MUTED_TEXT
    );
}

fn write_gauge_markers(svg: &mut String, gauge: &GaugeGeometry, bar_color: &str, marker_color: &str) {
    let _ = write!(
        svg,
        r#"<rect x="0" y="{}" width="{}" height="{}" fill="{}"/>"#,
        fmt_num(GAUGE_TOP),
        fmt_num(gauge.current_x),
        fmt_num(GAUGE_HEIGHT),
        bar_color
    );
    let avg = fmt_num(gauge.average_x);
    let _ = write!(
        svg,
        r#"<line x1="{avg}" y1="{}" x2="{avg}" y2="{}" stroke="{}" stroke-width="1"/>"#,
        fmt_num(GAUGE_TOP - 4.0),
        fmt_num(GAUGE_TOP + GAUGE_HEIGHT + 4.0),
        MUTED_TEXT
    );
    let cur = fmt_num(gauge.current_x);
    let _ = write!(
        svg,
        r#"<line x1="{cur}" y1="{}" x2="{cur}" y2="{}" stroke="{}" stroke-width="3"/>"#,
        fmt_num(GAUGE_TOP - 6.0),
        fmt_num(GAUGE_TOP + GAUGE_HEIGHT + 6.0),
        marker_color
    );
}

fn fmt_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", fmt_num(*x), fmt_num(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coordinates with at most 2 decimals and no trailing zeros
fn fmt_num(value: f64) -> String {
    // normalizes -0.0
    let value = if value == 0.0 { 0.0 } else { value };
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
