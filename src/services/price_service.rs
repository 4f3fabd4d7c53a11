/// Shown instead of a price when no value is available
pub const PLACEHOLDER_PRICE: &str = "--.--";
/// Shown instead of a percent change when no value is available
pub const PLACEHOLDER_CHANGE: &str = "--.--%";

/// Significant digits kept for prices between 1 and 100
const MAX_SIGNIFICANT_DIGITS: usize = 8;
/// Decimal places kept for prices below 1, before trailing zeros are stripped
const SUB_UNIT_DECIMALS: usize = 8;

/// Format a price for the key face.
///
/// Precision depends on magnitude so that both large and sub-cent prices stay
/// legible in a fixed-width label:
/// * `>= 100,000`: rounded integer, grouped
/// * `>= 100`: two decimals, grouped
/// * `>= 1`: up to 8 significant digits, trailing zeros stripped, grouped
/// * `< 1`: 8 decimals with trailing zeros stripped
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return PLACEHOLDER_PRICE.to_string();
    }

    // A value rounded up into the next tier is formatted by that tier
    if price < 1.0 {
        let rounded = round_half_away(price, SUB_UNIT_DECIMALS);
        if rounded < 1.0 {
            return strip_trailing_zeros(&format!("{:.*}", SUB_UNIT_DECIMALS, rounded));
        }
    }
    if price < 100.0 {
        let decimals = MAX_SIGNIFICANT_DIGITS.saturating_sub(integer_digits(price) + 1);
        let rounded = round_half_away(price, decimals);
        if rounded < 100.0 {
            return group_thousands(&strip_trailing_zeros(&format!("{:.*}", decimals, rounded)));
        }
    }
    if price < 100_000.0 {
        let rounded = round_half_away(price, 2);
        if rounded < 100_000.0 {
            return group_thousands(&format!("{:.2}", rounded));
        }
    }
    group_thousands(&format!("{:.0}", round_half_away(price, 0)))
}

/// Format the absolute percent change with two decimals, e.g. `0.23%`.
/// The direction is carried by the trend arrow.
pub fn format_change_percent(percent: f64) -> String {
    if !percent.is_finite() {
        return PLACEHOLDER_CHANGE.to_string();
    }
    format!("{:.2}%", round_half_away(percent.abs(), 2))
}

/// Round to `decimals` places with ties away from zero
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn integer_digits(value: f64) -> usize {
    (value.abs().trunc() as u64).to_string().len()
}

/// Drop trailing zeros after the decimal point, and the point itself if nothing is left
fn strip_trailing_zeros(number: &str) -> String {
    if !number.contains('.') {
        return number.to_string();
    }
    number
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Insert `,` separators into the integer part of a plain decimal string
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
