//! Per-instance settings stored by the host

use std::time::Duration;

use serde_json::{json, Value};

use super::RenderStyle;

/// Normalized settings of one key
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSettings {
    pub symbol: String,
    pub style: RenderStyle,
    pub cooldown: Duration,
}

impl InstanceSettings {
    pub const MIN_COOLDOWN_SECS: u64 = 1;
    pub const MAX_COOLDOWN_SECS: u64 = 60;

    /// Build settings from the host's JSON payload.
    /// Missing or unusable values fall back to the given defaults.
    pub fn from_json(value: &Value, default_symbol: &str, default_cooldown: Duration) -> Self {
        let symbol = value
            .get("symbol")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_symbol.to_uppercase());

        let style = value
            .get("style")
            .and_then(Value::as_str)
            .map(RenderStyle::from_setting)
            .unwrap_or_default();

        // The property inspector may send numbers as strings
        let cooldown_secs = match value.get("cooldown") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .unwrap_or(default_cooldown.as_secs());

        Self {
            symbol,
            style,
            cooldown: Duration::from_secs(clamp_cooldown(cooldown_secs)),
        }
    }

    /// Settings object written back to the host
    pub fn to_json(&self) -> Value {
        json!({
            "symbol": self.symbol,
            "style": self.style.as_str(),
            "cooldown": self.cooldown.as_secs(),
        })
    }

    /// Short label for the key, e.g. "BTC" for "BTCUSDT"
    pub fn label(&self) -> String {
        let base = self
            .symbol
            .strip_suffix("USDT")
            .or_else(|| self.symbol.strip_suffix("USDC"))
            .unwrap_or(&self.symbol);

        if base.is_empty() {
            self.symbol.clone()
        } else {
            base.to_string()
        }
    }
}

pub fn clamp_cooldown(secs: u64) -> u64 {
    secs.clamp(InstanceSettings::MIN_COOLDOWN_SECS, InstanceSettings::MAX_COOLDOWN_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

    #[test]
    fn test_defaults_for_empty_settings() {
        let settings = InstanceSettings::from_json(&json!({}), "BTCUSDT", DEFAULT_COOLDOWN);

        assert_eq!(settings.symbol, "BTCUSDT");
        assert_eq!(settings.style, RenderStyle::Compact);
        assert_eq!(settings.cooldown, DEFAULT_COOLDOWN);
        assert_eq!(settings.label(), "BTC");
    }

    #[test]
    fn test_symbol_is_normalized() {
        let settings = InstanceSettings::from_json(
            &json!({ "symbol": "  ethusdc ", "style": "Extended" }),
            "BTCUSDT",
            DEFAULT_COOLDOWN,
        );

        assert_eq!(settings.symbol, "ETHUSDC");
        assert_eq!(settings.label(), "ETH");
        assert_eq!(settings.style, RenderStyle::Extended);
    }

    #[test]
    fn test_blank_symbol_uses_default() {
        let settings = InstanceSettings::from_json(&json!({ "symbol": "   " }), "solusdt", DEFAULT_COOLDOWN);
        assert_eq!(settings.symbol, "SOLUSDT");
    }

    #[test]
    fn test_unknown_style_is_compact() {
        let settings = InstanceSettings::from_json(&json!({ "style": "huge" }), "BTCUSDT", DEFAULT_COOLDOWN);
        assert_eq!(settings.style, RenderStyle::Compact);
    }

    #[test]
    fn test_cooldown_is_clamped() {
        let low = InstanceSettings::from_json(&json!({ "cooldown": 0 }), "BTCUSDT", DEFAULT_COOLDOWN);
        let high = InstanceSettings::from_json(&json!({ "cooldown": "600" }), "BTCUSDT", DEFAULT_COOLDOWN);
        let text = InstanceSettings::from_json(&json!({ "cooldown": "5" }), "BTCUSDT", DEFAULT_COOLDOWN);

        assert_eq!(low.cooldown, Duration::from_secs(1));
        assert_eq!(high.cooldown, Duration::from_secs(60));
        assert_eq!(text.cooldown, Duration::from_secs(5));
    }

    #[test]
    fn test_label_keeps_non_stable_quotes() {
        let settings = InstanceSettings::from_json(&json!({ "symbol": "ETHBTC" }), "BTCUSDT", DEFAULT_COOLDOWN);
        assert_eq!(settings.label(), "ETHBTC");
    }

    #[test]
    fn test_to_json_round_trips_style() {
        let settings = InstanceSettings {
            symbol: "BTCUSDT".to_string(),
            style: RenderStyle::Extended,
            cooldown: Duration::from_secs(10),
        };
        let value = settings.to_json();

        assert_eq!(value["style"], "extended");
        assert_eq!(InstanceSettings::from_json(&value, "XRPUSDT", DEFAULT_COOLDOWN), settings);
    }
}
