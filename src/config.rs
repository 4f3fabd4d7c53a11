use std::time::Duration;

use tracing::warn;

use crate::models::settings::clamp_cooldown;
use crate::utils::errors::{PluginError, Result};

/// Plugin-wide settings read from the environment
#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub api_base_url: String,
    pub default_symbol: String,
    pub poll_interval: Duration,
    pub key_cooldown: Duration,
    pub http_timeout: Duration,
}

impl PluginConfig {
    const DEFAULT_API_BASE_URL: &'static str = "https://api.binance.com";
    const DEFAULT_SYMBOL: &'static str = "BTCUSDT";
    const DEFAULT_POLL_SECS: u64 = 60;
    const DEFAULT_COOLDOWN_SECS: u64 = 60;
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

    pub fn new() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            default_symbol: Self::DEFAULT_SYMBOL.to_string(),
            poll_interval: Duration::from_secs(Self::DEFAULT_POLL_SECS),
            key_cooldown: Duration::from_secs(Self::DEFAULT_COOLDOWN_SECS),
            http_timeout: Duration::from_secs(Self::DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Read overrides from `TICKER_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("TICKER_API_BASE_URL") {
            config = config.with_api_base_url(&url);
        }
        if let Ok(symbol) = std::env::var("TICKER_DEFAULT_SYMBOL") {
            config = config.with_default_symbol(&symbol);
        }
        if let Some(secs) = env_secs("TICKER_POLL_SECS") {
            config = config.with_poll_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = env_secs("TICKER_KEY_COOLDOWN_SECS") {
            config = config.with_key_cooldown(Duration::from_secs(secs));
        }
        if let Some(secs) = env_secs("TICKER_HTTP_TIMEOUT_SECS") {
            config = config.with_http_timeout(Duration::from_secs(secs));
        }

        config
    }

    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_symbol(mut self, symbol: &str) -> Self {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() {
            self.default_symbol = symbol;
        }
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_secs(1));
        self
    }

    pub fn with_key_cooldown(mut self, cooldown: Duration) -> Self {
        self.key_cooldown = Duration::from_secs(clamp_cooldown(cooldown.as_secs()));
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_secs(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

/// Arguments the host passes when it launches the plugin
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchArgs {
    pub port: u16,
    pub plugin_uuid: String,
    pub register_event: String,
    pub info: Option<serde_json::Value>,
}

impl LaunchArgs {
    /// Parse `-port <n> -pluginUUID <id> -registerEvent <name> -info <json>`
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut port = None;
        let mut plugin_uuid = None;
        let mut register_event = None;
        let mut info = None;

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "-port" => {
                    let value = flag_value(&mut args, &flag)?;
                    let parsed = value
                        .parse::<u16>()
                        .map_err(|e| PluginError::Config(format!("Invalid port '{}': {}", value, e)))?;
                    port = Some(parsed);
                }
                "-pluginUUID" => plugin_uuid = Some(flag_value(&mut args, &flag)?),
                "-registerEvent" => register_event = Some(flag_value(&mut args, &flag)?),
                "-info" => {
                    let value = flag_value(&mut args, &flag)?;
                    let parsed: serde_json::Value = serde_json::from_str(&value)
                        .map_err(|e| PluginError::Config(format!("Invalid -info JSON: {}", e)))?;
                    info = Some(parsed);
                }
                _ => continue,
            }
        }

        Ok(Self {
            port: port.ok_or_else(|| PluginError::Config("-port is required".to_string()))?,
            plugin_uuid: plugin_uuid
                .ok_or_else(|| PluginError::Config("-pluginUUID is required".to_string()))?,
            register_event: register_event
                .ok_or_else(|| PluginError::Config("-registerEvent is required".to_string()))?,
            info,
        })
    }

    pub fn websocket_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }
}

fn flag_value<I>(args: &mut I, flag: &str) -> Result<String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| PluginError::Config(format!("Missing value for {}", flag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_launch_args() {
        let parsed = LaunchArgs::parse(args(&[
            "-port", "28196",
            "-pluginUUID", "ABC123",
            "-registerEvent", "registerPlugin",
            "-info", r#"{"application":{"version":"6.5"}}"#,
        ]))
        .expect("Parse failed");

        assert_eq!(parsed.port, 28196);
        assert_eq!(parsed.plugin_uuid, "ABC123");
        assert_eq!(parsed.register_event, "registerPlugin");
        assert_eq!(parsed.websocket_url(), "ws://127.0.0.1:28196");
        assert!(parsed.info.is_some());
    }

    #[test]
    fn test_missing_port_is_error() {
        let result = LaunchArgs::parse(args(&["-pluginUUID", "ABC", "-registerEvent", "registerPlugin"]));
        assert!(matches!(result, Err(PluginError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = LaunchArgs::parse(args(&[
            "-port", "notaport", "-pluginUUID", "ABC", "-registerEvent", "registerPlugin",
        ]));
        assert!(matches!(result, Err(PluginError::Config(_))));
    }

    #[test]
    fn test_flag_without_value_is_error() {
        let result = LaunchArgs::parse(args(&["-port"]));
        assert!(matches!(result, Err(PluginError::Config(_))));
    }

    #[test]
    fn test_malformed_info_is_config_error() {
        let result = LaunchArgs::parse(args(&[
            "-port", "1", "-pluginUUID", "X", "-registerEvent", "reg", "-info", "{not json",
        ]));
        assert!(matches!(result, Err(PluginError::Config(_))));
    }

    #[test]
    fn test_unknown_args_are_skipped() {
        let parsed = LaunchArgs::parse(args(&[
            "plugin-binary", "-port", "1", "-pluginUUID", "X", "-registerEvent", "reg",
        ]))
        .expect("Parse failed");

        assert_eq!(parsed.port, 1);
        assert!(parsed.info.is_none());
    }

    #[test]
    fn test_config_builder_clamps_cooldown() {
        let config = PluginConfig::new()
            .with_key_cooldown(Duration::from_secs(300))
            .with_api_base_url("http://localhost:8080/")
            .with_default_symbol(" ethusdt ");

        assert_eq!(config.key_cooldown, Duration::from_secs(60));
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.default_symbol, "ETHUSDT");
    }
}
