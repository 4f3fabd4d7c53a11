use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::worker::Worker;
use crate::api::{HostSurface, MarketData};
use crate::config::PluginConfig;
use crate::models::{InstanceSettings, RenderStyle};
use crate::utils::KeyCooldown;

/// State owned by one on-screen key
pub struct Instance {
    settings: watch::Sender<InstanceSettings>,
    wake: Arc<Notify>,
    cooldown: KeyCooldown,
    worker: JoinHandle<()>,
}

impl Instance {
    pub fn settings(&self) -> InstanceSettings {
        self.settings.borrow().clone()
    }

    /// Ask the worker to render now. Coalesces with a pending request.
    fn wake(&self) {
        self.wake.notify_one();
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// Outcome of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Style switched and a refresh was requested
    Toggled(RenderStyle),
    /// Inside the cooldown window, nothing happened
    Ignored(Duration),
    /// No instance with that context
    Unknown,
}

/// All visible keys, keyed by the host's context id
pub struct InstanceRegistry {
    instances: HashMap<String, Instance>,
    market: Arc<dyn MarketData>,
    host: Arc<dyn HostSurface>,
    config: PluginConfig,
}

impl InstanceRegistry {
    pub fn new(config: PluginConfig, market: Arc<dyn MarketData>, host: Arc<dyn HostSurface>) -> Self {
        Self {
            instances: HashMap::new(),
            market,
            host,
            config,
        }
    }

    fn normalize(&self, raw: &Value) -> InstanceSettings {
        InstanceSettings::from_json(raw, &self.config.default_symbol, self.config.key_cooldown)
    }

    /// Create the instance for a key and start its worker.
    /// An existing instance with the same context is replaced.
    pub fn appear(&mut self, context: &str, raw_settings: &Value) {
        let settings = self.normalize(raw_settings);
        info!("🟢 {} appeared ({}, {})", context, settings.symbol, settings.style.as_str());

        let (settings_tx, settings_rx) = watch::channel(settings);
        let wake = Arc::new(Notify::new());
        let worker = Worker::new(
            context.to_string(),
            settings_rx,
            Arc::clone(&wake),
            Arc::clone(&self.market),
            Arc::clone(&self.host),
            self.config.poll_interval,
        )
        .spawn();

        let instance = Instance {
            settings: settings_tx,
            wake,
            cooldown: KeyCooldown::new(),
            worker,
        };

        if self.instances.insert(context.to_string(), instance).is_some() {
            debug!("Replaced existing instance {}", context);
        }
    }

    /// Stop the worker and forget the key. Returns false if it was unknown.
    pub fn disappear(&mut self, context: &str) -> bool {
        match self.instances.remove(context) {
            Some(_) => {
                info!("⚪ {} disappeared", context);
                true
            }
            None => {
                debug!("Disappear for unknown instance {}", context);
                false
            }
        }
    }

    /// New settings from the host. Unknown keys are created.
    pub fn update_settings(&mut self, context: &str, raw_settings: &Value) {
        let settings = self.normalize(raw_settings);

        match self.instances.get(context) {
            Some(instance) => {
                debug!("Settings for {}: {:?}", context, settings);
                instance.settings.send_replace(settings);
                instance.wake();
            }
            None => self.appear(context, raw_settings),
        }
    }

    /// Handle a key press: toggle the style and refresh, unless still cooling down
    pub async fn key_down(&mut self, context: &str, now: Instant) -> KeyPress {
        let Some(instance) = self.instances.get_mut(context) else {
            warn!("Key press for unknown instance {}", context);
            return KeyPress::Unknown;
        };

        let mut settings = instance.settings();
        if let Err(remaining) = instance.cooldown.check(now, settings.cooldown) {
            return KeyPress::Ignored(remaining);
        }

        settings.style = settings.style.toggled();
        let style = settings.style;
        let persisted = settings.to_json();
        instance.settings.send_replace(settings);
        instance.wake();

        if let Err(e) = self.host.set_settings(context, persisted).await {
            warn!("Failed to persist settings for {}: {}", context, e);
        }

        KeyPress::Toggled(style)
    }

    pub fn get(&self, context: &str) -> Option<&Instance> {
        self.instances.get(context)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::api::streamdeck::OutboundMessage;
    use crate::services::ticker_service::tests::FakeMarket;
    use crate::utils::errors::Result;
    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    /// Host that keeps everything it is sent
    #[derive(Default)]
    pub struct RecordingHost {
        pub sent: Mutex<Vec<OutboundMessage>>,
    }

    impl RecordingHost {
        pub fn images(&self) -> Vec<(String, String)> {
            self.sent
                .lock()
                .expect("Poisoned")
                .iter()
                .filter_map(|m| match m {
                    OutboundMessage::SetImage { context, payload } => {
                        let encoded = payload.image.trim_start_matches("data:image/svg+xml;base64,");
                        let svg = String::from_utf8(BASE64.decode(encoded).expect("Bad base64")).expect("Bad UTF-8");
                        Some((context.clone(), svg))
                    }
                    _ => None,
                })
                .collect()
        }

        pub fn settings_writes(&self) -> Vec<Value> {
            self.sent
                .lock()
                .expect("Poisoned")
                .iter()
                .filter_map(|m| match m {
                    OutboundMessage::SetSettings { payload, .. } => Some(payload.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl RecordingHost {
        pub fn alerts(&self) -> usize {
            self.sent
                .lock()
                .expect("Poisoned")
                .iter()
                .filter(|m| matches!(m, OutboundMessage::ShowAlert { .. }))
                .count()
        }
    }

    #[async_trait]
    impl HostSurface for RecordingHost {
        async fn send(&self, message: OutboundMessage) -> Result<()> {
            self.sent.lock().expect("Poisoned").push(message);
            Ok(())
        }
    }

    pub async fn wait_for_images(host: &RecordingHost, count: usize) -> Vec<(String, String)> {
        for _ in 0..200 {
            let images = host.images();
            if images.len() >= count {
                return images;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Expected {} images, got {}", count, host.images().len());
    }

    fn registry(market: Arc<FakeMarket>, host: Arc<RecordingHost>) -> InstanceRegistry {
        let config = PluginConfig::new().with_poll_interval(Duration::from_secs(3600));
        InstanceRegistry::new(config, market, host)
    }

    #[tokio::test]
    async fn test_appear_renders_immediately() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({ "symbol": "btcusdt" }));
        let images = wait_for_images(&host, 1).await;

        assert_eq!(registry.len(), 1);
        assert_eq!(images[0].0, "ctx-1");
        assert!(images[0].1.contains(">BTC</text>"));
        assert!(images[0].1.contains("<polyline"));
    }

    #[tokio::test]
    async fn test_fetch_failure_without_history_shows_placeholder() {
        let market = Arc::new(FakeMarket::rising());
        market.set_online(false);
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({}));
        let images = wait_for_images(&host, 1).await;

        assert!(images[0].1.contains(">--.--</text>"));
        assert!(images[0].1.contains(r#"opacity="0.4""#));
    }

    #[tokio::test]
    async fn test_key_press_toggles_style_and_respects_cooldown() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({ "cooldown": 30 }));
        wait_for_images(&host, 1).await;

        let start = Instant::now();
        assert_eq!(registry.key_down("ctx-1", start).await, KeyPress::Toggled(RenderStyle::Extended));
        let images = wait_for_images(&host, 2).await;
        assert!(images[1].1.contains(">H</text>"));
        assert_eq!(host.settings_writes()[0]["style"], "extended");

        let second = registry.key_down("ctx-1", start + Duration::from_secs(10)).await;
        assert_eq!(second, KeyPress::Ignored(Duration::from_secs(20)));
        assert_eq!(
            registry.get("ctx-1").map(|i| i.settings().style),
            Some(RenderStyle::Extended)
        );

        let third = registry.key_down("ctx-1", start + Duration::from_secs(30)).await;
        assert_eq!(third, KeyPress::Toggled(RenderStyle::Compact));
    }

    #[tokio::test]
    async fn test_key_press_for_unknown_instance() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(market, host);

        assert_eq!(registry.key_down("missing", Instant::now()).await, KeyPress::Unknown);
    }

    #[tokio::test]
    async fn test_disappear_stops_polling() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({}));
        wait_for_images(&host, 1).await;

        assert!(registry.disappear("ctx-1"));
        assert!(!registry.disappear("ctx-1"));
        assert!(registry.is_empty());

        let calls = market.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(market.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_settings_update_re_renders() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.update_settings("ctx-1", &json!({ "symbol": "ETHUSDT" }));
        wait_for_images(&host, 1).await;
        assert_eq!(registry.len(), 1);

        registry.update_settings("ctx-1", &json!({ "symbol": "SOLUSDT", "style": "extended" }));
        let images = wait_for_images(&host, 2).await;

        assert!(images[1].1.contains(">SOL</text>"));
        assert!(images[1].1.contains(">L</text>"));
    }

    #[tokio::test]
    async fn test_symbol_change_drops_cached_frame() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({ "symbol": "BTCUSDT" }));
        wait_for_images(&host, 1).await;

        market.set_online(false);
        registry.update_settings("ctx-1", &json!({ "symbol": "BTCUSTD" }));
        let images = wait_for_images(&host, 2).await;

        assert!(!images[1].1.contains(">BTC</text>"));
        assert!(images[1].1.contains(">--.--</text>"));
        assert_eq!(host.alerts(), 1);
    }

    #[tokio::test]
    async fn test_same_symbol_keeps_cached_frame() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({ "symbol": "BTCUSDT" }));
        wait_for_images(&host, 1).await;

        market.set_online(false);
        registry.update_settings("ctx-1", &json!({ "symbol": "BTCUSDT", "style": "extended" }));
        let images = wait_for_images(&host, 2).await;

        assert!(images[1].1.contains(">BTC</text>"));
        assert_eq!(host.alerts(), 0);
    }

    #[tokio::test]
    async fn test_instances_are_independent() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let mut registry = registry(Arc::clone(&market), Arc::clone(&host));

        registry.appear("ctx-1", &json!({ "symbol": "BTCUSDT" }));
        registry.appear("ctx-2", &json!({ "symbol": "ETHUSDT", "style": "extended" }));
        let images = wait_for_images(&host, 2).await;

        let contexts: Vec<&str> = images.iter().map(|(c, _)| c.as_str()).collect();
        assert!(contexts.contains(&"ctx-1"));
        assert!(contexts.contains(&"ctx-2"));

        registry.disappear("ctx-1");
        assert!(registry.get("ctx-1").is_none());
        assert_eq!(registry.get("ctx-2").map(|i| i.settings().symbol), Some("ETHUSDT".to_string()));
    }
}
