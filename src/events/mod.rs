pub mod will_appear;
pub mod will_disappear;
pub mod key_down;
pub mod did_receive_settings;

use tracing::debug;

use crate::api::streamdeck::InboundEvent;
use crate::instance::InstanceRegistry;

/// Route one host event to its handler
pub async fn handle_event(registry: &mut InstanceRegistry, event: InboundEvent) {
    match event {
        InboundEvent::WillAppear(ev) => will_appear::execute(registry, &ev),
        InboundEvent::WillDisappear(ev) => will_disappear::execute(registry, &ev),
        InboundEvent::KeyDown(ev) => key_down::execute(registry, &ev).await,
        InboundEvent::DidReceiveSettings(ev) => did_receive_settings::execute(registry, &ev),
        InboundEvent::Other => debug!("Ignoring unhandled host event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginConfig;
    use crate::instance::registry::tests::{wait_for_images, RecordingHost};
    use crate::services::ticker_service::tests::FakeMarket;
    use std::sync::Arc;
    use std::time::Duration;

    fn parse(raw: &str) -> InboundEvent {
        serde_json::from_str(raw).expect("Parse failed")
    }

    #[tokio::test]
    async fn test_event_sequence() {
        let market = Arc::new(FakeMarket::rising());
        let host = Arc::new(RecordingHost::default());
        let config = PluginConfig::new().with_poll_interval(Duration::from_secs(3600));
        let mut registry = InstanceRegistry::new(config, market, host.clone());

        handle_event(
            &mut registry,
            parse(r#"{"action":"a","event":"willAppear","context":"ctx-1","payload":{"settings":{"symbol":"ETHUSDT"}}}"#),
        )
        .await;
        let images = wait_for_images(&host, 1).await;
        assert!(images[0].1.contains(">ETH</text>"));

        handle_event(&mut registry, parse(r#"{"action":"a","event":"keyDown","context":"ctx-1","payload":{}}"#)).await;
        wait_for_images(&host, 2).await;
        assert_eq!(host.settings_writes().len(), 1);

        handle_event(&mut registry, parse(r#"{"event":"systemDidWakeUp"}"#)).await;
        assert_eq!(registry.len(), 1);

        handle_event(
            &mut registry,
            parse(r#"{"action":"a","event":"willDisappear","context":"ctx-1","payload":{}}"#),
        )
        .await;
        assert!(registry.is_empty());
    }
}
