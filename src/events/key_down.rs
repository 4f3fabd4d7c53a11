use std::time::Instant;

use tracing::{debug, info};

use crate::api::streamdeck::ActionEvent;
use crate::instance::{InstanceRegistry, KeyPress};

/// Key pressed: switch between Compact and Extended and refresh.
/// Presses inside the cooldown window are dropped.
pub async fn execute(registry: &mut InstanceRegistry, ev: &ActionEvent) {
    match registry.key_down(&ev.context, Instant::now()).await {
        KeyPress::Toggled(style) => {
            let symbol = registry
                .get(&ev.context)
                .map(|instance| instance.settings().symbol)
                .unwrap_or_default();
            info!("🔁 {} ({}) switched to {}", symbol, ev.context, style.as_str());
        }
        KeyPress::Ignored(remaining) => {
            debug!(
                "[SKIPPED] {} pressed again within cooldown ({}s left)",
                ev.context,
                remaining.as_secs()
            );
        }
        KeyPress::Unknown => {}
    }
}
