use crate::api::streamdeck::ActionEvent;
use crate::instance::InstanceRegistry;

/// Key became visible: create its instance and start polling
pub fn execute(registry: &mut InstanceRegistry, ev: &ActionEvent) {
    tracing::debug!("willAppear {} ({}) on {:?}", ev.context, ev.action, ev.device);
    registry.appear(&ev.context, &ev.payload.settings);
}
