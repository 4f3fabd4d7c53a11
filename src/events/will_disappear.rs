use crate::api::streamdeck::ActionEvent;
use crate::instance::InstanceRegistry;

/// Key left the screen: stop its timer and drop its state
pub fn execute(registry: &mut InstanceRegistry, ev: &ActionEvent) {
    registry.disappear(&ev.context);
}
