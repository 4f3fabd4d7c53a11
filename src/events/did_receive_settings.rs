use crate::api::streamdeck::ActionEvent;
use crate::instance::InstanceRegistry;

pub fn execute(registry: &mut InstanceRegistry, ev: &ActionEvent) {
    registry.update_settings(&ev.context, &ev.payload.settings);
}
