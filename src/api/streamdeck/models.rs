use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sent once after connecting so the host knows which plugin this is
#[derive(Debug, Clone, Serialize)]
pub struct RegisterMessage {
    pub event: String,
    pub uuid: String,
}

/// Events the host sends to the plugin
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InboundEvent {
    WillAppear(ActionEvent),
    WillDisappear(ActionEvent),
    KeyDown(ActionEvent),
    DidReceiveSettings(ActionEvent),
    #[serde(other)]
    Other,
}

/// Common shape of action-scoped events
#[derive(Debug, Clone, Deserialize)]
pub struct ActionEvent {
    pub action: String,
    /// Opaque id of the key instance
    pub context: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub payload: ActionPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub settings: Value,
}

/// Commands the plugin sends to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundMessage {
    SetImage { context: String, payload: ImagePayload },
    SetSettings { context: String, payload: Value },
    ShowAlert { context: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    pub image: String,
    /// 0 = hardware and software
    pub target: u8,
}
