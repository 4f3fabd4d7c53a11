pub mod client;
pub mod models;

pub use client::{connect, HostEvents, HostSender};
pub use models::{ActionEvent, ImagePayload, InboundEvent, OutboundMessage};
