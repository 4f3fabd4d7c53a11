use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::models::{InboundEvent, OutboundMessage, RegisterMessage};
use crate::api::HostSurface;
use crate::config::LaunchArgs;
use crate::utils::errors::{PluginError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const OUTBOUND_CAPACITY: usize = 64;

/// Cloneable handle for sending commands to the host
#[derive(Debug, Clone)]
pub struct HostSender {
    tx: mpsc::Sender<OutboundMessage>,
}

#[async_trait]
impl HostSurface for HostSender {
    async fn send(&self, message: OutboundMessage) -> Result<()> {
        self.tx.send(message).await.map_err(|_| PluginError::HostClosed)
    }
}

/// Incoming side of the host connection
pub struct HostEvents {
    stream: SplitStream<WsStream>,
    writer: JoinHandle<()>,
}

impl HostEvents {
    /// Next event from the host, None once the connection is closed
    pub async fn next_event(&mut self) -> Option<Result<InboundEvent>> {
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(text.as_str()).map_err(PluginError::from));
                }
                Ok(Message::Close(frame)) => {
                    info!("Host closed the connection: {:?}", frame);
                    return None;
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
        None
    }
}

impl Drop for HostEvents {
    fn drop(&mut self) {
        self.writer.abort();
    }
}

/// Connect to the host's local WebSocket and register the plugin
pub async fn connect(args: &LaunchArgs) -> Result<(HostSender, HostEvents)> {
    let url = args.websocket_url();
    info!("Connecting to host at {}", url);

    let (ws, _) = connect_async(url.as_str()).await?;
    let (mut sink, stream) = ws.split();

    let register = RegisterMessage {
        event: args.register_event.clone(),
        uuid: args.plugin_uuid.clone(),
    };
    sink.send(Message::Text(serde_json::to_string(&register)?.into())).await?;
    info!("Registered plugin {}", args.plugin_uuid);

    let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
    let writer = tokio::spawn(run_writer(sink, rx));

    Ok((HostSender { tx }, HostEvents { stream, writer }))
}

async fn run_writer(mut sink: SplitSink<WsStream, Message>, mut rx: mpsc::Receiver<OutboundMessage>) {
    while let Some(message) = rx.recv().await {
        let text = match serde_json::to_string(&message) {
            Ok(text) => text,
            Err(e) => {
                warn!("Dropping unserializable host message: {}", e);
                continue;
            }
        };

        if let Err(e) = sink.send(Message::Text(text.into())).await {
            error!("Failed to write to host: {}", e);
            break;
        }
    }
    debug!("Host writer stopped");
}
