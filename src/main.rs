use std::sync::Arc;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod events;
mod instance;
mod models;
mod services;
mod utils;

use api::binance::BinanceClient;
use api::streamdeck;
use config::{LaunchArgs, PluginConfig};
use instance::InstanceRegistry;
use utils::errors::{PluginError, Result};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("crypto_ticker_deck=debug".parse().unwrap())
                .add_directive("tokio_tungstenite=warn".parse().unwrap())
                .add_directive("tungstenite=warn".parse().unwrap()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("🤖 Starting crypto ticker plugin v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Plugin stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = LaunchArgs::parse(std::env::args().skip(1))?;
    let config = PluginConfig::from_env();
    debug!("Launch args: {:?}", args);
    if let Some(version) = args
        .info
        .as_ref()
        .and_then(|info| info.pointer("/application/version"))
    {
        info!("Host application version {}", version);
    }
    info!(
        "Polling {} every {}s (key cooldown {}s)",
        config.api_base_url,
        config.poll_interval.as_secs(),
        config.key_cooldown.as_secs()
    );

    let market = BinanceClient::with_base_url(config.api_base_url.clone(), config.http_timeout)?;
    let (host, mut inbound) = streamdeck::connect(&args).await?;

    let mut registry = InstanceRegistry::new(config, Arc::new(market), Arc::new(host));

    while let Some(event) = inbound.next_event().await {
        match event {
            Ok(event) => events::handle_event(&mut registry, event).await,
            Err(PluginError::Json(e)) => warn!("Unreadable message from host: {}", e),
            Err(e) => return Err(e),
        }
    }

    info!("Host connection ended, shutting down {} instance(s)", registry.len());
    Ok(())
}
