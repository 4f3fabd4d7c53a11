use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::api::{HostSurface, MarketData};
use crate::models::{FrameValues, InstanceSettings};
use crate::services::ticker_service::{self, FrameKind};
use crate::services::render_service;

/// Render loop of one key.
///
/// Interval ticks and manual wake-ups both end in the same render call, and
/// the loop runs them one at a time, so a key never has two fetches in flight.
pub struct Worker {
    context: String,
    settings: watch::Receiver<InstanceSettings>,
    wake: Arc<Notify>,
    market: Arc<dyn MarketData>,
    host: Arc<dyn HostSurface>,
    poll_interval: Duration,
    last_good: Option<FrameValues>,
    /// Symbol `last_good` was fetched for
    cached_symbol: String,
}

impl Worker {
    pub fn new(
        context: String,
        settings: watch::Receiver<InstanceSettings>,
        wake: Arc<Notify>,
        market: Arc<dyn MarketData>,
        host: Arc<dyn HostSurface>,
        poll_interval: Duration,
    ) -> Self {
        let cached_symbol = settings.borrow().symbol.clone();
        Self {
            context,
            settings,
            wake,
            market,
            host,
            poll_interval,
            last_good: None,
            cached_symbol,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!("▶️ Worker started for {}", self.context);

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // the first tick fires immediately
            tokio::select! {
                _ = ticker.tick() => debug!("Poll tick for {}", self.context),
                _ = self.wake.notified() => debug!("Manual refresh for {}", self.context),
            }
            self.render().await;
        }
    }

    async fn render(&mut self) {
        let settings = self.settings.borrow().clone();
        let now = Local::now().naive_local();

        if settings.symbol != self.cached_symbol {
            debug!("Symbol for {} changed to {}, dropping cached frame", self.context, settings.symbol);
            self.last_good = None;
            self.cached_symbol = settings.symbol.clone();
        }

        let result = ticker_service::refresh(self.market.as_ref(), &settings, &mut self.last_good, now).await;
        debug!("Frame for {} ({:?}, {:?})", self.context, result.kind, settings.style);

        let image = render_service::to_data_uri(&result.svg);
        if let Err(e) = self.host.set_image(&self.context, image).await {
            error!("Failed to push frame for {}: {}", self.context, e);
            return;
        }

        if result.kind == FrameKind::Placeholder {
            if let Err(e) = self.host.show_alert(&self.context).await {
                error!("Failed to show alert for {}: {}", self.context, e);
            }
        }
    }
}
