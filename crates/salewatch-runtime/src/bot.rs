use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, error, info, warn};

use parking_lot::RwLock;
use salewatch_channels::{Channel, ChannelEvent, IncomingMessage, OutgoingMessage};
use salewatch_config::SalewatchConfig;
use salewatch_price::{PriceLookup, StorefrontClient};
use salewatch_store::WishlistManager;

use crate::commands::{self, Parsed};
use crate::tracker::PriceTracker;

/// Shared state handed to concurrent message handlers — the single context
/// object holding store handles and the transport, built once at startup.
#[derive(Clone)]
struct SharedBotState {
    config: Arc<RwLock<SalewatchConfig>>,
    wishlists: WishlistManager,
    channels: Arc<Mutex<Vec<Box<dyn Channel>>>>,
}

/// The bot runtime: owns the stores, the price lookup client, and the
/// registered channels; `run` drives everything until shutdown.
pub struct BotRuntime {
    config: Arc<RwLock<SalewatchConfig>>,
    wishlists: WishlistManager,
    lookup: Arc<dyn PriceLookup>,
    channels: Vec<Box<dyn Channel>>,
}

impl BotRuntime {
    pub fn new(config: Arc<RwLock<SalewatchConfig>>) -> salewatch_core::Result<Self> {
        let snapshot = config.read().clone();

        // Resolve data_dir relative to ~/.salewatch/ if it's not absolute
        let data_dir = if snapshot.bot.data_dir.is_absolute() {
            snapshot.bot.data_dir.clone()
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".salewatch")
                .join(&snapshot.bot.data_dir)
        };
        info!(?data_dir, "opening stores");
        let wishlists = WishlistManager::open(&data_dir);

        let lookup: Arc<dyn PriceLookup> = Arc::new(StorefrontClient::new(
            snapshot.storefront.api_base.clone(),
            snapshot.storefront.timeout_secs,
        ));

        Ok(Self {
            config,
            wishlists,
            lookup,
            channels: Vec::new(),
        })
    }

    /// Swap in a different price lookup (tests use the scripted mock).
    pub fn with_lookup(mut self, lookup: Arc<dyn PriceLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    /// Register a channel adapter.
    pub fn add_channel(&mut self, channel: Box<dyn Channel>) {
        info!(
            channel = channel.channel_type(),
            id = channel.id(),
            "registered channel"
        );
        self.channels.push(channel);
    }

    /// Start the runtime — launches all channels, the price tracker, and the
    /// main event loop. Returns after a shutdown signal.
    pub async fn run(mut self) -> salewatch_core::Result<()> {
        info!(
            announce_channel = %self.config.read().bot.announce_channel,
            poll_interval_secs = self.config.read().bot.poll_interval_secs,
            "starting bot runtime"
        );

        // Aggregate all channel events into one stream
        let (aggregate_tx, mut aggregate_rx) = mpsc::channel::<(String, ChannelEvent)>(256);

        for channel in &mut self.channels {
            let channel_id = channel.id().to_string();
            match channel.start().await {
                Ok(mut event_rx) => {
                    let tx = aggregate_tx.clone();
                    let id = channel_id.clone();
                    tokio::spawn(async move {
                        while let Some(event) = event_rx.recv().await {
                            if tx.send((id.clone(), event)).await.is_err() {
                                break;
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(channel = %channel_id, error = %e, "failed to start channel");
                }
            }
        }
        drop(aggregate_tx);

        let state = SharedBotState {
            config: Arc::clone(&self.config),
            wishlists: self.wishlists.clone(),
            channels: Arc::new(Mutex::new(self.channels)),
        };

        // ── Start the price tracker ────────────────────────────
        let (alert_tx, mut alert_rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tracker = PriceTracker::new(self.wishlists.clone(), Arc::clone(&self.lookup));
        let tracker_config = Arc::clone(&self.config);
        let tracker_task = tokio::spawn(async move {
            tracker.run(tracker_config, alert_tx, shutdown_rx).await;
        });

        info!("bot runtime started, waiting for messages");

        // Main event loop — message handlers are spawned so nothing blocks
        loop {
            tokio::select! {
                event = aggregate_rx.recv() => {
                    match event {
                        Some((channel_id, ChannelEvent::Message(msg))) => {
                            let s = state.clone();
                            tokio::spawn(async move {
                                handle_message(&s, &channel_id, msg).await;
                            });
                        }
                        Some((channel_id, ChannelEvent::Connected)) => {
                            info!(channel = %channel_id, "channel connected");
                        }
                        Some((channel_id, ChannelEvent::Disconnected(reason))) => {
                            warn!(channel = %channel_id, ?reason, "channel disconnected");
                        }
                        None => {
                            info!("all channels closed, shutting down");
                            break;
                        }
                    }
                }
                Some(alert) = alert_rx.recv() => {
                    announce(&state, alert).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        // Graceful shutdown: stop the tracker (an in-progress scan finishes),
        // then the channels.
        let _ = shutdown_tx.send(true);
        let _ = tracker_task.await;
        let mut channels = state.channels.lock().await;
        for channel in channels.iter_mut() {
            if let Err(e) = channel.stop().await {
                warn!(channel = channel.id(), error = %e, "channel stop failed");
            }
        }

        info!("bot runtime stopped");
        Ok(())
    }
}

/// Handle one inbound message: parse, dispatch, reply in the originating
/// room. Non-commands are dropped silently.
async fn handle_message(state: &SharedBotState, channel_id: &str, msg: IncomingMessage) {
    let reply = match commands::parse_command(&msg.text) {
        Parsed::Ignored => return,
        Parsed::Malformed { usage } => usage.to_string(),
        Parsed::Command(command) => {
            debug!(user = %msg.sender, ?command, "dispatching command");
            commands::dispatch(&state.wishlists, &msg.sender, command).await
        }
    };
    send_via(&state.channels, channel_id, &msg.room, &reply).await;
}

/// Announce a sale alert through every registered channel.
async fn announce(state: &SharedBotState, alert: crate::tracker::SaleAlert) {
    let target = state.config.read().bot.announce_channel.clone();
    if target.is_empty() {
        warn!(product = %alert.product_id, "no announce channel configured, dropping alert");
        return;
    }
    let channels = state.channels.lock().await;
    for channel in channels.iter() {
        let text = alert.render(channel.channel_type());
        if let Err(e) = channel
            .send(OutgoingMessage {
                channel: channel.id().to_string(),
                target: target.clone(),
                text,
            })
            .await
        {
            warn!(channel = channel.id(), error = %e, "failed to announce sale");
        }
    }
}

/// Send a reply through the channel the message arrived on.
async fn send_via(
    channels: &Arc<Mutex<Vec<Box<dyn Channel>>>>,
    channel_id: &str,
    target: &str,
    text: &str,
) {
    let channels = channels.lock().await;
    for channel in channels.iter() {
        if channel.id() == channel_id {
            if let Err(e) = channel
                .send(OutgoingMessage {
                    channel: channel_id.to_string(),
                    target: target.to_string(),
                    text: text.to_string(),
                })
                .await
            {
                warn!(channel = channel_id, error = %e, "failed to send reply");
            }
            return;
        }
    }
    warn!(channel = channel_id, "channel not found for reply");
}
