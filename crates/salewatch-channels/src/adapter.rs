use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// An incoming message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Channel-specific message ID.
    pub id: String,
    /// Adapter instance the message arrived on.
    pub channel: String,
    /// Sender identifier (channel-specific).
    pub sender: String,
    /// Display name of the sender.
    pub sender_name: Option<String>,
    /// The room/chat the message arrived in; replies target this.
    pub room: String,
    /// Text content.
    pub text: String,
}

/// An outgoing message to send via a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Adapter instance to send through.
    pub channel: String,
    /// Target room/chat ID.
    pub target: String,
    /// Text content (may contain markdown).
    pub text: String,
}

/// Events emitted by a channel adapter.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A new message arrived.
    Message(IncomingMessage),
    /// The channel connected successfully.
    Connected,
    /// The channel disconnected.
    Disconnected(Option<String>),
}

/// Trait implemented by each channel adapter.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique identifier for this channel instance.
    fn id(&self) -> &str;

    /// Channel type name (e.g., "discord").
    fn channel_type(&self) -> &str;

    /// Start the channel adapter. Returns a receiver for incoming events.
    async fn start(&mut self) -> salewatch_core::Result<mpsc::Receiver<ChannelEvent>>;

    /// Send a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> salewatch_core::Result<()>;

    /// Stop the channel adapter gracefully.
    async fn stop(&mut self) -> salewatch_core::Result<()>;

    /// Check if the channel is currently connected.
    fn is_connected(&self) -> bool;
}

/// Render a user id as a mention for the given channel type.
pub fn mention(channel_type: &str, user_id: &str) -> String {
    match channel_type {
        "discord" => format!("<@{user_id}>"),
        _ => format!("@{user_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discord_mentions_use_snowflake_syntax() {
        assert_eq!(mention("discord", "123"), "<@123>");
    }

    #[test]
    fn unknown_channel_types_get_plain_mentions() {
        assert_eq!(mention("irc", "bob"), "@bob");
    }
}
