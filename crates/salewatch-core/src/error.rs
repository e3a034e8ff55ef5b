use thiserror::Error;

/// Unified error type for the entire salewatch bot.
#[derive(Error, Debug)]
pub enum SalewatchError {
    // ── Store errors ───────────────────────────────────────────
    #[error("store error: {store}: {reason}")]
    Store { store: String, reason: String },

    // ── Price lookup errors ────────────────────────────────────
    #[error("price lookup failed: {product}: {reason}")]
    Price { product: String, reason: String },

    // ── Channel errors ─────────────────────────────────────────
    #[error("channel error: {channel}: {reason}")]
    Channel { channel: String, reason: String },

    #[error("channel not connected: {0}")]
    ChannelNotConnected(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SalewatchError>;
