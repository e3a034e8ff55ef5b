//! # salewatch-runtime
//!
//! The bot runtime — wires the chat transport, the wishlist stores, and the
//! price-tracking reconciliation loop together. Inbound messages flow
//! through the command dispatcher; a timer-driven tracker task polls
//! tracked products and announces discounts to the configured channel.

pub mod bot;
pub mod commands;
pub mod tracker;

pub use bot::BotRuntime;
pub use commands::{Command, Parsed, parse_command};
pub use tracker::{PriceTracker, SaleAlert};
