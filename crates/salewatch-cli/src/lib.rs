//! # salewatch-cli
//!
//! Command-line interface for the salewatch bot.
//!
//! ## Commands
//!
//! - `salewatch start` — Connect the bot and start tracking prices
//! - `salewatch config` — Show the resolved configuration
//! - `salewatch init` — Write a starter salewatch.toml
//! - `salewatch version` — Show version and build info

pub mod commands;

pub use commands::Cli;
