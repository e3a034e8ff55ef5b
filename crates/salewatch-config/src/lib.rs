//! # salewatch-config
//!
//! Configuration system for salewatch (`salewatch.toml`): schema with
//! per-section defaults, path resolution, environment overrides, validation,
//! and hot-reload.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{ConfigWarning, SalewatchConfig, WarningSeverity};
