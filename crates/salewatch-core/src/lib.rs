//! # salewatch-core
//!
//! Core types and error types for the salewatch bot. This crate defines the
//! shared vocabulary used by every other crate in the workspace.

pub mod error;
pub mod price;

pub use error::{Result, SalewatchError};
pub use price::{PriceQuote, format_cents};
