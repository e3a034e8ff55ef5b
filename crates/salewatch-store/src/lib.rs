//! # salewatch-store
//!
//! The bot's two persisted stores — per-user wishlists and the
//! tracked-products table — plus the flat-JSON key-value util backing both.
//!
//! Persistence is deliberately small: one JSON file per store, full
//! overwrite on save, empty-map recovery on unreadable input.

pub mod kv;
pub mod tracked;
pub mod wishlist;

pub use kv::JsonStore;
pub use tracked::{TrackedProduct, TrackedStore};
pub use wishlist::{AddOutcome, RemoveOutcome, WishlistManager};
