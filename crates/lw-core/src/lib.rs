//! Core types for Lootwright: actors, items, currency amounts, and the record store.
//!
//! This crate defines the data model the loot and trade engines operate on.
//! It is independent of any rolling logic: you can build a [`MemoryStore`]
//! programmatically or deserialize actors and catalogs from JSON.

/// Actor records (NPCs, player characters, merchants, loot piles).
pub mod actor;
/// Item catalogs used to resolve loot drafts into full item data.
pub mod catalog;
/// Denominations and per-denomination currency amounts.
pub mod currency;
/// Error types used throughout the crate.
pub mod error;
/// Inventory items and their identifiers.
pub mod item;
/// Flexible metadata values and formula contexts.
pub mod metadata;
/// Operator-facing notification sinks.
pub mod notify;
/// The record store trait and its in-memory implementation.
pub mod store;

/// Re-export actor types.
pub use actor::{Actor, ActorId, ActorKind};
/// Re-export catalog types.
pub use catalog::{Catalog, Catalogs};
/// Re-export currency types.
pub use currency::{CurrencyAmount, Denomination};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export item types.
pub use item::{Item, ItemId, ItemKind, Rarity};
/// Re-export metadata types.
pub use metadata::{FormulaContext, MetadataValue};
/// Re-export notification types.
pub use notify::{Notice, NoticeLevel, Notices, Notifier, TracingNotifier};
/// Re-export store types.
pub use store::{MemoryStore, RecordStore};
