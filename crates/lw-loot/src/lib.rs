//! Loot generation for Lootwright.
//!
//! A populate request flows through four stages:
//!
//! 1. [`TableRoller`] draws entries from a [`RollTable`], following nested
//!    table references up to [`MAX_DEPTH`] levels deep.
//! 2. [`LootProcessor`] turns the draws into [`ItemDraft`]s and coins,
//!    parsing currency tags, inline rolls, `@command` overrides, and table
//!    references out of text entries.
//! 3. [`Materializer`] resolves drafts against catalogs and merges them into
//!    an actor's inventory.
//! 4. [`LootGenerator`] ties the stages together and settles the coins.

/// Loot settings.
pub mod config;
/// Raw results of table draws.
pub mod draw;
/// Error types used throughout the crate.
pub mod error;
/// End-to-end population of actors.
pub mod generator;
/// Exhausted-entry bookkeeping for tables drawn without replacement.
pub mod ledger;
/// Table lookup by id, name, and pack.
pub mod library;
/// Inventory writes.
pub mod materialize;
/// Loot text grammar.
pub mod parse;
/// Draw results to item drafts.
pub mod processor;
/// Rarity bands and scroll rarity.
pub mod rarity;
/// Recursive table sampling.
pub mod roller;
/// Roll tables and entries.
pub mod table;

pub use config::LootConfig;
pub use draw::{DrawResult, DrawResultKind};
pub use error::{LootError, LootResult};
pub use generator::{LootGenerator, LootReport};
pub use ledger::{DrawLedger, table_key};
pub use library::{TableLibrary, TableRef};
pub use materialize::{ItemChange, Materializer};
pub use parse::{Command, ParsedTextToken, TextPatterns};
pub use processor::{ItemDraft, LootBundle, LootProcessor};
pub use rarity::{RarityTier, get_random_rarity};
pub use roller::{MAX_DEPTH, RollOptions, TableRoller};
pub use table::{DocumentKind, EntryPayload, RollTable, TableEntry};
