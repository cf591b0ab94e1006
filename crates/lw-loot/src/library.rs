//! Lookup of roll tables in the world and in table packs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::table::RollTable;

/// A reference to a table written inside loot text, e.g. `[Gems]` or
/// `[dungeon-tables.Gems]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Table pack the name is looked up in, or `None` for world tables.
    pub collection: Option<String>,
    /// Table name or id.
    pub name: String,
}

impl TableRef {
    /// Read a raw reference. A prefix before the first `.` is treated as a
    /// pack only if the library has a pack by that name.
    pub fn parse(raw: &str, library: &TableLibrary) -> Self {
        let raw = raw.trim();
        match raw.split_once('.') {
            Some((pack, name)) if library.has_pack(pack.trim()) => Self {
                collection: Some(pack.trim().to_string()),
                name: name.trim().to_string(),
            },
            _ => Self {
                collection: None,
                name: raw.to_string(),
            },
        }
    }
}

/// World tables plus named table packs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLibrary {
    /// Tables defined directly in the world.
    pub tables: Vec<RollTable>,
    /// Table packs keyed by collection id.
    pub packs: HashMap<String, Vec<RollTable>>,
}

impl TableLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a world table.
    pub fn insert(&mut self, table: RollTable) {
        self.tables.push(table);
    }

    /// Register a table pack.
    pub fn add_pack(&mut self, collection: impl Into<String>, tables: Vec<RollTable>) {
        self.packs.insert(collection.into(), tables);
    }

    /// True if `collection` names a table pack.
    pub fn has_pack(&self, collection: &str) -> bool {
        self.packs.contains_key(collection)
    }

    /// Find a world table by id, then by name (case-insensitive).
    pub fn get(&self, id_or_name: &str) -> Option<&RollTable> {
        find_in(&self.tables, id_or_name)
    }

    /// Find a table inside a pack by id, then by name.
    pub fn pack_table(&self, collection: &str, id_or_name: &str) -> Option<&RollTable> {
        find_in(self.packs.get(collection)?, id_or_name)
    }

    /// Resolve a text reference.
    pub fn resolve(&self, reference: &TableRef) -> Option<&RollTable> {
        match &reference.collection {
            Some(collection) => self.pack_table(collection, &reference.name),
            None => self.get(&reference.name),
        }
    }

    /// Every table, world tables first.
    pub fn all(&self) -> impl Iterator<Item = &RollTable> {
        self.tables
            .iter()
            .chain(self.packs.values().flat_map(|tables| tables.iter()))
    }
}

fn find_in<'a>(tables: &'a [RollTable], id_or_name: &str) -> Option<&'a RollTable> {
    let needle = id_or_name.trim();
    tables
        .iter()
        .find(|t| t.id == needle)
        .or_else(|| tables.iter().find(|t| t.name.eq_ignore_ascii_case(needle)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> TableLibrary {
        let mut library = TableLibrary::new();
        library.insert(RollTable::new("gems", "Gems"));
        library.insert(RollTable::new("art", "Art Objects"));
        library.add_pack("dungeon", vec![RollTable::new("d-gems", "Gems")]);
        library
    }

    #[test]
    fn lookup_by_id_and_name() {
        let library = library();
        assert_eq!(library.get("gems").unwrap().name, "Gems");
        assert_eq!(library.get("art objects").unwrap().id, "art");
        assert!(library.get("nope").is_none());
        assert_eq!(library.pack_table("dungeon", "gems").unwrap().id, "d-gems");
    }

    #[test]
    fn qualified_reference_needs_known_pack() {
        let library = library();
        let pack_ref = TableRef::parse("dungeon.Gems", &library);
        assert_eq!(pack_ref.collection.as_deref(), Some("dungeon"));
        assert_eq!(library.resolve(&pack_ref).unwrap().id, "d-gems");

        let plain = TableRef::parse("Mr. Gems", &library);
        assert_eq!(plain.collection, None);
        assert_eq!(plain.name, "Mr. Gems");
    }

    #[test]
    fn all_iterates_packs() {
        assert_eq!(library().all().count(), 3);
    }
}
