use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemId};

/// A named collection of item definitions (a compendium, or the world's items).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Items in this catalog.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of items.
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Add an item definition.
    pub fn insert(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Find an item by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        let name = name.trim();
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Find an item by ID.
    pub fn find_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of item definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Registry of item catalogs: the world catalog plus named compendiums.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogs {
    /// Items defined directly in the world.
    #[serde(default)]
    pub world: Catalog,
    /// Compendium catalogs keyed by collection id.
    #[serde(default)]
    pub packs: HashMap<String, Catalog>,
}

impl Catalogs {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compendium catalog under `id`.
    pub fn add_pack(&mut self, id: impl Into<String>, catalog: Catalog) {
        self.packs.insert(id.into(), catalog);
    }

    /// Look up a compendium catalog by collection id.
    pub fn pack(&self, id: &str) -> Option<&Catalog> {
        self.packs.get(id)
    }

    /// Find an item by name inside a compendium.
    pub fn find_by_name(&self, catalog_id: &str, name: &str) -> Option<&Item> {
        self.pack(catalog_id)?.find_by_name(name)
    }

    /// Find an item by ID inside a compendium.
    pub fn find_by_id(&self, catalog_id: &str, id: ItemId) -> Option<&Item> {
        self.pack(catalog_id)?.find_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn registry() -> Catalogs {
        let mut catalogs = Catalogs::new();
        catalogs.world.insert(Item::new(ItemKind::Loot, "Torch"));
        catalogs.add_pack(
            "srd.items",
            Catalog::from_items(vec![
                Item::new(ItemKind::Weapon, "Longsword").with_price(15.0),
                Item::new(ItemKind::Consumable, "Potion of Healing").with_price(50.0),
            ]),
        );
        catalogs
    }

    #[test]
    fn find_in_pack_by_name() {
        let catalogs = registry();
        let sword = catalogs.find_by_name("srd.items", "longsword").unwrap();
        assert_eq!(sword.price, 15.0);
        assert!(catalogs.find_by_name("srd.items", "Torch").is_none());
        assert!(catalogs.find_by_name("missing", "Longsword").is_none());
    }

    #[test]
    fn find_in_pack_by_id() {
        let catalogs = registry();
        let id = catalogs.pack("srd.items").unwrap().items[1].id;
        let potion = catalogs.find_by_id("srd.items", id).unwrap();
        assert_eq!(potion.name, "Potion of Healing");
    }

    #[test]
    fn world_catalog() {
        let catalogs = registry();
        assert!(catalogs.world.find_by_name("TORCH").is_some());
        assert_eq!(catalogs.world.len(), 1);
        assert!(!catalogs.world.is_empty());
    }
}
