use std::collections::HashMap;

use crate::actor::{Actor, ActorId};
use crate::currency::CurrencyAmount;
use crate::error::{CoreError, CoreResult};
use crate::item::{Item, ItemId};

/// Persistent-record operations the loot and trade engines need.
///
/// Writes replace whole records; there is no partial field patching.
pub trait RecordStore {
    /// Get an actor by ID.
    fn actor(&self, id: ActorId) -> CoreResult<&Actor>;

    /// Find an actor by name (case-insensitive).
    fn actor_by_name(&self, name: &str) -> Option<&Actor>;

    /// Insert a new actor. Returns its ID.
    fn create_actor(&mut self, actor: Actor) -> CoreResult<ActorId>;

    /// The actor's embedded item collection.
    fn items(&self, actor: ActorId) -> CoreResult<&[Item]> {
        Ok(&self.actor(actor)?.items)
    }

    /// Add an item to an actor's inventory. Returns the item's ID.
    fn create_item(&mut self, actor: ActorId, item: Item) -> CoreResult<ItemId>;

    /// Replace an owned item record (matched by ID).
    fn update_item(&mut self, actor: ActorId, item: Item) -> CoreResult<()>;

    /// Remove owned items. Unknown IDs are an error and nothing is removed.
    fn delete_items(&mut self, actor: ActorId, ids: &[ItemId]) -> CoreResult<()>;

    /// Replace an actor's coins.
    fn update_currency(&mut self, actor: ActorId, currency: CurrencyAmount) -> CoreResult<()>;
}

/// In-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    actors: HashMap<ActorId, Actor>,
    order: Vec<ActorId>,
    by_name_lower: HashMap<String, ActorId>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of actors, rejecting duplicate names.
    pub fn with_actors(actors: impl IntoIterator<Item = Actor>) -> CoreResult<Self> {
        let mut store = Self::new();
        for actor in actors {
            store.create_actor(actor)?;
        }
        Ok(store)
    }

    /// All actors, in insertion order.
    pub fn all_actors(&self) -> impl Iterator<Item = &Actor> {
        self.order.iter().filter_map(|id| self.actors.get(id))
    }

    /// Number of actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    fn actor_mut(&mut self, id: ActorId) -> CoreResult<&mut Actor> {
        self.actors.get_mut(&id).ok_or(CoreError::ActorNotFound(id))
    }
}

impl RecordStore for MemoryStore {
    fn actor(&self, id: ActorId) -> CoreResult<&Actor> {
        self.actors.get(&id).ok_or(CoreError::ActorNotFound(id))
    }

    fn actor_by_name(&self, name: &str) -> Option<&Actor> {
        self.by_name_lower
            .get(&name.trim().to_lowercase())
            .and_then(|id| self.actors.get(id))
    }

    fn create_actor(&mut self, actor: Actor) -> CoreResult<ActorId> {
        let name_lower = actor.name.to_lowercase();
        if self.by_name_lower.contains_key(&name_lower) {
            return Err(CoreError::DuplicateName(actor.name.clone()));
        }

        let id = actor.id;
        self.by_name_lower.insert(name_lower, id);
        self.order.push(id);
        self.actors.insert(id, actor);
        Ok(id)
    }

    fn create_item(&mut self, actor: ActorId, item: Item) -> CoreResult<ItemId> {
        if item.name.trim().is_empty() {
            return Err(CoreError::Validation("item name is empty".to_string()));
        }
        let owner = self.actor_mut(actor)?;
        let id = item.id;
        owner.items.push(item);
        Ok(id)
    }

    fn update_item(&mut self, actor: ActorId, item: Item) -> CoreResult<()> {
        let owner = self.actor_mut(actor)?;
        let slot = owner
            .items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or(CoreError::ItemNotFound {
                actor,
                item: item.id,
            })?;
        *slot = item;
        Ok(())
    }

    fn delete_items(&mut self, actor: ActorId, ids: &[ItemId]) -> CoreResult<()> {
        let owner = self.actor_mut(actor)?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !owner.items.iter().any(|i| i.id == **id))
        {
            return Err(CoreError::ItemNotFound {
                actor,
                item: *missing,
            });
        }
        owner.items.retain(|i| !ids.contains(&i.id));
        Ok(())
    }

    fn update_currency(&mut self, actor: ActorId, currency: CurrencyAmount) -> CoreResult<()> {
        self.actor_mut(actor)?.currency = currency;
        Ok(())
    }
}
