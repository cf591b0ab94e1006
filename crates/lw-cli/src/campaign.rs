//! Campaign files: the JSON document the CLI reads and writes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use lw_core::{Actor, ActorId, Catalogs, Item, MemoryStore, RecordStore};
use lw_loot::{LootConfig, TableLibrary};
use lw_trade::TradeConfig;

/// Engine settings stored alongside the campaign data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub loot: LootConfig,
    pub trade: TradeConfig,
}

/// Everything a campaign file holds.
///
/// Top-level `items` are folded into the world catalog on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub config: CampaignConfig,
    pub tables: TableLibrary,
    pub catalogs: Catalogs,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    pub actors: Vec<Actor>,
}

impl Campaign {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let mut campaign: Campaign = serde_json::from_str(&text)
            .map_err(|e| format!("invalid campaign file {}: {e}", path.display()))?;
        for item in std::mem::take(&mut campaign.items) {
            campaign.catalogs.world.insert(item);
        }
        tracing::debug!(
            "loaded {} with {} actor(s) and {} table(s)",
            path.display(),
            campaign.actors.len(),
            campaign.tables.all().count()
        );
        Ok(campaign)
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        std::fs::write(path, json).map_err(|e| format!("cannot write to {}: {e}", path.display()))
    }

    /// A record store over a copy of the actors.
    pub fn store(&self) -> Result<MemoryStore, String> {
        MemoryStore::with_actors(self.actors.iter().cloned()).map_err(|e| e.to_string())
    }

    /// Replace the actors with the store's current records.
    pub fn absorb(&mut self, store: &MemoryStore) {
        self.actors = store.all_actors().cloned().collect();
    }
}

/// Find an actor by name (case-insensitive).
pub fn actor_id(store: &MemoryStore, name: &str) -> Result<ActorId, String> {
    store
        .actor_by_name(name)
        .map(|a| a.id)
        .ok_or_else(|| format!("actor not found: \"{name}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_fold_into_world_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("campaign.json");
        std::fs::write(
            &path,
            r#"{
                "items": [{"name": "Torch", "kind": "loot", "price": 0.01}],
                "actors": [{"name": "Goblin"}]
            }"#,
        )
        .unwrap();

        let campaign = Campaign::load(&path).unwrap();
        assert!(campaign.items.is_empty());
        assert!(campaign.catalogs.world.find_by_name("torch").is_some());

        let store = campaign.store().unwrap();
        assert!(actor_id(&store, "goblin").is_ok());
        assert!(actor_id(&store, "orc").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Campaign::load(Path::new("/nonexistent/campaign.json")).unwrap_err();
        assert!(err.contains("cannot read"));
    }
}
