//! Save persistence — the versioned JSON schema for `GameState` and the
//! key-value stores it is written to.
//!
//! ## Save Structure
//!
//! ```text
//! localStorage["dewdrop_workshop_v1"] = {
//!   "version": 1,
//!   "inventory": ["petal", null, ... 18 entries],
//!   "discovered": { "flower_bundle": true },
//!   "finalCrafted": false
//! }
//! ```
//!
//! ## Lifecycle
//!
//! - **Page load:** the page posts the stored string to `/api/craft/restore`;
//!   anything missing, unparsable or failing validation becomes fresh state
//! - **Every mutation:** the response carries a `localStorage.setItem` script
//!   rendered by `BrowserStore`
//! - **Full reset:** the response carries `localStorage.removeItem`
//!
//! The crafting grid is never saved.

use std::collections::{BTreeMap, HashMap};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::game::catalog;
use crate::game::error::PersistError;
use crate::game::state::{GameState, INVENTORY_SLOTS};
use crate::game::view::js_string;

/// The fixed key the save lives under.
pub const STORAGE_KEY: &str = "dewdrop_workshop_v1";

/// Current schema version. Anything else is treated as corrupt.
pub const SAVE_VERSION: u32 = 1;

/// On-disk shape of a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    pub version: u32,
    pub inventory: Vec<Option<String>>,
    pub discovered: BTreeMap<String, bool>,
    pub final_crafted: bool,
}

impl From<&GameState> for SaveFile {
    fn from(game: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            inventory: game
                .inventory
                .iter()
                .map(|slot| slot.map(str::to_string))
                .collect(),
            discovered: game
                .discovered
                .iter()
                .map(|id| (id.to_string(), true))
                .collect(),
            final_crafted: game.final_crafted,
        }
    }
}

impl TryFrom<SaveFile> for GameState {
    type Error = PersistError;

    fn try_from(save: SaveFile) -> Result<Self, Self::Error> {
        if save.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion(save.version));
        }
        if save.inventory.len() != INVENTORY_SLOTS {
            return Err(PersistError::SlotCount {
                expected: INVENTORY_SLOTS,
                found: save.inventory.len(),
            });
        }

        let mut game = GameState::default();
        for (slot, stored) in game.inventory.iter_mut().zip(&save.inventory) {
            *slot = match stored {
                None => None,
                Some(id) => Some(
                    catalog::intern(id).ok_or_else(|| PersistError::UnknownItem(id.clone()))?,
                ),
            };
        }
        for (id, found) in &save.discovered {
            let recipe =
                catalog::recipe(id).ok_or_else(|| PersistError::UnknownRecipe(id.clone()))?;
            if *found {
                game.discovered.insert(recipe.id);
            }
        }
        game.final_crafted = save.final_crafted;
        Ok(game)
    }
}

/// Serialize a game state to its JSON save string.
pub fn encode(game: &GameState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&SaveFile::from(game))?)
}

/// Parse and validate a JSON save string.
pub fn decode(json: &str) -> Result<GameState, PersistError> {
    let save: SaveFile = serde_json::from_str(json)?;
    GameState::try_from(save)
}

/// Encode a save as URL-safe base64, for the export file.
pub fn export_base64(game: &GameState) -> Result<String, PersistError> {
    Ok(URL_SAFE_NO_PAD.encode(encode(game)?))
}

/// Decode an exported save. Strict: errors are returned, not papered over.
pub fn import_base64(text: &str) -> Result<GameState, PersistError> {
    let bytes = URL_SAFE_NO_PAD.decode(text.trim())?;
    decode(&String::from_utf8(bytes)?)
}

// ── Stores ─────────────────────────────────────────────────────────

/// A string key-value store (browser localStorage or an in-memory map).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// Load the save from `store`, falling back to fresh state when it is
/// missing or fails validation.
pub fn load_or_fresh(store: &impl KeyValueStore) -> GameState {
    match store.get(STORAGE_KEY) {
        None => GameState::default(),
        Some(json) => match decode(&json) {
            Ok(game) => {
                info!(discovered = game.discovered.len(), "save restored");
                game
            }
            Err(e) => {
                warn!(error = %e, "discarding corrupt save");
                GameState::default()
            }
        },
    }
}

/// Write the save to `store`.
pub fn save(game: &GameState, store: &mut impl KeyValueStore) -> Result<(), PersistError> {
    store.set(STORAGE_KEY, encode(game)?);
    Ok(())
}

/// Erase the save entirely.
pub fn erase(store: &mut impl KeyValueStore) {
    store.remove(STORAGE_KEY);
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StoreOp {
    Set(String, String),
    Remove(String),
}

/// Browser localStorage, seen from inside the Web Worker.
///
/// The worker can't touch localStorage directly, so writes are buffered and
/// rendered as a `<script>` the main thread runs when it swaps the fragment
/// in. Reads only see what the page handed over (`seeded`) plus buffered writes.
#[derive(Debug, Clone, Default)]
pub struct BrowserStore {
    seeded: HashMap<String, String>,
    ops: Vec<StoreOp>,
}

impl BrowserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `key` currently holds `value` on the page.
    pub fn seeded(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.seeded.insert(key.to_string(), value.to_string());
        store
    }

    /// Render buffered writes as a script tag. Empty when nothing was written.
    pub fn into_script(self) -> String {
        if self.ops.is_empty() {
            return String::new();
        }
        let mut js = String::from("<script>");
        for op in &self.ops {
            match op {
                StoreOp::Set(key, value) => js.push_str(&format!(
                    "localStorage.setItem({}, {});",
                    js_string(key),
                    js_string(value)
                )),
                StoreOp::Remove(key) => {
                    js.push_str(&format!("localStorage.removeItem({});", js_string(key)))
                }
            }
        }
        js.push_str("</script>");
        js
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        let last_write = self.ops.iter().rev().find_map(|op| match op {
            StoreOp::Set(k, v) if k == key => Some(Some(v.clone())),
            StoreOp::Remove(k) if k == key => Some(None),
            _ => None,
        });
        match last_write {
            Some(value) => value,
            None => self.seeded.get(key).cloned(),
        }
    }

    fn set(&mut self, key: &str, value: String) {
        self.ops.push(StoreOp::Set(key.to_string(), value));
    }

    fn remove(&mut self, key: &str) {
        self.ops.push(StoreOp::Remove(key.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game() -> GameState {
        let mut game = GameState::default();
        game.inventory[0] = Some("flower_bundle");
        game.inventory[3] = Some("petal");
        game.discovered.insert("flower_bundle");
        game
    }

    #[test]
    fn encode_matches_documented_shape() {
        let json = encode(&sample_game()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["inventory"].as_array().unwrap().len(), 18);
        assert_eq!(value["inventory"][0], "flower_bundle");
        assert!(value["inventory"][1].is_null());
        assert_eq!(value["discovered"]["flower_bundle"], true);
        assert_eq!(value["finalCrafted"], false);
    }

    #[test]
    fn save_and_load_through_memory_store() {
        let mut store = MemoryStore::default();
        let game = sample_game();
        save(&game, &mut store).unwrap();
        assert_eq!(load_or_fresh(&store), game);
        erase(&mut store);
        assert_eq!(load_or_fresh(&store), GameState::default());
    }

    #[test]
    fn corrupt_save_falls_back_to_fresh() {
        let mut store = MemoryStore::default();
        store.set(STORAGE_KEY, "not valid json {{{".to_string());
        assert_eq!(load_or_fresh(&store), GameState::default());
    }

    #[test]
    fn decode_rejects_shape_mismatches() {
        let good = encode(&sample_game()).unwrap();

        let wrong_version = good.replace("\"version\":1", "\"version\":7");
        assert!(matches!(
            decode(&wrong_version),
            Err(PersistError::UnsupportedVersion(7))
        ));

        let unknown_item = good.replace("\"petal\"", "\"mushroom\"");
        assert!(matches!(
            decode(&unknown_item),
            Err(PersistError::UnknownItem(_))
        ));

        let unknown_recipe = good.replace("{\"flower_bundle\":true}", "{\"rainbow\":true}");
        assert!(matches!(
            decode(&unknown_recipe),
            Err(PersistError::UnknownRecipe(_))
        ));

        let short = r#"{"version":1,"inventory":[null],"discovered":{},"finalCrafted":false}"#;
        assert!(matches!(
            decode(short),
            Err(PersistError::SlotCount { found: 1, .. })
        ));

        assert!(matches!(decode(r#"{"cards":{}}"#), Err(PersistError::Json(_))));
    }

    #[test]
    fn false_discovery_entries_are_not_discovered() {
        let json = format!(
            r#"{{"version":1,"inventory":{},"discovered":{{"flower_bundle":false}},"finalCrafted":true}}"#,
            serde_json::to_string(&vec![None::<String>; 18]).unwrap()
        );
        let game = decode(&json).unwrap();
        assert!(game.discovered.is_empty());
        assert!(game.final_crafted);
    }

    #[test]
    fn base64_export_import_roundtrip() {
        let game = sample_game();
        let text = export_base64(&game).unwrap();
        assert!(!text.contains('{'));
        assert_eq!(import_base64(&format!("{}\n", text)).unwrap(), game);
        assert!(matches!(
            import_base64("!!not base64!!"),
            Err(PersistError::Base64(_))
        ));
    }

    #[test]
    fn browser_store_renders_writes() {
        let mut store = BrowserStore::new();
        assert_eq!(store.clone().into_script(), "");
        save(&sample_game(), &mut store).unwrap();
        let script = store.into_script();
        assert!(script.starts_with("<script>localStorage.setItem(\"dewdrop_workshop_v1\""));
        assert!(script.contains(r#"\"finalCrafted\":false"#));
        assert!(script.ends_with("</script>"));
    }

    #[test]
    fn browser_store_renders_remove() {
        let mut store = BrowserStore::seeded(STORAGE_KEY, "{}");
        erase(&mut store);
        assert!(store.get(STORAGE_KEY).is_none());
        assert_eq!(
            store.into_script(),
            "<script>localStorage.removeItem(\"dewdrop_workshop_v1\");</script>"
        );
    }

    #[test]
    fn browser_store_reads_seed_then_writes() {
        let mut store = BrowserStore::seeded(STORAGE_KEY, "seed");
        assert_eq!(store.get(STORAGE_KEY).as_deref(), Some("seed"));
        store.set(STORAGE_KEY, "fresh".to_string());
        assert_eq!(store.get(STORAGE_KEY).as_deref(), Some("fresh"));
    }
}
