//! Era-versioned game-data tables.
//!
//! The id lists that drive enchant grading and tier/crafted classification
//! change with every game-content patch. They live here as data (built in
//! for the current era, loadable from a JSON file for anything else) so a
//! patch update is a config change, not a code change.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::api::RawItem;
use crate::models::SlotId;

/// Errors loading a ruleset file.
#[derive(Error, Debug)]
pub enum RulesetError {
    /// The file could not be opened or read.
    #[error("failed to read ruleset file: {0}")]
    Io(#[from] std::io::Error),

    /// The file was not valid ruleset JSON.
    #[error("failed to parse ruleset file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A fixed item-level adjustment for known-bad API data.
///
/// All present fields must match for the offset to apply. These patch over
/// API bugs where specific items report the wrong level; they are data, not
/// logic.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemLevelCorrection {
    /// Match on item id
    #[serde(default)]
    pub item_id: Option<u64>,
    /// Match on reported item level
    #[serde(default)]
    pub item_level: Option<u32>,
    /// Match on item context
    #[serde(default)]
    pub context: Option<String>,
    /// Signed level adjustment
    pub offset: i32,
}

impl ItemLevelCorrection {
    pub(crate) fn matches(&self, item: &RawItem) -> bool {
        if let Some(id) = self.item_id {
            if item.item_id != id {
                return false;
            }
        }
        if let Some(level) = self.item_level {
            if item.item_level != level {
                return false;
            }
        }
        if let Some(context) = &self.context {
            if item.context.as_deref() != Some(context.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Forces an item id into a specific display slot.
///
/// Some rings report under whichever finger slot the player happened to use;
/// pinning them keeps the grid columns consistent between page loads.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotOverride {
    /// The item to pin
    pub item_id: u64,
    /// The slot it should display in
    pub slot: SlotId,
}

/// Data tables for one game-content era.
#[derive(Debug, Clone, Deserialize)]
pub struct Ruleset {
    /// Era identifier (content patch, e.g. `"8.3"`)
    pub id: String,

    /// Best-known enchant ids per slot. The key set doubles as the set of
    /// enchantable slots: a slot absent here is graded "not applicable".
    pub best_enchants: HashMap<SlotId, Vec<u64>>,

    /// Item-set ids counting as active tier sets
    #[serde(default)]
    pub tier_sets: Vec<u64>,

    /// Item contexts marking profession-crafted gear
    #[serde(default)]
    pub crafted_contexts: Vec<String>,

    /// Substrings of `limit_category` marking crafted gear
    #[serde(default)]
    pub crafted_limit_markers: Vec<String>,

    /// Item-level corrections for known-bad API data
    #[serde(default)]
    pub corrections: Vec<ItemLevelCorrection>,

    /// Display-slot pins
    #[serde(default)]
    pub slot_overrides: Vec<SlotOverride>,
}

impl Ruleset {
    /// The built-in tables for the current era.
    pub fn builtin() -> Self {
        Ruleset {
            id: "8.3".to_string(),
            best_enchants: HashMap::from([
                (SlotId::Finger1, vec![5942, 5943, 5944, 5945]),
                (SlotId::Finger2, vec![5942, 5943, 5944, 5945]),
                (
                    SlotId::MainHand,
                    vec![
                        5946, 5948, 5949, 5950, 5957, 5962, 5963, 5964, 5965, 5966, 3847, 3368,
                        3370,
                    ],
                ),
                (
                    SlotId::OffHand,
                    vec![
                        5946, 5948, 5949, 5950, 5957, 5962, 5963, 5964, 5965, 5966, 3847, 3368,
                        3370,
                    ],
                ),
            ]),
            tier_sets: Vec::new(),
            crafted_contexts: vec!["trade-skill".to_string()],
            crafted_limit_markers: vec!["Embellished".to_string()],
            corrections: Vec::new(),
            slot_overrides: Vec::new(),
        }
    }

    /// Loads a ruleset from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesetError> {
        let file = File::open(path)?;
        let ruleset = serde_json::from_reader(BufReader::new(file))?;
        Ok(ruleset)
    }

    /// Whether the slot takes a permanent enchant in this era.
    pub fn is_enchantable(&self, slot: SlotId) -> bool {
        self.best_enchants.contains_key(&slot)
    }

    /// The best-known enchant ids for a slot.
    pub fn best_enchant_ids(&self, slot: SlotId) -> &[u64] {
        self.best_enchants
            .get(&slot)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether an item-set id is an active tier set.
    pub fn is_tier_set(&self, set_id: u64) -> bool {
        self.tier_sets.contains(&set_id)
    }

    /// Whether the item's context or limit category marks it as crafted.
    pub fn is_crafted(&self, context: Option<&str>, limit_category: Option<&str>) -> bool {
        if let Some(context) = context {
            if self.crafted_contexts.iter().any(|c| c == context) {
                return true;
            }
        }
        if let Some(limit) = limit_category {
            if self.crafted_limit_markers.iter().any(|m| limit.contains(m)) {
                return true;
            }
        }
        false
    }

    /// Item level after applying any matching corrections.
    pub(crate) fn corrected_level(&self, item: &RawItem) -> u32 {
        let mut level = i64::from(item.item_level);
        for correction in &self.corrections {
            if correction.matches(item) {
                level += i64::from(correction.offset);
            }
        }
        level.max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(item_id: u64, item_level: u32) -> RawItem {
        RawItem {
            slot: SlotId::Head,
            item_id,
            item_level,
            inventory_type: None,
            permanent_enchant: None,
            gems: Vec::new(),
            item_set: None,
            context: None,
            limit_category: None,
        }
    }

    #[test]
    fn test_builtin_enchantable_slots() {
        let ruleset = Ruleset::builtin();
        assert!(ruleset.is_enchantable(SlotId::Finger1));
        assert!(ruleset.is_enchantable(SlotId::Finger2));
        assert!(ruleset.is_enchantable(SlotId::MainHand));
        assert!(ruleset.is_enchantable(SlotId::OffHand));
        assert!(!ruleset.is_enchantable(SlotId::Head));
        assert!(!ruleset.is_enchantable(SlotId::Trinket1));
    }

    #[test]
    fn test_builtin_best_ring_enchants() {
        let ruleset = Ruleset::builtin();
        assert!(ruleset.best_enchant_ids(SlotId::Finger1).contains(&5942));
        assert!(ruleset.best_enchant_ids(SlotId::MainHand).contains(&5946));
        assert!(ruleset.best_enchant_ids(SlotId::Head).is_empty());
    }

    #[test]
    fn test_crafted_detection() {
        let ruleset = Ruleset::builtin();
        assert!(ruleset.is_crafted(Some("trade-skill"), None));
        assert!(ruleset.is_crafted(None, Some("Unique-Equipped: Embellished (2)")));
        assert!(!ruleset.is_crafted(Some("dungeon-normal"), None));
        assert!(!ruleset.is_crafted(None, None));
    }

    #[test]
    fn test_correction_matches_all_present_fields() {
        let correction = ItemLevelCorrection {
            item_id: Some(1001),
            item_level: Some(400),
            context: None,
            offset: 15,
        };
        assert!(correction.matches(&raw(1001, 400)));
        assert!(!correction.matches(&raw(1001, 410)));
        assert!(!correction.matches(&raw(1002, 400)));
    }

    #[test]
    fn test_corrected_level_applies_offset() {
        let mut ruleset = Ruleset::builtin();
        ruleset.corrections.push(ItemLevelCorrection {
            item_id: Some(1001),
            item_level: None,
            context: None,
            offset: -5,
        });
        assert_eq!(ruleset.corrected_level(&raw(1001, 400)), 395);
        assert_eq!(ruleset.corrected_level(&raw(1002, 400)), 400);
    }

    #[test]
    fn test_corrected_level_never_underflows() {
        let mut ruleset = Ruleset::builtin();
        ruleset.corrections.push(ItemLevelCorrection {
            item_id: Some(1001),
            item_level: None,
            context: None,
            offset: -500,
        });
        assert_eq!(ruleset.corrected_level(&raw(1001, 400)), 0);
    }

    #[test]
    fn test_from_path_parses_json() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "id": "9.2",
                "best_enchants": {{"finger1": [6108], "mainHand": [6228]}},
                "tier_sets": [1526, 1527],
                "crafted_contexts": ["trade-skill"],
                "corrections": [{{"item_id": 188268, "offset": 7}}]
            }}"#
        )
        .expect("write ruleset json");

        let ruleset = Ruleset::from_path(file.path()).expect("parse ruleset");
        assert_eq!(ruleset.id, "9.2");
        assert!(ruleset.is_enchantable(SlotId::Finger1));
        assert!(!ruleset.is_enchantable(SlotId::Finger2));
        assert!(ruleset.is_tier_set(1526));
        assert_eq!(ruleset.corrections.len(), 1);
        assert!(ruleset.slot_overrides.is_empty());
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Ruleset::from_path("/nonexistent/ruleset.json");
        assert!(matches!(result, Err(RulesetError::Io(_))));
    }
}
