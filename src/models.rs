//! Core domain types: roster entries, character records, and equipment slots.
//!
//! These are the types exchanged with the presentation layer. Roster entries
//! come in from the group editor; character records and slot records go out
//! to the dashboard templates, so everything outbound derives `Serialize`.

use serde::{Deserialize, Serialize, Serializer};

use crate::error_handling::CharacterFailure;

/// Number of canonical equipment slots on a character.
pub const SLOT_COUNT: usize = 16;

/// Group role a character fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tank
    Tank,
    /// Healer
    Healer,
    /// Melee damage
    Dps,
    /// Ranged damage
    Ranged,
}

/// Membership status within the group.
///
/// Bench members are displayed but excluded from group-level statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// Full member, counted in group statistics
    Main,
    /// Substitute, displayed but not counted
    Bench,
}

/// One character reference in a group roster, as stored by the group editor.
///
/// Immutable for the duration of one import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Character name
    pub name: String,
    /// Home realm slug (normalized, e.g. `argent-dawn`)
    pub realm: String,
    /// Group role
    pub role: Role,
    /// Membership status
    pub status: Membership,
}

/// The 16 canonical equipment slots, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)] // Variant names are the slot names
pub enum SlotId {
    Head,
    Neck,
    Shoulder,
    Back,
    Chest,
    Wrist,
    Hands,
    Waist,
    Legs,
    Feet,
    Finger1,
    Finger2,
    Trinket1,
    Trinket2,
    MainHand,
    OffHand,
}

impl SlotId {
    /// All slots in canonical display order.
    pub const ALL: [SlotId; SLOT_COUNT] = [
        SlotId::Head,
        SlotId::Neck,
        SlotId::Shoulder,
        SlotId::Back,
        SlotId::Chest,
        SlotId::Wrist,
        SlotId::Hands,
        SlotId::Waist,
        SlotId::Legs,
        SlotId::Feet,
        SlotId::Finger1,
        SlotId::Finger2,
        SlotId::Trinket1,
        SlotId::Trinket2,
        SlotId::MainHand,
        SlotId::OffHand,
    ];

    /// Position of this slot in [`SlotId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The slot key used by the legacy community API (camelCase map keys).
    pub fn legacy_key(self) -> &'static str {
        match self {
            SlotId::Head => "head",
            SlotId::Neck => "neck",
            SlotId::Shoulder => "shoulder",
            SlotId::Back => "back",
            SlotId::Chest => "chest",
            SlotId::Wrist => "wrist",
            SlotId::Hands => "hands",
            SlotId::Waist => "waist",
            SlotId::Legs => "legs",
            SlotId::Feet => "feet",
            SlotId::Finger1 => "finger1",
            SlotId::Finger2 => "finger2",
            SlotId::Trinket1 => "trinket1",
            SlotId::Trinket2 => "trinket2",
            SlotId::MainHand => "mainHand",
            SlotId::OffHand => "offHand",
        }
    }

    /// Parses a profile-API slot type (e.g. `FINGER_1`).
    ///
    /// Returns `None` for slot types outside the canonical 16 (shirt, tabard),
    /// which are excluded from item-level math and the display grid.
    pub fn from_api_type(value: &str) -> Option<SlotId> {
        match value {
            "HEAD" => Some(SlotId::Head),
            "NECK" => Some(SlotId::Neck),
            "SHOULDER" => Some(SlotId::Shoulder),
            "BACK" => Some(SlotId::Back),
            "CHEST" => Some(SlotId::Chest),
            "WRIST" => Some(SlotId::Wrist),
            "HANDS" => Some(SlotId::Hands),
            "WAIST" => Some(SlotId::Waist),
            "LEGS" => Some(SlotId::Legs),
            "FEET" => Some(SlotId::Feet),
            "FINGER_1" => Some(SlotId::Finger1),
            "FINGER_2" => Some(SlotId::Finger2),
            "TRINKET_1" => Some(SlotId::Trinket1),
            "TRINKET_2" => Some(SlotId::Trinket2),
            "MAIN_HAND" => Some(SlotId::MainHand),
            "OFF_HAND" => Some(SlotId::OffHand),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.legacy_key())
    }
}

/// Enchant quality tier for an equipment slot.
///
/// Serializes as the numeric tier the display grid expects:
/// `-1` not applicable, `0` unenchanted, `1` sub-optimal, `2` best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnchantQuality {
    /// Slot is not enchantable (or empty); no judgment applies
    NotApplicable,
    /// Enchantable slot with no permanent enchant
    Unenchanted,
    /// Permanent enchant present, but not one of the best-known ids
    SubOptimal,
    /// One of the best-known enchant ids for the slot
    Best,
}

impl EnchantQuality {
    /// Numeric tier used by the display grid.
    pub fn as_i8(self) -> i8 {
        match self {
            EnchantQuality::NotApplicable => -1,
            EnchantQuality::Unenchanted => 0,
            EnchantQuality::SubOptimal => 1,
            EnchantQuality::Best => 2,
        }
    }
}

impl Serialize for EnchantQuality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// Source classification of an equipped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetClassification {
    /// Neither a tier-set piece nor crafted
    No,
    /// Profession-crafted item
    Crafted,
    /// Piece of an active tier set
    Tier,
}

/// Normalized record for one equipment slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentSlotRecord {
    /// Which slot this record describes
    pub slot: SlotId,
    /// Equipped item id; `None` when the slot is empty
    pub item_id: Option<u64>,
    /// Item level after corrections; `0` when the slot is empty
    pub item_level: u32,
    /// Enchant quality tier
    pub enchant: EnchantQuality,
    /// Socketed gem item ids, in socket order
    pub gems: Vec<u64>,
    /// Tier/crafted classification
    pub classification: SetClassification,
}

impl EquipmentSlotRecord {
    /// An empty record for an unoccupied slot.
    pub(crate) fn empty(slot: SlotId) -> Self {
        EquipmentSlotRecord {
            slot,
            item_id: None,
            item_level: 0,
            enchant: EnchantQuality::NotApplicable,
            gems: Vec::new(),
            classification: SetClassification::No,
        }
    }
}

/// Everything known about a successfully loaded character.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedCharacter {
    /// Class name resolved through the class directory
    pub class_name: String,
    /// Guild name, when the character is guilded
    pub guild: Option<String>,
    /// Group role, carried over from the roster entry
    pub role: Role,
    /// Membership status, carried over from the roster entry
    pub membership: Membership,
    /// Server-reported average item level (bags included)
    pub average_item_level: f64,
    /// Server-reported equipped item level
    pub equipped_item_level: f64,
    /// Equipped item level recomputed from the slot records, with the
    /// two-hander adjustment applied
    pub computed_equipped_item_level: f64,
    /// Number of equipped tier-set pieces
    pub tier_pieces: u32,
    /// Number of equipped crafted pieces
    pub crafted_pieces: u32,
    /// One record per canonical slot, in display order
    pub slots: [EquipmentSlotRecord; SLOT_COUNT],
}

/// Outcome of loading one roster entry.
///
/// Serializes with a `load_status` tag of `ok` or `nok`, which is what the
/// dashboard templates branch on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "load_status")]
pub enum CharacterOutcome {
    /// Both fetch stages succeeded and the equipment normalized cleanly
    #[serde(rename = "ok")]
    Loaded(Box<LoadedCharacter>),
    /// Either fetch stage failed; the record carries a display-ready reason
    #[serde(rename = "nok")]
    Failed(CharacterFailure),
}

/// One output row per roster entry, in roster order.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterRecord {
    /// Character name
    pub name: String,
    /// Home realm slug
    pub realm: String,
    /// Resolved realm display name
    pub realm_name: String,
    /// Load outcome
    #[serde(flatten)]
    pub outcome: CharacterOutcome,
}

impl CharacterRecord {
    /// Whether this entry loaded successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(self.outcome, CharacterOutcome::Loaded(_))
    }

    pub(crate) fn loaded(entry: &RosterEntry, realm_name: String, data: LoadedCharacter) -> Self {
        CharacterRecord {
            name: entry.name.clone(),
            realm: entry.realm.clone(),
            realm_name,
            outcome: CharacterOutcome::Loaded(Box::new(data)),
        }
    }

    pub(crate) fn failed(entry: &RosterEntry, realm_name: String, failure: CharacterFailure) -> Self {
        CharacterRecord {
            name: entry.name.clone(),
            realm: entry.realm.clone(),
            realm_name,
            outcome: CharacterOutcome::Failed(failure),
        }
    }
}
