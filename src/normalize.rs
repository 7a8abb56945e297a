//! Equipment normalization.
//!
//! Flattens the canonical item list into the 16 display slots, grades
//! enchants, classifies tier/crafted pieces, and recomputes the equipped
//! item level with the game's own two-hander averaging rule.

use crate::api::RawItem;
use crate::models::{
    EnchantQuality, EquipmentSlotRecord, SetClassification, SlotId, SLOT_COUNT,
};
use crate::ruleset::Ruleset;

/// Inventory types that occupy both weapon slots.
const TWO_HAND_INVENTORY_TYPES: [&str; 3] = ["TWOHWEAPON", "RANGED", "RANGEDRIGHT"];

/// Normalized equipment for one character.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEquipment {
    /// One record per canonical slot, in display order
    pub slots: [EquipmentSlotRecord; SLOT_COUNT],
    /// Equipped item level recomputed from the slots, one decimal
    pub equipped_item_level: f64,
    /// Number of equipped tier-set pieces
    pub tier_pieces: u32,
    /// Number of equipped crafted pieces
    pub crafted_pieces: u32,
}

/// Normalizes a character's equipment against the active ruleset.
pub fn normalize(items: &[RawItem], ruleset: &Ruleset) -> NormalizedEquipment {
    let corrected: Vec<RawItem> = items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            item.item_level = ruleset.corrected_level(&item);
            item
        })
        .collect();

    let mut slots = fill_slots(&corrected, ruleset);
    apply_slot_overrides(&mut slots, ruleset);

    let tier_pieces = slots
        .iter()
        .filter(|s| s.classification == SetClassification::Tier)
        .count() as u32;
    let crafted_pieces = slots
        .iter()
        .filter(|s| s.classification == SetClassification::Crafted)
        .count() as u32;

    NormalizedEquipment {
        slots,
        equipped_item_level: equipped_item_level(&corrected),
        tier_pieces,
        crafted_pieces,
    }
}

fn fill_slots(items: &[RawItem], ruleset: &Ruleset) -> [EquipmentSlotRecord; SLOT_COUNT] {
    let mut records = SlotId::ALL.map(EquipmentSlotRecord::empty);
    for item in items {
        records[item.slot.index()] = EquipmentSlotRecord {
            slot: item.slot,
            item_id: Some(item.item_id),
            item_level: item.item_level,
            enchant: enchant_quality(item.slot, item.permanent_enchant, ruleset),
            gems: item.gems.clone(),
            classification: classify(item, ruleset),
        };
    }
    records
}

/// Grades the permanent enchant on a slot.
///
/// Slots outside the era's enchantable set grade `NotApplicable` no matter
/// what enchant data is present.
fn enchant_quality(
    slot: SlotId,
    permanent_enchant: Option<u64>,
    ruleset: &Ruleset,
) -> EnchantQuality {
    if !ruleset.is_enchantable(slot) {
        return EnchantQuality::NotApplicable;
    }
    match permanent_enchant {
        None | Some(0) => EnchantQuality::Unenchanted,
        Some(id) if ruleset.best_enchant_ids(slot).contains(&id) => EnchantQuality::Best,
        Some(_) => EnchantQuality::SubOptimal,
    }
}

fn classify(item: &RawItem, ruleset: &Ruleset) -> SetClassification {
    if item.item_set.is_some_and(|id| ruleset.is_tier_set(id)) {
        SetClassification::Tier
    } else if ruleset.is_crafted(item.context.as_deref(), item.limit_category.as_deref()) {
        SetClassification::Crafted
    } else {
        SetClassification::No
    }
}

/// Average item level over occupied slots.
///
/// A lone main-hand two-hander counts twice, mirroring the game's own
/// averaging formula. Legacy payloads carry no inventory type, so a lone
/// main-hand is assumed two-handed there.
fn equipped_item_level(items: &[RawItem]) -> f64 {
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    for item in items {
        sum += u64::from(item.item_level);
        count += 1;
    }

    let has_off_hand = items.iter().any(|i| i.slot == SlotId::OffHand);
    if !has_off_hand {
        if let Some(main_hand) = items.iter().find(|i| i.slot == SlotId::MainHand) {
            if is_two_handed(main_hand) {
                sum += u64::from(main_hand.item_level);
                count += 1;
            }
        }
    }

    if count == 0 {
        return 0.0;
    }
    round_to_decimal(sum as f64 / count as f64)
}

fn is_two_handed(item: &RawItem) -> bool {
    match &item.inventory_type {
        Some(kind) => TWO_HAND_INVENTORY_TYPES.contains(&kind.as_str()),
        None => true,
    }
}

fn round_to_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn apply_slot_overrides(records: &mut [EquipmentSlotRecord; SLOT_COUNT], ruleset: &Ruleset) {
    for pin in &ruleset.slot_overrides {
        let target = pin.slot.index();
        let Some(current) = records.iter().position(|r| r.item_id == Some(pin.item_id)) else {
            continue;
        };
        if current != target {
            records.swap(current, target);
            // Slot tags stay with their grid positions
            records[current].slot = SlotId::ALL[current];
            records[target].slot = SlotId::ALL[target];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::{ItemLevelCorrection, SlotOverride};

    fn item(slot: SlotId, item_id: u64, item_level: u32) -> RawItem {
        RawItem {
            slot,
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

    fn two_hander(item_level: u32) -> RawItem {
        RawItem {
            inventory_type: Some("TWOHWEAPON".into()),
            ..item(SlotId::MainHand, 9001, item_level)
        }
    }

    #[test]
    fn test_absent_slots_get_empty_records() {
        let ruleset = Ruleset::builtin();
        let normalized = normalize(&[item(SlotId::Head, 1001, 420)], &ruleset);

        assert_eq!(normalized.slots.len(), SLOT_COUNT);
        let head = &normalized.slots[SlotId::Head.index()];
        assert_eq!(head.item_id, Some(1001));
        assert_eq!(head.item_level, 420);

        let chest = &normalized.slots[SlotId::Chest.index()];
        assert_eq!(chest.item_id, None);
        assert_eq!(chest.item_level, 0);
        assert_eq!(chest.classification, SetClassification::No);
        assert_eq!(chest.enchant, EnchantQuality::NotApplicable);
    }

    #[test]
    fn test_enchant_tiers() {
        let ruleset = Ruleset::builtin();

        let best = RawItem {
            permanent_enchant: Some(5942),
            ..item(SlotId::Finger1, 1, 400)
        };
        let other = RawItem {
            permanent_enchant: Some(12345),
            ..item(SlotId::Finger2, 2, 400)
        };
        let bare = item(SlotId::MainHand, 3, 400);
        // Enchant data on a non-enchantable slot must not change its grade
        let head = RawItem {
            permanent_enchant: Some(5942),
            ..item(SlotId::Head, 4, 400)
        };

        let normalized = normalize(&[best, other, bare, head], &ruleset);
        assert_eq!(
            normalized.slots[SlotId::Finger1.index()].enchant,
            EnchantQuality::Best
        );
        assert_eq!(
            normalized.slots[SlotId::Finger2.index()].enchant,
            EnchantQuality::SubOptimal
        );
        assert_eq!(
            normalized.slots[SlotId::MainHand.index()].enchant,
            EnchantQuality::Unenchanted
        );
        assert_eq!(
            normalized.slots[SlotId::Head.index()].enchant,
            EnchantQuality::NotApplicable
        );
    }

    #[test]
    fn test_gem_lists_preserved_per_slot() {
        let ruleset = Ruleset::builtin();
        let gemmed = RawItem {
            gems: vec![301, 302, 303],
            ..item(SlotId::Neck, 1, 400)
        };
        let plain = item(SlotId::Waist, 2, 400);

        let normalized = normalize(&[gemmed, plain], &ruleset);
        assert_eq!(normalized.slots[SlotId::Neck.index()].gems, vec![301, 302, 303]);
        assert!(normalized.slots[SlotId::Waist.index()].gems.is_empty());
    }

    #[test]
    fn test_tier_beats_crafted_classification() {
        let mut ruleset = Ruleset::builtin();
        ruleset.tier_sets.push(1526);

        let tier = RawItem {
            item_set: Some(1526),
            context: Some("trade-skill".into()),
            ..item(SlotId::Chest, 1, 400)
        };
        let crafted = RawItem {
            context: Some("trade-skill".into()),
            ..item(SlotId::Legs, 2, 400)
        };
        let embellished = RawItem {
            limit_category: Some("Unique-Equipped: Embellished (2)".into()),
            ..item(SlotId::Wrist, 3, 400)
        };
        let plain = item(SlotId::Feet, 4, 400);

        let normalized = normalize(&[tier, crafted, embellished, plain], &ruleset);
        assert_eq!(
            normalized.slots[SlotId::Chest.index()].classification,
            SetClassification::Tier
        );
        assert_eq!(
            normalized.slots[SlotId::Legs.index()].classification,
            SetClassification::Crafted
        );
        assert_eq!(
            normalized.slots[SlotId::Wrist.index()].classification,
            SetClassification::Crafted
        );
        assert_eq!(
            normalized.slots[SlotId::Feet.index()].classification,
            SetClassification::No
        );
        assert_eq!(normalized.tier_pieces, 1);
        assert_eq!(normalized.crafted_pieces, 2);
    }

    #[test]
    fn test_two_hander_counts_twice() {
        let ruleset = Ruleset::builtin();
        let with_two_hander = vec![item(SlotId::Head, 1, 400), two_hander(430)];
        // (400 + 430 + 430) / 3
        let normalized = normalize(&with_two_hander, &ruleset);
        assert_eq!(normalized.equipped_item_level, 420.0);

        let with_off_hand = vec![
            item(SlotId::Head, 1, 400),
            two_hander(430),
            item(SlotId::OffHand, 2, 410),
        ];
        // Off-hand present: every slot counts once
        let normalized = normalize(&with_off_hand, &ruleset);
        assert_eq!(normalized.equipped_item_level, (1240.0_f64 / 3.0 * 10.0).round() / 10.0);
    }

    #[test]
    fn test_one_handed_lone_weapon_counts_once() {
        let ruleset = Ruleset::builtin();
        let one_hander = RawItem {
            inventory_type: Some("WEAPON".into()),
            ..item(SlotId::MainHand, 1, 430)
        };
        let normalized = normalize(&[item(SlotId::Head, 2, 400), one_hander], &ruleset);
        assert_eq!(normalized.equipped_item_level, 415.0);
    }

    #[test]
    fn test_legacy_lone_main_hand_assumed_two_handed() {
        let ruleset = Ruleset::builtin();
        // No inventory type (legacy payload): lone main-hand doubles
        let normalized = normalize(
            &[item(SlotId::Head, 1, 400), item(SlotId::MainHand, 2, 430)],
            &ruleset,
        );
        assert_eq!(normalized.equipped_item_level, 420.0);
    }

    #[test]
    fn test_no_items_no_division() {
        let ruleset = Ruleset::builtin();
        let normalized = normalize(&[], &ruleset);
        assert_eq!(normalized.equipped_item_level, 0.0);
        assert!(normalized.slots.iter().all(|s| s.item_id.is_none()));
    }

    #[test]
    fn test_corrections_affect_slots_and_average() {
        let mut ruleset = Ruleset::builtin();
        ruleset.corrections.push(ItemLevelCorrection {
            item_id: Some(1001),
            item_level: Some(400),
            context: None,
            offset: 10,
        });

        let normalized = normalize(
            &[item(SlotId::Head, 1001, 400), item(SlotId::Chest, 1002, 400)],
            &ruleset,
        );
        assert_eq!(normalized.slots[SlotId::Head.index()].item_level, 410);
        assert_eq!(normalized.slots[SlotId::Chest.index()].item_level, 400);
        assert_eq!(normalized.equipped_item_level, 405.0);
    }

    #[test]
    fn test_slot_override_pins_ring() {
        let mut ruleset = Ruleset::builtin();
        ruleset.slot_overrides.push(SlotOverride {
            item_id: 7777,
            slot: SlotId::Finger2,
        });

        let normalized = normalize(
            &[
                item(SlotId::Finger1, 7777, 415),
                item(SlotId::Finger2, 8888, 405),
            ],
            &ruleset,
        );

        let finger1 = &normalized.slots[SlotId::Finger1.index()];
        let finger2 = &normalized.slots[SlotId::Finger2.index()];
        assert_eq!(finger2.item_id, Some(7777));
        assert_eq!(finger1.item_id, Some(8888));
        // Slot tags follow the grid position, not the item
        assert_eq!(finger1.slot, SlotId::Finger1);
        assert_eq!(finger2.slot, SlotId::Finger2);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let ruleset = Ruleset::builtin();
        let normalized = normalize(
            &[
                item(SlotId::Head, 1, 400),
                item(SlotId::Chest, 2, 401),
                item(SlotId::Legs, 3, 401),
            ],
            &ruleset,
        );
        // 1202 / 3 = 400.666... -> 400.7
        assert_eq!(normalized.equipped_item_level, 400.7);
    }
}
