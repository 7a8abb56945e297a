//! Per-era adapters onto the canonical item shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::api::wire::EquipmentSummary;
use crate::models::SlotId;

/// Which payload generation the data API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiEra {
    /// The current profile API: `equipped_items` array, structured
    /// enchantment and socket objects
    Profile,
    /// The retired community API: a map of camelCase slot keys with
    /// `tooltipParams` carrying enchant and gem ids
    Legacy,
}

/// The equipment payload didn't have the shape the era adapter expects.
#[derive(Debug, Error)]
#[error("unexpected equipment payload: {0}")]
pub struct AdaptError(String);

/// One equipped item in canonical form, independent of API era.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    /// Canonical slot
    pub slot: SlotId,
    /// Item id
    pub item_id: u64,
    /// Reported item level, before corrections
    pub item_level: u32,
    /// Inventory type tag (e.g. `TWOHWEAPON`); legacy payloads don't carry
    /// one
    pub inventory_type: Option<String>,
    /// Permanent enchantment id, if any
    pub permanent_enchant: Option<u64>,
    /// Socketed gem ids, in socket order
    pub gems: Vec<u64>,
    /// Item-set id, if the item belongs to one
    pub item_set: Option<u64>,
    /// Item context (legacy crafted marker lives here)
    pub context: Option<String>,
    /// Limit category text (profile-era crafted marker lives here)
    pub limit_category: Option<String>,
}

/// Translates a raw equipment body into canonical items for the given era.
///
/// Items in slots outside the canonical 16 (shirt, tabard) are dropped, as
/// are entries too malformed to identify; only a body whose overall shape is
/// wrong for the era is an error.
pub fn adapt_equipment(era: ApiEra, body: &Value) -> Result<Vec<RawItem>, AdaptError> {
    match era {
        ApiEra::Profile => adapt_profile(body),
        ApiEra::Legacy => adapt_legacy(body),
    }
}

fn adapt_profile(body: &Value) -> Result<Vec<RawItem>, AdaptError> {
    let summary: EquipmentSummary =
        serde_json::from_value(body.clone()).map_err(|e| AdaptError(e.to_string()))?;

    let items = summary
        .equipped_items
        .into_iter()
        .filter_map(|item| {
            let slot = SlotId::from_api_type(&item.slot.kind)?;
            let permanent_enchant = item
                .enchantments
                .iter()
                .find(|e| e.enchantment_slot.as_ref().map(|s| s.id) == Some(0))
                .map(|e| e.enchantment_id);
            let gems = item
                .sockets
                .iter()
                .filter_map(|socket| socket.item.as_ref().map(|gem| gem.id))
                .collect();
            Some(RawItem {
                slot,
                item_id: item.item.id,
                item_level: item.level.value,
                inventory_type: item.inventory_type.map(|t| t.kind),
                permanent_enchant,
                gems,
                item_set: item.set.map(|s| s.item_set.id),
                context: None,
                limit_category: item.limit_category,
            })
        })
        .collect();
    Ok(items)
}

fn adapt_legacy(body: &Value) -> Result<Vec<RawItem>, AdaptError> {
    let map = body
        .as_object()
        .ok_or_else(|| AdaptError("legacy items payload is not an object".to_string()))?;

    let mut items = Vec::new();
    for slot in SlotId::ALL {
        let Some(raw) = map.get(slot.legacy_key()) else {
            continue;
        };
        // The legacy map mixes slot objects with scalar fields like
        // averageItemLevel; skip anything that isn't an item object
        let Some(item) = raw.as_object() else {
            continue;
        };
        let Some(item_id) = item.get("id").and_then(Value::as_u64) else {
            continue;
        };
        let item_level = item
            .get("itemLevel")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;
        let tooltip = item.get("tooltipParams").and_then(Value::as_object);
        let permanent_enchant = tooltip
            .and_then(|t| t.get("enchant"))
            .and_then(Value::as_u64)
            .filter(|id| *id != 0);
        let mut gems = Vec::new();
        if let Some(tooltip) = tooltip {
            for key in ["gem0", "gem1", "gem2"] {
                if let Some(gem) = tooltip.get(key).and_then(Value::as_u64) {
                    if gem != 0 {
                        gems.push(gem);
                    }
                }
            }
        }
        let item_set = item
            .get("itemSet")
            .and_then(|s| s.get("id"))
            .and_then(Value::as_u64);
        let context = item
            .get("context")
            .and_then(Value::as_str)
            .map(str::to_string);

        items.push(RawItem {
            slot,
            item_id,
            item_level,
            inventory_type: None,
            permanent_enchant,
            gems,
            item_set,
            context,
            limit_category: None,
        });
    }
    Ok(items)
}
