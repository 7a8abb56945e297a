//! Wire-format types for the data API.
//!
//! Deserialization targets for the profile-era endpoints. Optional fields
//! default so a drifting payload degrades to missing data instead of a hard
//! parse failure; the shapes the importer can't work without stay required.

use serde::Deserialize;
use serde_json::Value;

/// Response from the credential exchange endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// API-level error envelope.
///
/// The API reports logical errors (unknown character, hidden profile) with
/// this body, sometimes under HTTP 200, so it has to be checked on every
/// response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub code: i64,
    pub detail: String,
}

/// Extracts the error envelope from a response body, if both marker fields
/// are present.
pub(crate) fn error_envelope(body: &Value) -> Option<ApiErrorEnvelope> {
    if body.get("code").is_some() && body.get("detail").is_some() {
        serde_json::from_value(body.clone()).ok()
    } else {
        None
    }
}

/// Character profile summary.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub character_class: ClassRef,
    #[serde(default)]
    pub guild: Option<GuildRef>,
    #[serde(default)]
    pub average_item_level: f64,
    #[serde(default)]
    pub equipped_item_level: f64,
    pub equipment: Href,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildRef {
    pub name: String,
}

/// A link to a related resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Href {
    pub href: String,
}

/// Equipment detail response (profile era).
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentSummary {
    #[serde(default)]
    pub equipped_items: Vec<EquippedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EquippedItem {
    pub slot: TypeRef,
    pub item: ItemRef,
    pub level: ValueRef,
    #[serde(default)]
    pub inventory_type: Option<TypeRef>,
    #[serde(default)]
    pub enchantments: Vec<Enchantment>,
    #[serde(default)]
    pub sockets: Vec<Socket>,
    #[serde(default)]
    pub set: Option<ItemSetWrapper>,
    #[serde(default)]
    pub limit_category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRef {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueRef {
    pub value: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Enchantment {
    pub enchantment_id: u64,
    #[serde(default)]
    pub enchantment_slot: Option<EnchantmentSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnchantmentSlot {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Socket {
    /// Present when the socket is filled
    #[serde(default)]
    pub item: Option<ItemRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSetWrapper {
    pub item_set: ItemSetRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSetRef {
    pub id: u64,
}
