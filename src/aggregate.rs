//! Group-level statistics.
//!
//! One accumulator per import run, fed once per successfully loaded main
//! character and folded single-threaded after all fetches join, so it needs
//! no synchronization. Bench members and failed entries never touch it.

use serde::Serialize;

use crate::models::Role;

/// Armor class worn by a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorType {
    /// Mage, Priest, Warlock
    Cloth,
    /// Druid, Monk, Rogue, Demon Hunter
    Leather,
    /// Hunter, Shaman
    Mail,
    /// Paladin, Warrior, Death Knight
    Plate,
}

/// Armor-token bucket a character class rolls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Paladin, Priest, Warlock, Demon Hunter
    Conqueror,
    /// Warrior, Hunter, Shaman, Monk
    Protector,
    /// Rogue, Death Knight, Mage, Druid
    Vanquisher,
}

/// Armor type for a class name; `None` for unrecognized classes.
pub fn armor_type_for_class(class_name: &str) -> Option<ArmorType> {
    match class_name {
        "Mage" | "Priest" | "Warlock" => Some(ArmorType::Cloth),
        "Druid" | "Monk" | "Rogue" | "Demon Hunter" => Some(ArmorType::Leather),
        "Hunter" | "Shaman" => Some(ArmorType::Mail),
        "Paladin" | "Warrior" | "Death Knight" => Some(ArmorType::Plate),
        _ => None,
    }
}

/// Token bucket for a class name; `None` for unrecognized classes.
pub fn token_type_for_class(class_name: &str) -> Option<TokenType> {
    match class_name {
        "Paladin" | "Priest" | "Warlock" | "Demon Hunter" => Some(TokenType::Conqueror),
        "Warrior" | "Hunter" | "Shaman" | "Monk" => Some(TokenType::Protector),
        "Rogue" | "Death Knight" | "Mage" | "Druid" => Some(TokenType::Vanquisher),
        _ => None,
    }
}

/// Running totals for one import.
///
/// The main count tracked here may be lower than the number of mains in the
/// roster, since entries that fail to load are excluded from the averages.
#[derive(Debug, Default)]
pub struct GroupStats {
    mains: u32,
    total_ilvl: f64,
    total_ilvl_eq: f64,

    cloth: u32,
    leather: u32,
    mail: u32,
    plate: u32,

    conqueror: u32,
    protector: u32,
    vanquisher: u32,

    tanks: u32,
    healers: u32,
    melee: u32,
    ranged: u32,
}

impl GroupStats {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one successfully loaded main character into the totals.
    pub fn record_main(&mut self, class_name: &str, role: Role, avg_ilvl: f64, eq_ilvl: f64) {
        self.mains += 1;
        self.total_ilvl += avg_ilvl;
        self.total_ilvl_eq += eq_ilvl;

        match armor_type_for_class(class_name) {
            Some(ArmorType::Cloth) => self.cloth += 1,
            Some(ArmorType::Leather) => self.leather += 1,
            Some(ArmorType::Mail) => self.mail += 1,
            Some(ArmorType::Plate) => self.plate += 1,
            None => {}
        }
        match token_type_for_class(class_name) {
            Some(TokenType::Conqueror) => self.conqueror += 1,
            Some(TokenType::Protector) => self.protector += 1,
            Some(TokenType::Vanquisher) => self.vanquisher += 1,
            None => {}
        }
        match role {
            Role::Tank => self.tanks += 1,
            Role::Healer => self.healers += 1,
            Role::Dps => self.melee += 1,
            Role::Ranged => self.ranged += 1,
        }
    }

    /// Number of mains folded in so far.
    pub fn mains(&self) -> u32 {
        self.mains
    }

    /// Computes the final summary.
    pub fn finalize(&self) -> GroupSummary {
        let (average_item_level, average_equipped_item_level) = if self.mains == 0 {
            // Nothing loaded; report zeros rather than dividing
            (0.0, 0.0)
        } else {
            let mains = f64::from(self.mains);
            (
                round_to_cents(self.total_ilvl / mains),
                round_to_cents(self.total_ilvl_eq / mains),
            )
        };

        GroupSummary {
            mains: self.mains,
            average_item_level,
            average_equipped_item_level,
            cloth: self.cloth,
            leather: self.leather,
            mail: self.mail,
            plate: self.plate,
            conqueror: self.conqueror,
            protector: self.protector,
            vanquisher: self.vanquisher,
            tanks: self.tanks,
            healers: self.healers,
            melee: self.melee,
            ranged: self.ranged,
        }
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Finalized group statistics for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Mains that loaded successfully and were counted
    pub mains: u32,
    /// Mean server-reported item level over counted mains, 2 decimals
    pub average_item_level: f64,
    /// Mean equipped item level over counted mains, 2 decimals
    pub average_equipped_item_level: f64,
    /// Cloth wearers among counted mains
    pub cloth: u32,
    /// Leather wearers
    pub leather: u32,
    /// Mail wearers
    pub mail: u32,
    /// Plate wearers
    pub plate: u32,
    /// Conqueror-token classes
    pub conqueror: u32,
    /// Protector-token classes
    pub protector: u32,
    /// Vanquisher-token classes
    pub vanquisher: u32,
    /// Tanks
    pub tanks: u32,
    /// Healers
    pub healers: u32,
    /// Melee damage
    pub melee: u32,
    /// Ranged damage
    pub ranged: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_with_zero_mains_is_zero() {
        let stats = GroupStats::new();
        let summary = stats.finalize();
        assert_eq!(summary.mains, 0);
        assert_eq!(summary.average_item_level, 0.0);
        assert_eq!(summary.average_equipped_item_level, 0.0);
    }

    #[test]
    fn test_averages_round_to_two_decimals() {
        let mut stats = GroupStats::new();
        stats.record_main("Mage", Role::Ranged, 420.0, 418.0);
        stats.record_main("Warrior", Role::Tank, 421.0, 419.0);
        stats.record_main("Priest", Role::Healer, 422.0, 417.0);
        let summary = stats.finalize();
        assert_eq!(summary.mains, 3);
        assert_eq!(summary.average_item_level, 421.0);
        // (418 + 419 + 417) / 3 = 418.0
        assert_eq!(summary.average_equipped_item_level, 418.0);

        let mut uneven = GroupStats::new();
        uneven.record_main("Mage", Role::Ranged, 400.0, 400.0);
        uneven.record_main("Mage", Role::Ranged, 401.0, 401.0);
        uneven.record_main("Mage", Role::Ranged, 401.0, 401.0);
        // 1202 / 3 = 400.666... -> 400.67
        assert_eq!(uneven.finalize().average_item_level, 400.67);
    }

    #[test]
    fn test_armor_buckets() {
        let mut stats = GroupStats::new();
        stats.record_main("Mage", Role::Ranged, 400.0, 400.0);
        stats.record_main("Warlock", Role::Ranged, 400.0, 400.0);
        stats.record_main("Rogue", Role::Dps, 400.0, 400.0);
        stats.record_main("Shaman", Role::Healer, 400.0, 400.0);
        stats.record_main("Death Knight", Role::Tank, 400.0, 400.0);
        let summary = stats.finalize();
        assert_eq!(summary.cloth, 2);
        assert_eq!(summary.leather, 1);
        assert_eq!(summary.mail, 1);
        assert_eq!(summary.plate, 1);
    }

    #[test]
    fn test_token_buckets() {
        let mut stats = GroupStats::new();
        stats.record_main("Paladin", Role::Tank, 400.0, 400.0);
        stats.record_main("Demon Hunter", Role::Dps, 400.0, 400.0);
        stats.record_main("Monk", Role::Healer, 400.0, 400.0);
        stats.record_main("Druid", Role::Dps, 400.0, 400.0);
        let summary = stats.finalize();
        assert_eq!(summary.conqueror, 2);
        assert_eq!(summary.protector, 1);
        assert_eq!(summary.vanquisher, 1);
    }

    #[test]
    fn test_role_buckets_count_dps_as_melee() {
        let mut stats = GroupStats::new();
        stats.record_main("Rogue", Role::Dps, 400.0, 400.0);
        stats.record_main("Mage", Role::Ranged, 400.0, 400.0);
        stats.record_main("Warrior", Role::Tank, 400.0, 400.0);
        stats.record_main("Priest", Role::Healer, 400.0, 400.0);
        let summary = stats.finalize();
        assert_eq!(summary.melee, 1);
        assert_eq!(summary.ranged, 1);
        assert_eq!(summary.tanks, 1);
        assert_eq!(summary.healers, 1);
    }

    #[test]
    fn test_unknown_class_counts_toward_averages_only() {
        let mut stats = GroupStats::new();
        stats.record_main("Tinker", Role::Dps, 400.0, 400.0);
        let summary = stats.finalize();
        assert_eq!(summary.mains, 1);
        assert_eq!(summary.average_item_level, 400.0);
        assert_eq!(
            summary.cloth + summary.leather + summary.mail + summary.plate,
            0
        );
        assert_eq!(
            summary.conqueror + summary.protector + summary.vanquisher,
            0
        );
    }
}
