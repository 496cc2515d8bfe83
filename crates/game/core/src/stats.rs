//! Base stat block for combatants.
//!
//! Stats are plain signed integers; buffs and debuffs mutate them additively
//! and timed modifiers revert their delta on expiry. Catalog files address
//! stats by short key (`atk`, `def`, ...) which [`StatKind`] parses.

use strum::{Display, EnumString};

/// Identifies one stat on a [`BaseStats`] block.
///
/// The string forms match the catalog JSON keys served by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatKind {
    #[strum(serialize = "atk", serialize = "attack")]
    #[cfg_attr(feature = "serde", serde(rename = "atk", alias = "attack"))]
    Attack,
    #[strum(serialize = "mag", serialize = "magic")]
    #[cfg_attr(feature = "serde", serde(rename = "mag", alias = "magic"))]
    Magic,
    #[strum(serialize = "def", serialize = "defense")]
    #[cfg_attr(feature = "serde", serde(rename = "def", alias = "defense"))]
    Defense,
    #[strum(serialize = "res", serialize = "resist")]
    #[cfg_attr(feature = "serde", serde(rename = "res", alias = "resist"))]
    MagicResist,
    #[strum(serialize = "spd", serialize = "speed")]
    #[cfg_attr(feature = "serde", serde(rename = "spd", alias = "speed"))]
    Speed,
    #[strum(serialize = "acc", serialize = "accuracy")]
    #[cfg_attr(feature = "serde", serde(rename = "acc", alias = "accuracy"))]
    Accuracy,
    #[strum(serialize = "eva", serialize = "evasion")]
    #[cfg_attr(feature = "serde", serde(rename = "eva", alias = "evasion"))]
    Evasion,
}

/// Base stat block.
///
/// Missing catalog keys default to 0 so a sparse definition still produces a
/// working combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub magic_resist: i32,
    pub speed: i32,
    pub accuracy: i32,
    pub evasion: i32,
}

impl BaseStats {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::Magic => self.magic,
            StatKind::Defense => self.defense,
            StatKind::MagicResist => self.magic_resist,
            StatKind::Speed => self.speed,
            StatKind::Accuracy => self.accuracy,
            StatKind::Evasion => self.evasion,
        }
    }

    /// Additively modify a stat. Buff effects pass positive amounts,
    /// debuffs negative; reverting a modifier passes the negated amount.
    pub fn add(&mut self, kind: StatKind, amount: i32) {
        let slot = match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Magic => &mut self.magic,
            StatKind::Defense => &mut self.defense,
            StatKind::MagicResist => &mut self.magic_resist,
            StatKind::Speed => &mut self.speed,
            StatKind::Accuracy => &mut self.accuracy,
            StatKind::Evasion => &mut self.evasion,
        };
        *slot += amount;
    }

    /// Build a stat block from catalog `baseStats` entries.
    ///
    /// Unknown keys (including the legacy flat `hp`/`mp` gauges, which feed
    /// pool initialization instead) are ignored here.
    pub fn from_catalog<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i32)>,
    {
        let mut stats = Self::default();
        for (key, value) in entries {
            if let Ok(kind) = key.parse::<StatKind>() {
                stats.add(kind, value);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_parse() {
        assert_eq!("atk".parse::<StatKind>().unwrap(), StatKind::Attack);
        assert_eq!("defense".parse::<StatKind>().unwrap(), StatKind::Defense);
        assert!("luck".parse::<StatKind>().is_err());
    }

    #[test]
    fn from_catalog_ignores_unknown_keys() {
        let stats =
            BaseStats::from_catalog([("atk", 7), ("def", 6), ("hp", 36), ("banana", 3)]);
        assert_eq!(stats.attack, 7);
        assert_eq!(stats.defense, 6);
        assert_eq!(stats.magic, 0);
    }

    #[test]
    fn add_and_revert_round_trips() {
        let mut stats = BaseStats::from_catalog([("spd", 4)]);
        stats.add(StatKind::Speed, -2);
        assert_eq!(stats.speed, 2);
        stats.add(StatKind::Speed, 2);
        assert_eq!(stats.speed, 4);
    }
}
