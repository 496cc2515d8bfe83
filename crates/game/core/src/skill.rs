//! Skill templates.
//!
//! A [`Skill`] is an immutable description: what it costs, who it targets,
//! and the ordered effect list the interpreter walks. Skills are normalized
//! from catalog definitions once and never mutated during combat; all
//! per-encounter state (cooldowns) lives on the combatant.

use strum::{Display, EnumString};

use crate::effect::Effect;
use crate::resource::Cost;

/// Elemental damage tags, matched against a defender's percent resistances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Element {
    Fire,
    Frost,
    Lightning,
    Poison,
    Shadow,
    Holy,
}

/// Broad skill classification: which attack stat applies and whether the
/// enemy policy counts it as an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SkillKind {
    #[strum(serialize = "physical", serialize = "attack", serialize = "melee")]
    Physical,
    #[strum(serialize = "magic", serialize = "spell")]
    Magic,
    #[strum(serialize = "support", serialize = "utility")]
    Support,
}

/// Who a skill is aimed at. Individual effects may still redirect to the
/// other side via their own `target` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetSelector {
    Enemy,
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfCast,
}

/// Immutable skill template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub kind: SkillKind,
    pub target: TargetSelector,
    pub cost: Cost,
    /// Flat bonus to the hit roll, on top of the attacker's accuracy stat.
    pub accuracy_bonus: i32,
    pub element: Option<Element>,
    /// Turns before reuse; 0 means no cooldown. Only the enemy policy
    /// enforces cooldowns in this prototype.
    pub cooldown: u32,
    pub effects: Vec<Effect>,
}

impl Skill {
    /// Whether the enemy policy may pick this in its any-ready-attack step.
    pub fn is_attack(&self) -> bool {
        self.kind != SkillKind::Support
    }

    /// First damage-carrying effect, lifted into a strike spec for the
    /// one-shot [`crate::combat::resolve_attack`] entry point.
    pub fn strike_spec(&self) -> Option<StrikeSpec> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Damage {
                power, element, variance, ..
            } => Some(StrikeSpec {
                base_power: *power,
                base_variance_percent: *variance,
                kind: self.kind,
                accuracy_bonus: self.accuracy_bonus,
                element: element.or(self.element),
            }),
            Effect::DamageRoll { min, max, .. } => Some(StrikeSpec {
                // Midpoint; the interpreter rolls the real range per use.
                base_power: (*min + *max) / 2,
                base_variance_percent: None,
                kind: self.kind,
                accuracy_bonus: self.accuracy_bonus,
                element: self.element,
            }),
            _ => None,
        })
    }

    /// The synthesized generic attack an enemy falls back to when nothing
    /// else is usable: fixed power, no cost, no cooldown.
    pub fn fallback(power: u32) -> Self {
        Self {
            id: "fallback_strike".into(),
            name: "Strike".into(),
            kind: SkillKind::Physical,
            target: TargetSelector::Enemy,
            cost: Cost::free(),
            accuracy_bonus: 0,
            element: None,
            cooldown: 0,
            effects: vec![Effect::Damage {
                power,
                scaling: None,
                element: None,
                variance: None,
            }],
        }
    }
}

/// Parameters of a single strike fed to the damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeSpec {
    pub base_power: u32,
    /// Optional symmetric ± percent applied to `base_power` before stats.
    pub base_variance_percent: Option<u32>,
    pub kind: SkillKind,
    pub accuracy_bonus: i32,
    pub element: Option<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_aliases_parse() {
        assert_eq!("attack".parse::<SkillKind>().unwrap(), SkillKind::Physical);
        assert_eq!("spell".parse::<SkillKind>().unwrap(), SkillKind::Magic);
        assert_eq!("Support".parse::<SkillKind>().unwrap(), SkillKind::Support);
    }

    #[test]
    fn fallback_is_always_usable() {
        let skill = Skill::fallback(4);
        assert!(skill.cost.is_free());
        assert_eq!(skill.cooldown, 0);
        assert!(skill.is_attack());
        assert!(skill.strike_spec().is_some());
    }
}
