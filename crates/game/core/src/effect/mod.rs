//! Skill effect system - atomic, declarative steps that skills apply.
//!
//! An effect is a stateless description; applying one mutates a combatant
//! and reports what happened through the caller's [`EventSink`]. A skill is
//! simply an ordered list of effects, applied fully one at a time.
//!
//! Scaling is the closed-form [`ScalingFormula`] - a stat reference with a
//! percent multiplier and a flat bonus - never a string formula evaluated at
//! runtime.

mod apply;

pub use apply::{EventSink, apply_effects};

use crate::skill::Element;
use crate::stats::{BaseStats, StatKind};

// ============================================================================
// Scaling
// ============================================================================

/// `stat × multiplier% + flat`, evaluated against the caster's stat block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScalingFormula {
    pub stat: StatKind,
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub multiplier_percent: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flat: i32,
}

#[cfg(feature = "serde")]
fn default_multiplier() -> u32 {
    100
}

impl ScalingFormula {
    pub fn evaluate(&self, stats: &BaseStats) -> i32 {
        let scaled = (stats.get(self.stat) as i64 * self.multiplier_percent as i64) / 100;
        scaled as i32 + self.flat
    }
}

// ============================================================================
// Effect Target
// ============================================================================

/// Which side of the resolution an effect lands on, relative to the skill's
/// own target selector: `Target` is the skill's primary target, `Source` the
/// caster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EffectTarget {
    #[default]
    Target,
    Source,
}

// ============================================================================
// Effect
// ============================================================================

/// One declarative step within a skill's resolution list.
///
/// Serialized form is internally tagged on `kind` with camelCase names,
/// matching the catalog JSON. Unrecognized kinds deserialize to [`Effect::Unknown`],
/// which the interpreter logs and skips so a bad catalog entry never aborts
/// the remaining effects.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum Effect {
    /// Formula-based damage through the full pipeline.
    Damage {
        #[cfg_attr(feature = "serde", serde(default))]
        power: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        scaling: Option<ScalingFormula>,
        #[cfg_attr(feature = "serde", serde(default))]
        element: Option<Element>,
        /// Symmetric ± percent applied to `power` before stats are added.
        #[cfg_attr(feature = "serde", serde(default))]
        variance: Option<u32>,
    },

    /// Randomized damage range plus stat scaling.
    DamageRoll {
        min: u32,
        max: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        scaling: Option<ScalingFormula>,
    },

    /// Flat HP restoration, clamped to max HP.
    Heal {
        amount: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: EffectTarget,
    },

    /// Additive stat change; negative amounts are debuffs. A duration makes
    /// the change a timed modifier reverted at expiry; without one it lasts
    /// the encounter.
    Buff {
        stat: StatKind,
        amount: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<u32>,
        #[cfg_attr(feature = "serde", serde(default))]
        target: EffectTarget,
    },

    /// Temporary absorption pool consumed before HP on later damage.
    Shield {
        amount: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: EffectTarget,
    },

    /// Dodge bonus (percent) added to the caster's hit-avoidance.
    Evasion {
        percent: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<u32>,
    },

    /// Reduces the target's effective defense in mitigation.
    Vulnerability {
        amount: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<u32>,
    },

    /// Resource gain (refunds, heals-to-resource).
    Restore {
        resource: String,
        amount: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: EffectTarget,
    },

    /// Narrative-only immobilize stub.
    Root,

    /// Reduces the target's speed stat.
    Slow { amount: i32 },

    /// Narrative-only aggro stub.
    Taunt,

    /// Catch-all for catalog kinds this engine does not implement.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn effects_deserialize_from_catalog_json() {
        let json = r#"[
            {"kind": "damage", "power": 6, "scaling": {"stat": "atk", "multiplierPercent": 120}},
            {"kind": "damageRoll", "min": 2, "max": 5},
            {"kind": "heal", "amount": 8, "target": "source"},
            {"kind": "buff", "stat": "def", "amount": 3, "duration": 2},
            {"kind": "shield", "amount": 10},
            {"kind": "vulnerability", "amount": 2},
            {"kind": "summonBear"}
        ]"#;
        let effects: Vec<Effect> = serde_json::from_str(json).unwrap();
        assert_eq!(effects.len(), 7);
        assert!(matches!(
            effects[0],
            Effect::Damage {
                power: 6,
                scaling: Some(ScalingFormula {
                    stat: StatKind::Attack,
                    multiplier_percent: 120,
                    flat: 0,
                }),
                ..
            }
        ));
        assert!(matches!(
            effects[2],
            Effect::Heal {
                amount: 8,
                target: EffectTarget::Source,
            }
        ));
        assert!(matches!(effects[6], Effect::Unknown));
    }

    #[test]
    fn scaling_evaluates_with_flat_bonus() {
        let stats = BaseStats::from_catalog([("atk", 10)]);
        let formula = ScalingFormula {
            stat: StatKind::Attack,
            multiplier_percent: 150,
            flat: 2,
        };
        assert_eq!(formula.evaluate(&stats), 17);
    }
}
