//! Combat result types and attack resolution.

use crate::combatant::Combatant;
use crate::config::CombatConfig;
use crate::rng::RollSource;
use crate::skill::{Skill, SkillKind, StrikeSpec};

use super::damage::{apply_variance, elemental_reduction, mitigate};
use super::hit::{check_hit, hit_chance};

/// Every intermediate value of one strike, for diagnostics and logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBreakdown {
    pub hit_chance: i32,
    pub hit_roll: u32,
    /// Declared base power after the skill's own variance, before stats.
    pub base: u32,
    /// Base + attack stat + power bonus.
    pub raw: u32,
    pub mitigated: u32,
    pub varied: u32,
    pub after_element: u32,
}

/// Outcome of one resolved strike. Never mutates HP; the caller applies
/// `damage` to the target (shields first).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub hit: bool,
    pub damage: u32,
    pub crit: bool,
    pub breakdown: DamageBreakdown,
}

impl AttackReport {
    fn miss(chance: i32, roll: u32) -> Self {
        Self {
            hit: false,
            damage: 0,
            crit: false,
            breakdown: DamageBreakdown {
                hit_chance: chance,
                hit_roll: roll,
                ..DamageBreakdown::default()
            },
        }
    }
}

/// Outcome of a full attack attempt, including the affordability gate.
///
/// Expected failures are data, not errors: an unaffordable cast comes back
/// as `Rejected` with no state touched anywhere.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackResolution {
    /// The attacker cannot pay the skill's cost.
    Rejected {
        resource: String,
        needed: u32,
        available: u32,
    },
    Resolved(AttackReport),
}

/// Resolve one strike through the canonical pipeline.
///
/// `power_bonus` is the caller-evaluated scaling bonus (stat × multiplier +
/// flat); it is kept out of [`StrikeSpec`] because it depends on the
/// attacker's live stats.
pub fn resolve_strike(
    attacker: &Combatant,
    defender: &Combatant,
    spec: &StrikeSpec,
    power_bonus: i32,
    config: &CombatConfig,
    rolls: &mut RollSource<'_>,
) -> AttackReport {
    // 1. Hit roll.
    let chance = hit_chance(
        config.base_hit_chance,
        attacker.stats.accuracy,
        spec.accuracy_bonus,
        defender.stats.evasion,
        defender.evasion_bonus_percent,
    );
    let roll = rolls.d100();
    if !check_hit(chance, roll) {
        return AttackReport::miss(chance, roll);
    }

    // 2. Base power, with the skill's own variance if declared.
    let base = match spec.base_variance_percent {
        Some(variance) if variance > 0 => {
            let percent = rolls.range(100u32.saturating_sub(variance), 100 + variance);
            apply_variance(spec.base_power, percent)
        }
        _ => spec.base_power,
    };

    // 3. Raw power: base + attack stat + scaling bonus.
    let attack_stat = match spec.kind {
        SkillKind::Magic => attacker.stats.magic,
        _ => attacker.stats.attack,
    };
    let raw = (base as i64 + attack_stat as i64 + power_bonus as i64).max(0) as u32;

    // 4. Soft-cap mitigation against the matching defense stat.
    let defense_stat = match spec.kind {
        SkillKind::Magic => defender.stats.magic_resist,
        _ => defender.stats.defense,
    };
    let mitigated = mitigate(raw, defense_stat, defender.vulnerability, config.mitigation_k);

    // 5. Pipeline variance band.
    let percent = rolls.range(config.variance_min_percent, config.variance_max_percent);
    let mut varied = apply_variance(mitigated, percent);

    // 6. Critical hit.
    let crit = rolls.d100() <= config.crit_chance;
    if crit {
        varied = apply_variance(varied, config.crit_multiplier_percent);
    }

    // 7. Elemental resistance.
    let after_element = match spec.element {
        Some(element) => elemental_reduction(varied, defender.resistance(element)),
        None => varied,
    };

    // 8. Floor: a hit always deals at least 1.
    let damage = after_element.max(1);

    AttackReport {
        hit: true,
        damage,
        crit,
        breakdown: DamageBreakdown {
            hit_chance: chance,
            hit_roll: roll,
            base,
            raw,
            mitigated,
            varied,
            after_element,
        },
    }
}

/// Resolve a complete attack: affordability gate, then the strike pipeline.
///
/// The main entry point for one-shot resolution and tests. Support skills
/// without a damage effect resolve as a zero-power strike (the floor still
/// applies on a hit). Nothing is deducted or mutated here - the turn
/// sequencer owns cost deduction and damage application.
pub fn resolve_attack(
    attacker: &Combatant,
    defender: &Combatant,
    skill: &Skill,
    config: &CombatConfig,
    rolls: &mut RollSource<'_>,
) -> AttackResolution {
    for (resource, needed) in skill.cost.entries() {
        if !attacker.pools.can_afford_amount(resource, needed) {
            let available = attacker.pools.get(resource).map_or(0, |pool| pool.current);
            return AttackResolution::Rejected {
                resource: resource.to_string(),
                needed,
                available,
            };
        }
    }

    let spec = skill.strike_spec().unwrap_or(StrikeSpec {
        base_power: 0,
        base_variance_percent: None,
        kind: skill.kind,
        accuracy_bonus: skill.accuracy_bonus,
        element: skill.element,
    });
    let power_bonus = skill
        .effects
        .iter()
        .find_map(|effect| match effect {
            crate::effect::Effect::Damage { scaling, .. }
            | crate::effect::Effect::DamageRoll { scaling, .. } => *scaling,
            _ => None,
        })
        .map_or(0, |formula| formula.evaluate(&attacker.stats));

    AttackResolution::Resolved(resolve_strike(
        attacker, defender, &spec, power_bonus, config, rolls,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::testkit::combatant;
    use crate::effect::Effect;
    use crate::resource::Cost;
    use crate::rng::RngOracle;
    use crate::skill::TargetSelector;

    /// Oracle returning a fixed raw value for every seed. With value 50:
    /// d100 = 51 (hits anything with chance >= 51, never crits at 10%),
    /// range(90, 110) = 98.
    pub struct FixedRng(pub u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn strike() -> StrikeSpec {
        StrikeSpec {
            base_power: 10,
            base_variance_percent: None,
            kind: SkillKind::Physical,
            accuracy_bonus: 0,
            element: None,
        }
    }

    #[test]
    fn miss_short_circuits_damage_math() {
        let attacker = combatant("a", &[("atk", 10)]);
        let defender = combatant("d", &[]);
        let rng = FixedRng(98); // d100 = 99 > 95 ceiling
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let config = CombatConfig::new();
        let report = resolve_strike(&attacker, &defender, &strike(), 0, &config, &mut rolls);
        assert!(!report.hit);
        assert_eq!(report.damage, 0);
        assert_eq!(report.breakdown.raw, 0);
    }

    #[test]
    fn hit_always_deals_at_least_one() {
        let attacker = combatant("a", &[]);
        let defender = combatant("d", &[("def", 500)]);
        let rng = FixedRng(50);
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let config = CombatConfig::new();
        let spec = StrikeSpec {
            base_power: 1,
            ..strike()
        };
        let report = resolve_strike(&attacker, &defender, &spec, 0, &config, &mut rolls);
        assert!(report.hit);
        assert!(report.damage >= 1);
    }

    #[test]
    fn crit_multiplies_damage() {
        let attacker = combatant("a", &[("atk", 20)]);
        let defender = combatant("d", &[]);
        let config = CombatConfig::new();

        // FixedRng(0): d100 = 1, range(90,110) = 90; 1 <= 10 so every roll
        // crits. FixedRng(50) hits without critting.
        let crit_rng = FixedRng(0);
        let mut crit_rolls = RollSource::new(&crit_rng, 0, 0, 0);
        let crit_report =
            resolve_strike(&attacker, &defender, &strike(), 0, &config, &mut crit_rolls);

        let plain_rng = FixedRng(50);
        let mut plain_rolls = RollSource::new(&plain_rng, 0, 0, 0);
        let plain_report =
            resolve_strike(&attacker, &defender, &strike(), 0, &config, &mut plain_rolls);

        assert!(crit_report.crit);
        assert!(!plain_report.crit);
        // 30 raw, crit path: ×90% = 27, ×150% = 40; plain path: ×98% = 29.
        assert_eq!(crit_report.damage, 40);
        assert_eq!(plain_report.damage, 29);
    }

    #[test]
    fn magic_strikes_use_magic_stats() {
        let attacker = combatant("a", &[("mag", 15), ("atk", 99)]);
        let defender = combatant("d", &[("res", 50), ("def", 0)]);
        let rng = FixedRng(50);
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let config = CombatConfig::new();
        let spec = StrikeSpec {
            kind: SkillKind::Magic,
            base_power: 5,
            ..strike()
        };
        let report = resolve_strike(&attacker, &defender, &spec, 0, &config, &mut rolls);
        // raw = 5 + 15 = 20 (attack stat ignored), mitigated = 20×50/100 = 10
        assert_eq!(report.breakdown.raw, 20);
        assert_eq!(report.breakdown.mitigated, 10);
    }

    #[test]
    fn unaffordable_skill_is_rejected_without_rolls() {
        let mut attacker = combatant("a", &[("atk", 10)]);
        attacker.pools = crate::resource::PoolSet::initialize(
            [crate::resource::PoolSpec {
                explicit_max: Some(10),
                start: crate::resource::StartSpec::Literal(2),
                ..crate::resource::PoolSpec::bare("mana")
            }],
            &attacker.stats,
        );
        let defender = combatant("d", &[]);
        let skill = Skill {
            id: "bolt".into(),
            name: "Bolt".into(),
            kind: SkillKind::Magic,
            target: TargetSelector::Enemy,
            cost: Cost::single("mana", 5),
            accuracy_bonus: 0,
            element: None,
            cooldown: 0,
            effects: vec![Effect::Damage {
                power: 5,
                scaling: None,
                element: None,
                variance: None,
            }],
        };
        let rng = FixedRng(50);
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let config = CombatConfig::new();
        let resolution = resolve_attack(&attacker, &defender, &skill, &config, &mut rolls);
        assert_eq!(
            resolution,
            AttackResolution::Rejected {
                resource: "mana".into(),
                needed: 5,
                available: 2,
            }
        );
    }
}
