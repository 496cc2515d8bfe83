//! Effect interpreter.
//!
//! Walks a skill's effect list in declared order and applies each effect
//! fully before advancing to the next. After every applied effect the
//! caller's [`EventSink`] is invoked - that callback is the yield point a
//! presentation layer uses to re-render and pace the sequence.
//!
//! Unknown effect kinds are reported and skipped; they never abort the
//! remaining effects.

use crate::combat::resolve_strike;
use crate::combatant::{Combatant, ModifierKind};
use crate::config::CombatConfig;
use crate::event::{CombatEvent, StatusTag};
use crate::rng::RollSource;
use crate::skill::{Skill, StrikeSpec, TargetSelector};
use crate::stats::StatKind;

use super::{Effect, EffectTarget};

/// Receives every combat event as it happens.
///
/// The engine threads one sink through a whole turn; collecting into a
/// `Vec<CombatEvent>` is the common implementation.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Apply every effect of `skill`, cast by `source` against `foe`.
///
/// The skill's target selector picks the primary recipient (`foe`, or
/// `source` for self-cast skills); individual effects may redirect to the
/// other side via their own target field. Damage always resolves against
/// `foe`. Costs are NOT handled here - the turn sequencer gates and deducts
/// before interpreting.
pub fn apply_effects(
    source: &mut Combatant,
    foe: &mut Combatant,
    skill: &Skill,
    config: &CombatConfig,
    rolls: &mut RollSource<'_>,
    sink: &mut dyn EventSink,
) {
    for effect in &skill.effects {
        apply_one(source, foe, skill, effect, config, rolls, sink);
    }
}

fn apply_one(
    source: &mut Combatant,
    foe: &mut Combatant,
    skill: &Skill,
    effect: &Effect,
    config: &CombatConfig,
    rolls: &mut RollSource<'_>,
    sink: &mut dyn EventSink,
) {
    let self_cast = skill.target == TargetSelector::SelfCast;

    match effect {
        Effect::Damage {
            power,
            scaling,
            element,
            variance,
        } => {
            let spec = StrikeSpec {
                base_power: *power,
                base_variance_percent: *variance,
                kind: skill.kind,
                accuracy_bonus: skill.accuracy_bonus,
                element: element.or(skill.element),
            };
            let bonus = scaling.map_or(0, |formula| formula.evaluate(&source.stats));
            strike(source, foe, &spec, bonus, config, rolls, sink);
        }

        Effect::DamageRoll { min, max, scaling } => {
            let rolled = rolls.range(*min, (*max).max(*min));
            let spec = StrikeSpec {
                base_power: rolled,
                base_variance_percent: None,
                kind: skill.kind,
                accuracy_bonus: skill.accuracy_bonus,
                element: skill.element,
            };
            let bonus = scaling.map_or(0, |formula| formula.evaluate(&source.stats));
            strike(source, foe, &spec, bonus, config, rolls, sink);
        }

        Effect::Heal { amount, target } => {
            let who = recipient(source, foe, self_cast, *target);
            let (gained, hp_after) = who.heal(*amount);
            sink.emit(CombatEvent::Healed {
                target: who.name.clone(),
                amount: gained,
                hp_after,
            });
        }

        Effect::Buff {
            stat,
            amount,
            duration,
            target,
        } => {
            let who = recipient(source, foe, self_cast, *target);
            who.stats.add(*stat, *amount);
            who.pools.sync_tied(&who.stats);
            if let Some(turns) = duration {
                who.push_modifier(ModifierKind::Stat(*stat), *amount, *turns);
            }
            sink.emit(CombatEvent::StatChanged {
                target: who.name.clone(),
                stat: *stat,
                amount: *amount,
                duration: *duration,
            });
        }

        Effect::Shield { amount, target } => {
            let who = recipient(source, foe, self_cast, *target);
            who.shield = who.shield.saturating_add(*amount);
            sink.emit(CombatEvent::ShieldGained {
                target: who.name.clone(),
                amount: *amount,
                total: who.shield,
            });
        }

        Effect::Evasion { percent, duration } => {
            // Dodge bonuses always favor the caster.
            source.evasion_bonus_percent += percent;
            if let Some(turns) = duration {
                source.push_modifier(ModifierKind::EvasionBonus, *percent, *turns);
            }
            sink.emit(CombatEvent::EvasionGained {
                target: source.name.clone(),
                percent: *percent,
            });
        }

        Effect::Vulnerability { amount, duration } => {
            foe.vulnerability += amount;
            if let Some(turns) = duration {
                foe.push_modifier(ModifierKind::Vulnerability, *amount, *turns);
            }
            sink.emit(CombatEvent::VulnerabilityApplied {
                target: foe.name.clone(),
                amount: *amount,
            });
        }

        Effect::Restore {
            resource,
            amount,
            target,
        } => {
            let who = recipient(source, foe, self_cast, *target);
            let gained = who.pools.restore(resource, *amount);
            sink.emit(CombatEvent::ResourceRestored {
                target: who.name.clone(),
                resource: resource.clone(),
                amount: gained,
            });
        }

        Effect::Root => sink.emit(CombatEvent::StatusNoted {
            target: foe.name.clone(),
            status: StatusTag::Rooted,
        }),

        Effect::Slow { amount } => {
            foe.stats.add(StatKind::Speed, -amount.abs());
            sink.emit(CombatEvent::Slowed {
                target: foe.name.clone(),
                amount: -amount.abs(),
            });
        }

        Effect::Taunt => sink.emit(CombatEvent::StatusNoted {
            target: foe.name.clone(),
            status: StatusTag::Taunted,
        }),

        Effect::Unknown => sink.emit(CombatEvent::UnknownEffect {
            actor: source.name.clone(),
        }),
    }
}

/// Resolve a strike against `foe` and apply the result: shields absorb
/// first, the remainder comes off HP.
fn strike(
    source: &Combatant,
    foe: &mut Combatant,
    spec: &StrikeSpec,
    power_bonus: i32,
    config: &CombatConfig,
    rolls: &mut RollSource<'_>,
    sink: &mut dyn EventSink,
) {
    let report = resolve_strike(source, foe, spec, power_bonus, config, rolls);
    if !report.hit {
        sink.emit(CombatEvent::Missed {
            attacker: source.name.clone(),
            defender: foe.name.clone(),
        });
        return;
    }
    let (absorbed, hp_after) = foe.take_damage(report.damage);
    sink.emit(CombatEvent::DamageDealt {
        attacker: source.name.clone(),
        target: foe.name.clone(),
        amount: report.damage,
        absorbed,
        crit: report.crit,
        hp_after,
    });
}

/// Resolve which combatant an effect lands on.
fn recipient<'c>(
    source: &'c mut Combatant,
    foe: &'c mut Combatant,
    self_cast: bool,
    target: EffectTarget,
) -> &'c mut Combatant {
    match (target, self_cast) {
        (EffectTarget::Source, _) => source,
        (EffectTarget::Target, true) => source,
        (EffectTarget::Target, false) => foe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::testkit::combatant;
    use crate::resource::Cost;
    use crate::rng::RngOracle;
    use crate::skill::SkillKind;

    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn skill_with(effects: Vec<Effect>) -> Skill {
        Skill {
            id: "test".into(),
            name: "Test".into(),
            kind: SkillKind::Physical,
            target: TargetSelector::Enemy,
            cost: Cost::free(),
            accuracy_bonus: 0,
            element: None,
            cooldown: 0,
            effects,
        }
    }

    #[test]
    fn effects_apply_in_declared_order() {
        let mut caster = combatant("Caster", &[("atk", 5)]);
        let mut target = combatant("Target", &[]);
        let skill = skill_with(vec![
            Effect::Vulnerability {
                amount: 3,
                duration: None,
            },
            Effect::Damage {
                power: 4,
                scaling: None,
                element: None,
                variance: None,
            },
        ]);
        let rng = FixedRng(50);
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let mut events: Vec<CombatEvent> = Vec::new();
        apply_effects(
            &mut caster,
            &mut target,
            &skill,
            &CombatConfig::new(),
            &mut rolls,
            &mut events,
        );
        assert!(matches!(events[0], CombatEvent::VulnerabilityApplied { .. }));
        assert!(matches!(events[1], CombatEvent::DamageDealt { .. }));
        // The vulnerability applied by the first effect already affects the
        // second one's mitigation (target has 0 defense, so no difference in
        // outcome here - the ordering itself is what we assert).
        assert_eq!(target.vulnerability, 3);
    }

    #[test]
    fn shield_absorbs_before_hp_loss() {
        let mut caster = combatant("Caster", &[("atk", 8)]);
        let mut target = combatant("Target", &[]);
        target.shield = 5;
        let skill = skill_with(vec![Effect::Damage {
            power: 0,
            scaling: None,
            element: None,
            variance: None,
        }]);
        let rng = FixedRng(50); // hit, no crit, 98% variance
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let mut events: Vec<CombatEvent> = Vec::new();
        apply_effects(
            &mut caster,
            &mut target,
            &skill,
            &CombatConfig::new(),
            &mut rolls,
            &mut events,
        );
        // raw 8, no defense, 98% variance → 7 damage; 5 absorbed, 2 to HP.
        match &events[0] {
            CombatEvent::DamageDealt {
                amount,
                absorbed,
                hp_after,
                ..
            } => {
                assert_eq!(*amount, 7);
                assert_eq!(*absorbed, 5);
                assert_eq!(*hp_after, 28);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(target.shield, 0);
    }

    #[test]
    fn self_cast_buff_lands_on_caster() {
        let mut caster = combatant("Caster", &[("def", 2)]);
        let mut target = combatant("Target", &[("def", 2)]);
        let mut skill = skill_with(vec![Effect::Buff {
            stat: StatKind::Defense,
            amount: 4,
            duration: Some(2),
            target: EffectTarget::Target,
        }]);
        skill.target = TargetSelector::SelfCast;
        let rng = FixedRng(50);
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let mut events: Vec<CombatEvent> = Vec::new();
        apply_effects(
            &mut caster,
            &mut target,
            &skill,
            &CombatConfig::new(),
            &mut rolls,
            &mut events,
        );
        assert_eq!(caster.stats.defense, 6);
        assert_eq!(target.stats.defense, 2);
        assert_eq!(caster.modifiers.len(), 1);
    }

    #[test]
    fn unknown_effect_skipped_without_aborting() {
        let mut caster = combatant("Caster", &[("atk", 5)]);
        let mut target = combatant("Target", &[]);
        let skill = skill_with(vec![
            Effect::Unknown,
            Effect::Heal {
                amount: 5,
                target: EffectTarget::Source,
            },
        ]);
        caster.take_damage(10);
        let rng = FixedRng(50);
        let mut rolls = RollSource::new(&rng, 0, 0, 0);
        let mut events: Vec<CombatEvent> = Vec::new();
        apply_effects(
            &mut caster,
            &mut target,
            &skill,
            &CombatConfig::new(),
            &mut rolls,
            &mut events,
        );
        assert!(matches!(events[0], CombatEvent::UnknownEffect { .. }));
        assert!(matches!(events[1], CombatEvent::Healed { amount: 5, .. }));
        assert_eq!(caster.hp(), 25);
    }

    #[test]
    fn damage_roll_stays_in_range() {
        let mut caster = combatant("Caster", &[]);
        let skill = skill_with(vec![Effect::DamageRoll {
            min: 3,
            max: 6,
            scaling: None,
        }]);
        let config = CombatConfig::new();
        // Sweep oracle values; rolled base must stay within [3, 6] and the
        // floor keeps every hit at >= 1 damage.
        for value in [0u32, 13, 50, 77] {
            let mut target = combatant("Target", &[]);
            let rng = FixedRng(value);
            let mut rolls = RollSource::new(&rng, 0, 0, 0);
            let mut events: Vec<CombatEvent> = Vec::new();
            apply_effects(
                &mut caster,
                &mut target,
                &skill,
                &config,
                &mut rolls,
                &mut events,
            );
            if let Some(CombatEvent::DamageDealt { amount, .. }) = events.first() {
                assert!(*amount >= 1);
                // max possible: 6 base × 110% × 150% crit = 9
                assert!(*amount <= 9);
            }
        }
    }
}
