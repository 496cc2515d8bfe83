//! Enemy decision policy.
//!
//! Selection is a pure priority cascade - openers on the first turn, then
//! the priority list, then any ready attack, then a synthesized fallback
//! strike. No randomness: given the same cooldown and resource state the
//! same skill is always picked. Randomness enters combat only through the
//! damage pipeline.

use crate::combatant::Combatant;

/// Decision hints from the enemy catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiProfile {
    /// Skills reserved for the first turn, in preference order.
    pub openers: Vec<String>,
    /// Preferred rotation, in preference order.
    pub priority: Vec<String>,
}

/// What the policy decided.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillChoice {
    /// Use this declared skill.
    Listed(String),
    /// Nothing declared is usable: synthesize the generic fallback attack.
    Fallback,
}

/// Pick the enemy's action for this turn.
///
/// Cascade:
/// 1. First turn with openers declared: first opener that is ready.
/// 2. First ready entry of the priority list.
/// 3. Any declared attack-type skill that is ready, in declaration order.
/// 4. Fallback.
///
/// "Ready" means off cooldown AND affordable - a skill the enemy cannot pay
/// for falls through the cascade like one on cooldown.
pub fn select_action(enemy: &Combatant, first_turn: bool) -> SkillChoice {
    let profile = enemy.ai.clone().unwrap_or_default();

    let ready = |id: &str| -> bool {
        enemy.skill(id).is_some_and(|skill| {
            enemy.cooldown_remaining(id) == 0 && enemy.pools.can_afford(&skill.cost)
        })
    };

    if first_turn
        && let Some(id) = profile.openers.iter().find(|id| ready(id))
    {
        return SkillChoice::Listed(id.clone());
    }

    if let Some(id) = profile.priority.iter().find(|id| ready(id)) {
        return SkillChoice::Listed(id.clone());
    }

    if let Some(skill) = enemy
        .skills
        .iter()
        .find(|skill| skill.is_attack() && ready(&skill.id))
    {
        return SkillChoice::Listed(skill.id.clone());
    }

    SkillChoice::Fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::testkit::combatant;
    use crate::effect::Effect;
    use crate::resource::Cost;
    use crate::skill::{Skill, SkillKind, TargetSelector};

    fn attack(id: &str, cooldown: u32) -> Skill {
        Skill {
            id: id.into(),
            name: id.into(),
            kind: SkillKind::Physical,
            target: TargetSelector::Enemy,
            cost: Cost::free(),
            accuracy_bonus: 0,
            element: None,
            cooldown,
            effects: vec![Effect::Damage {
                power: 3,
                scaling: None,
                element: None,
                variance: None,
            }],
        }
    }

    fn enemy_with(skills: Vec<Skill>, ai: AiProfile) -> Combatant {
        combatant("Goblin", &[("atk", 4)])
            .with_skills(skills)
            .with_ai(ai)
    }

    #[test]
    fn opener_wins_on_first_turn_over_priority() {
        let enemy = enemy_with(
            vec![attack("fireball", 2), attack("bite", 0)],
            AiProfile {
                openers: vec!["fireball".into()],
                priority: vec!["bite".into()],
            },
        );
        assert_eq!(
            select_action(&enemy, true),
            SkillChoice::Listed("fireball".into())
        );
        // Second turn: openers no longer considered.
        assert_eq!(
            select_action(&enemy, false),
            SkillChoice::Listed("bite".into())
        );
    }

    #[test]
    fn cooldown_pushes_through_cascade() {
        let mut enemy = enemy_with(
            vec![attack("smash", 2), attack("claw", 0)],
            AiProfile {
                openers: vec![],
                priority: vec!["smash".into()],
            },
        );
        enemy.set_cooldown("smash", 2);
        // Priority skill on cooldown: fall through to any ready attack.
        assert_eq!(
            select_action(&enemy, false),
            SkillChoice::Listed("claw".into())
        );
    }

    #[test]
    fn nothing_ready_means_fallback() {
        let mut enemy = enemy_with(vec![attack("smash", 2)], AiProfile::default());
        enemy.set_cooldown("smash", 1);
        assert_eq!(select_action(&enemy, false), SkillChoice::Fallback);
    }

    #[test]
    fn unaffordable_skill_is_skipped() {
        let mut costly = attack("drain", 0);
        costly.cost = Cost::single("mana", 5);
        let enemy = enemy_with(
            vec![costly, attack("claw", 0)],
            AiProfile {
                openers: vec![],
                priority: vec!["drain".into()],
            },
        );
        // No mana pool at all: "drain" is unaffordable, not an error.
        assert_eq!(
            select_action(&enemy, false),
            SkillChoice::Listed("claw".into())
        );
    }

    #[test]
    fn support_skills_not_picked_as_generic_attack() {
        let mut guard = attack("guard", 0);
        guard.kind = SkillKind::Support;
        let enemy = enemy_with(vec![guard], AiProfile::default());
        assert_eq!(select_action(&enemy, false), SkillChoice::Fallback);
    }

    #[test]
    fn declaration_order_breaks_ties() {
        let enemy = enemy_with(
            vec![attack("first", 0), attack("second", 0)],
            AiProfile::default(),
        );
        assert_eq!(
            select_action(&enemy, false),
            SkillChoice::Listed("first".into())
        );
    }
}
