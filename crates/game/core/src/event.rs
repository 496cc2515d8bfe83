//! Combat events.
//!
//! Every observable state change produces one [`CombatEvent`]. The
//! presentation layer consumes the stream to update bars and append the
//! scrolling combat log; `Display` renders the human-readable line for each
//! event, so failure modes reach the player as text, never as exceptions.

use std::fmt;

use crate::stats::StatKind;

/// Narrative status tags with no mechanical weight yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusTag {
    Rooted,
    Taunted,
}

/// One observable occurrence during an encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    EncounterStarted {
        player: String,
        enemy: String,
    },

    SkillUsed {
        actor: String,
        skill: String,
    },

    /// The affordability gate fired: nothing was mutated.
    ActionRejected {
        actor: String,
        skill: String,
        resource: String,
        needed: u32,
        available: u32,
    },

    Missed {
        attacker: String,
        defender: String,
    },

    DamageDealt {
        attacker: String,
        target: String,
        amount: u32,
        /// Portion eaten by the target's shield before HP.
        absorbed: u32,
        crit: bool,
        hp_after: u32,
    },

    Healed {
        target: String,
        amount: u32,
        hp_after: u32,
    },

    StatChanged {
        target: String,
        stat: StatKind,
        amount: i32,
        duration: Option<u32>,
    },

    ShieldGained {
        target: String,
        amount: u32,
        total: u32,
    },

    EvasionGained {
        target: String,
        percent: i32,
    },

    VulnerabilityApplied {
        target: String,
        amount: i32,
    },

    ResourceRestored {
        target: String,
        resource: String,
        amount: u32,
    },

    StatusNoted {
        target: String,
        status: StatusTag,
    },

    Slowed {
        target: String,
        amount: i32,
    },

    /// A catalog effect kind this engine does not implement; skipped.
    UnknownEffect {
        actor: String,
    },

    ModifierExpired {
        target: String,
        description: String,
    },

    Regenerated {
        target: String,
        resource: String,
        amount: u32,
    },

    Defeated {
        name: String,
    },

    RoundEnded {
        round: u32,
    },

    EncounterEnded {
        victor: String,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncounterStarted { player, enemy } => {
                write!(f, "{player} faces {enemy}!")
            }
            Self::SkillUsed { actor, skill } => write!(f, "{actor} uses {skill}!"),
            Self::ActionRejected {
                actor,
                skill,
                resource,
                needed,
                available,
            } => write!(
                f,
                "{actor} cannot use {skill}: needs {needed} {resource}, has {available}."
            ),
            Self::Missed { attacker, defender } => {
                write!(f, "{attacker}'s attack misses {defender}.")
            }
            Self::DamageDealt {
                target,
                amount,
                absorbed,
                crit,
                ..
            } => {
                if *crit {
                    write!(f, "Critical hit! {target} takes {amount} damage")?;
                } else {
                    write!(f, "{target} takes {amount} damage")?;
                }
                if *absorbed > 0 {
                    write!(f, " ({absorbed} absorbed by shield)")?;
                }
                write!(f, ".")
            }
            Self::Healed { target, amount, .. } => {
                write!(f, "{target} recovers {amount} HP.")
            }
            Self::StatChanged {
                target,
                stat,
                amount,
                duration,
            } => {
                let verb = if *amount >= 0 { "rises" } else { "falls" };
                write!(f, "{target}'s {stat} {verb} by {}", amount.abs())?;
                match duration {
                    Some(turns) => write!(f, " for {turns} turns."),
                    None => write!(f, "."),
                }
            }
            Self::ShieldGained { target, amount, .. } => {
                write!(f, "{target} gains a {amount}-point shield.")
            }
            Self::EvasionGained { target, percent } => {
                write!(f, "{target} becomes harder to hit (+{percent}% evasion).")
            }
            Self::VulnerabilityApplied { target, amount } => {
                write!(f, "{target}'s defenses are torn open ({amount} vulnerability).")
            }
            Self::ResourceRestored {
                target,
                resource,
                amount,
            } => write!(f, "{target} recovers {amount} {resource}."),
            Self::StatusNoted { target, status } => match status {
                StatusTag::Rooted => write!(f, "{target} is rooted in place!"),
                StatusTag::Taunted => write!(f, "{target} is taunted!"),
            },
            Self::Slowed { target, amount } => {
                write!(f, "{target} is slowed ({amount} speed).")
            }
            Self::UnknownEffect { actor } => {
                write!(f, "{actor} tries something inscrutable... nothing happens.")
            }
            Self::ModifierExpired { target, description } => {
                write!(f, "{target}'s {description} wears off.")
            }
            Self::Regenerated {
                target,
                resource,
                amount,
            } => write!(f, "{target} regenerates {amount} {resource}."),
            Self::Defeated { name } => write!(f, "{name} is defeated!"),
            Self::RoundEnded { round } => write!(f, "--- Round {round} ends ---"),
            Self::EncounterEnded { victor } => write!(f, "{victor} is victorious!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lines_read_naturally() {
        let event = CombatEvent::DamageDealt {
            attacker: "Goblin".into(),
            target: "Aria".into(),
            amount: 8,
            absorbed: 5,
            crit: false,
            hp_after: 22,
        };
        assert_eq!(event.to_string(), "Aria takes 8 damage (5 absorbed by shield).");

        let crit = CombatEvent::DamageDealt {
            attacker: "Aria".into(),
            target: "Goblin".into(),
            amount: 12,
            absorbed: 0,
            crit: true,
            hp_after: 0,
        };
        assert_eq!(crit.to_string(), "Critical hit! Goblin takes 12 damage.");

        let rejected = CombatEvent::ActionRejected {
            actor: "Aria".into(),
            skill: "Fireball".into(),
            resource: "mana".into(),
            needed: 5,
            available: 0,
        };
        assert_eq!(
            rejected.to_string(),
            "Aria cannot use Fireball: needs 5 mana, has 0."
        );
    }
}
