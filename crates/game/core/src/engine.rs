//! Turn sequencing.
//!
//! [`CombatEngine`] is the authoritative reducer for an encounter: it owns
//! both combatants, the phase state machine, and the round counter, and it
//! is the only place costs are deducted and upkeep runs. One call to
//! [`CombatEngine::submit_player_action`] resolves a full round: player
//! action, enemy reply, end-of-round upkeep.
//!
//! The phase doubles as the turn lock: submissions outside `Idle` fail with
//! [`TurnError::Locked`] and callers are expected to drop them silently.

use crate::ai::{SkillChoice, select_action};
use crate::combatant::{Combatant, EncounterSnapshot};
use crate::config::CombatConfig;
use crate::effect::{EventSink, apply_effects};
use crate::event::CombatEvent;
use crate::rng::{PcgRng, RngOracle, RollSource};
use crate::skill::Skill;

/// Per-action RNG stream tags.
const ACTOR_PLAYER: u32 = 0;
const ACTOR_ENEMY: u32 = 1;

/// Encounter phase. `Idle` is the only state accepting input; `Won`/`Lost`
/// are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Phase {
    Idle,
    PlayerActing,
    EnemyActing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What the player asked to do this round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    /// Use a class skill by id.
    Skill(String),
    /// Skip acting; the enemy still replies.
    EndTurn,
}

/// Submission failures. Expected combat outcomes (insufficient resource,
/// miss) are events, not errors; these are the caller-protocol failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("an action is already resolving")]
    Locked,
    #[error("the encounter is over")]
    EncounterOver,
    #[error("unknown skill `{0}`")]
    UnknownSkill(String),
}

/// Summary of one submitted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    /// Round counter after this submission.
    pub round: u32,
    /// Phase after this submission (`Idle` unless the encounter ended).
    pub phase: Phase,
    /// True when the affordability gate rejected the action; nothing was
    /// mutated and no enemy turn ran.
    pub rejected: bool,
}

/// The turn sequencer.
pub struct CombatEngine {
    player: Combatant,
    enemy: Combatant,
    config: CombatConfig,
    oracle: Box<dyn RngOracle>,
    session_seed: u64,
    phase: Phase,
    round: u32,
    /// Action sequence number; seeds each action's RNG stream.
    nonce: u64,
    enemy_turns_taken: u32,
}

impl CombatEngine {
    pub fn new(player: Combatant, enemy: Combatant, config: CombatConfig, seed: u64) -> Self {
        Self {
            player,
            enemy,
            config,
            oracle: Box::new(PcgRng),
            session_seed: seed,
            phase: Phase::Idle,
            round: 1,
            nonce: 0,
            enemy_turns_taken: 0,
        }
    }

    /// Substitute the RNG oracle (tests force outcomes this way).
    pub fn with_oracle(mut self, oracle: Box<dyn RngOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            round: self.round,
            phase: self.phase,
            player: self.player.snapshot(),
            enemy: self.enemy.snapshot(),
        }
    }

    /// Announce the encounter. Call once before the first action so the log
    /// opens with the matchup.
    pub fn announce(&self, sink: &mut dyn EventSink) {
        sink.emit(CombatEvent::EncounterStarted {
            player: self.player.name.clone(),
            enemy: self.enemy.name.clone(),
        });
    }

    /// Resolve one full round from a player action.
    ///
    /// Sequence: affordability gate → deduct → player effects → enemy-defeat
    /// check → enemy cooldown tick + selection + effects → player-defeat
    /// check → end-of-round upkeep → unlock.
    pub fn submit_player_action(
        &mut self,
        action: &PlayerAction,
        sink: &mut dyn EventSink,
    ) -> Result<TurnReport, TurnError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Won | Phase::Lost => return Err(TurnError::EncounterOver),
            Phase::PlayerActing | Phase::EnemyActing => return Err(TurnError::Locked),
        }

        self.phase = Phase::PlayerActing;

        if let PlayerAction::Skill(id) = action {
            let Some(skill) = self.player.skill(id).cloned() else {
                self.phase = Phase::Idle;
                return Err(TurnError::UnknownSkill(id.clone()));
            };

            if !self.player.pools.can_afford(&skill.cost) {
                let (resource, needed, available) = self.first_shortfall(&skill);
                sink.emit(CombatEvent::ActionRejected {
                    actor: self.player.name.clone(),
                    skill: skill.name.clone(),
                    resource,
                    needed,
                    available,
                });
                // Rejection releases the lock immediately; no enemy turn.
                self.phase = Phase::Idle;
                return Ok(self.report(true));
            }

            self.player.pools.deduct(&skill.cost);
            sink.emit(CombatEvent::SkillUsed {
                actor: self.player.name.clone(),
                skill: skill.name.clone(),
            });

            self.nonce += 1;
            let mut rolls = RollSource::new(
                self.oracle.as_ref(),
                self.session_seed,
                self.nonce,
                ACTOR_PLAYER,
            );
            apply_effects(
                &mut self.player,
                &mut self.enemy,
                &skill,
                &self.config,
                &mut rolls,
                sink,
            );
        }

        if !self.enemy.is_alive() {
            sink.emit(CombatEvent::Defeated {
                name: self.enemy.name.clone(),
            });
            sink.emit(CombatEvent::EncounterEnded {
                victor: self.player.name.clone(),
            });
            self.phase = Phase::Won;
            return Ok(self.report(false));
        }

        self.phase = Phase::EnemyActing;
        self.enemy_turn(sink);

        if !self.player.is_alive() {
            sink.emit(CombatEvent::Defeated {
                name: self.player.name.clone(),
            });
            sink.emit(CombatEvent::EncounterEnded {
                victor: self.enemy.name.clone(),
            });
            self.phase = Phase::Lost;
            return Ok(self.report(false));
        }

        self.end_of_round(sink);
        self.phase = Phase::Idle;
        Ok(self.report(false))
    }

    /// One enemy turn: tick cooldowns, pick, resolve, write back cooldown.
    fn enemy_turn(&mut self, sink: &mut dyn EventSink) {
        self.enemy.tick_cooldowns();

        let first_turn = self.enemy_turns_taken == 0;
        let skill = match select_action(&self.enemy, first_turn) {
            SkillChoice::Listed(id) => self
                .enemy
                .skill(&id)
                .cloned()
                .unwrap_or_else(|| Skill::fallback(self.config.fallback_attack_power)),
            SkillChoice::Fallback => Skill::fallback(self.config.fallback_attack_power),
        };

        // The policy only picks affordable skills; deduct is a formality.
        self.enemy.pools.deduct(&skill.cost);
        sink.emit(CombatEvent::SkillUsed {
            actor: self.enemy.name.clone(),
            skill: skill.name.clone(),
        });

        self.nonce += 1;
        let mut rolls = RollSource::new(
            self.oracle.as_ref(),
            self.session_seed,
            self.nonce,
            ACTOR_ENEMY,
        );
        apply_effects(
            &mut self.enemy,
            &mut self.player,
            &skill,
            &self.config,
            &mut rolls,
            sink,
        );

        if skill.cooldown > 0 {
            self.enemy.set_cooldown(&skill.id, skill.cooldown);
        }
        self.enemy_turns_taken += 1;
    }

    /// End-of-round upkeep: each side regenerates its own pools once per
    /// completed round, timed modifiers tick down and revert at zero, and
    /// the round counter advances.
    fn end_of_round(&mut self, sink: &mut dyn EventSink) {
        for side in [&mut self.player, &mut self.enemy] {
            let name = side.name.clone();
            for (resource, amount) in side.pools.tick_regen() {
                sink.emit(CombatEvent::Regenerated {
                    target: name.clone(),
                    resource,
                    amount,
                });
            }
            for expired in side.tick_modifiers() {
                sink.emit(CombatEvent::ModifierExpired {
                    target: name.clone(),
                    description: describe_modifier(&expired),
                });
            }
        }

        sink.emit(CombatEvent::RoundEnded { round: self.round });
        self.round += 1;
    }

    fn first_shortfall(&self, skill: &Skill) -> (String, u32, u32) {
        for (resource, needed) in skill.cost.entries() {
            if !self.player.pools.can_afford_amount(resource, needed) {
                let available = self
                    .player
                    .pools
                    .get(resource)
                    .map_or(0, |pool| pool.current);
                return (resource.to_string(), needed, available);
            }
        }
        (String::new(), 0, 0)
    }

    fn report(&self, rejected: bool) -> TurnReport {
        TurnReport {
            round: self.round,
            phase: self.phase,
            rejected,
        }
    }
}

fn describe_modifier(modifier: &crate::combatant::ActiveModifier) -> String {
    use crate::combatant::ModifierKind;
    match modifier.kind {
        ModifierKind::Stat(stat) => format!("{stat} change"),
        ModifierKind::EvasionBonus => "evasion bonus".to_string(),
        ModifierKind::Vulnerability => "vulnerability".to_string(),
    }
}
