//! Deterministic turn-based combat rules shared across clients.
//!
//! `skirmish-core` defines the canonical combat model (combatants, resource
//! pools, skills, effects) and exposes pure APIs for resolving attacks,
//! interpreting effect lists, and sequencing rounds. All state mutation flows
//! through [`engine::CombatEngine`]; presentation layers consume the
//! [`event::CombatEvent`] stream and read-only snapshots and never compute
//! combat outcomes themselves.
pub mod ai;
pub mod catalog;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod effect;
pub mod engine;
pub mod event;
pub mod resource;
pub mod rng;
pub mod skill;
pub mod stats;

pub use ai::{AiProfile, SkillChoice, select_action};
pub use catalog::{
    AiHints, ClassDefinition, ClassDocument, CostDef, EnemyDefinition, ResourceDef, SkillDef,
    SkillTable, StartValue, StarterItem, StarterKit, titleize,
};
pub use combat::{AttackReport, AttackResolution, DamageBreakdown, resolve_attack, resolve_strike};
pub use combatant::{
    ActiveModifier, Combatant, CombatantSnapshot, EncounterSnapshot, ModifierKind, PoolSnapshot,
};
pub use config::CombatConfig;
pub use effect::{Effect, EffectTarget, EventSink, ScalingFormula, apply_effects};
pub use engine::{CombatEngine, Phase, PlayerAction, TurnError, TurnReport};
pub use event::{CombatEvent, StatusTag};
pub use resource::{Cost, PoolSet, PoolSpec, ResourceKind, ResourcePool, StartSpec};
pub use rng::{PcgRng, RngOracle, RollSource, compute_seed};
pub use skill::{Element, Skill, SkillKind, StrikeSpec, TargetSelector};
pub use stats::{BaseStats, StatKind};
