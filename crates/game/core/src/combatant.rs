//! Combatant state.
//!
//! A [`Combatant`] is the single source of truth for one side of an
//! encounter: identity, base stats, resource pools, and the typed transient
//! combat modifiers that effects touch (shield, vulnerability, evasion
//! bonus, timed stat modifiers, cooldowns). It is built from catalog data at
//! encounter start and discarded when the encounter ends.

use arrayvec::ArrayVec;
use std::collections::BTreeMap;

use crate::ai::AiProfile;
use crate::config::CombatConfig;
use crate::resource::{PoolSet, PoolSpec, ResourcePool};
use crate::skill::{Element, Skill};
use crate::stats::{BaseStats, StatKind};

// ============================================================================
// Timed Modifiers
// ============================================================================

/// What a timed modifier changes, so expiry knows what to revert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    Stat(StatKind),
    EvasionBonus,
    Vulnerability,
}

/// A duration-carrying buff/debuff, ticked down once per completed round and
/// reverted when it reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveModifier {
    pub kind: ModifierKind,
    pub amount: i32,
    pub turns_remaining: u32,
}

// ============================================================================
// Combatant
// ============================================================================

/// Complete state for one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    /// Class or archetype id from the catalog; informational only.
    pub archetype: String,
    pub level: u32,

    pub stats: BaseStats,
    pub pools: PoolSet,

    // === Transient combat modifiers ===
    /// Absorption consumed before HP on incoming damage.
    pub shield: u32,
    /// Reduces effective defense in mitigation.
    pub vulnerability: i32,
    /// Percent subtracted from incoming hit chances.
    pub evasion_bonus_percent: i32,

    /// Percent resistance per element.
    pub resistances: Vec<(Element, i32)>,

    pub skills: Vec<Skill>,
    /// Skill id → turns until usable again.
    pub cooldowns: BTreeMap<String, u32>,
    /// Timed modifiers awaiting expiry. When full, further durations are
    /// treated as permanent-for-encounter rather than dropped.
    pub modifiers: ArrayVec<ActiveModifier, { CombatConfig::MAX_ACTIVE_MODIFIERS }>,

    /// Decision profile; enemies only.
    pub ai: Option<AiProfile>,
}

impl Combatant {
    /// Build a combatant, guaranteeing an HP pool exists even when the
    /// specs omit one (a catalog hole must not crash combat).
    pub fn new(
        name: impl Into<String>,
        archetype: impl Into<String>,
        level: u32,
        stats: BaseStats,
        pool_specs: Vec<PoolSpec>,
    ) -> Self {
        let mut specs = pool_specs;
        if !specs.iter().any(|spec| spec.key == "hp") {
            specs.insert(0, PoolSpec::bare("hp"));
        }
        let pools = PoolSet::initialize(specs, &stats);
        Self {
            name: name.into(),
            archetype: archetype.into(),
            level,
            stats,
            pools,
            shield: 0,
            vulnerability: 0,
            evasion_bonus_percent: 0,
            resistances: Vec::new(),
            skills: Vec::new(),
            cooldowns: BTreeMap::new(),
            modifiers: ArrayVec::new(),
            ai: None,
        }
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_ai(mut self, ai: AiProfile) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_resistances(mut self, resistances: Vec<(Element, i32)>) -> Self {
        self.resistances = resistances;
        self
    }

    // ========================================================================
    // HP helpers
    // ========================================================================

    pub fn hp(&self) -> u32 {
        self.pools.get("hp").map_or(0, |pool| pool.current)
    }

    pub fn hp_max(&self) -> u32 {
        self.pools.get("hp").map_or(0, |pool| pool.max)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Apply incoming damage: shield absorbs first, the remainder comes off
    /// HP with a floor of 0. Returns `(absorbed, hp_after)`.
    pub fn take_damage(&mut self, amount: u32) -> (u32, u32) {
        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        let remainder = amount - absorbed;
        if remainder > 0
            && let Some(pool) = self.pools.get_mut("hp")
        {
            pool.current = pool.current.saturating_sub(remainder);
        }
        (absorbed, self.hp())
    }

    /// Heal HP, clamped to max. Returns `(gained, hp_after)`.
    pub fn heal(&mut self, amount: u32) -> (u32, u32) {
        let gained = self.pools.restore("hp", amount);
        (gained, self.hp())
    }

    // ========================================================================
    // Skills and cooldowns
    // ========================================================================

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn cooldown_remaining(&self, skill_id: &str) -> u32 {
        self.cooldowns.get(skill_id).copied().unwrap_or(0)
    }

    pub fn set_cooldown(&mut self, skill_id: &str, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(skill_id.to_string(), turns);
        }
    }

    /// Decrement every cooldown counter by 1, floored at 0. Called at the
    /// start of each of this combatant's turns.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    pub fn resistance(&self, element: Element) -> i32 {
        self.resistances
            .iter()
            .find(|(el, _)| *el == element)
            .map_or(0, |(_, percent)| *percent)
    }

    // ========================================================================
    // Timed modifiers
    // ========================================================================

    /// Record a timed modifier for later expiry. The caller has already
    /// applied the change itself; a full list means the change simply lasts
    /// the encounter.
    pub fn push_modifier(&mut self, kind: ModifierKind, amount: i32, turns: u32) {
        if turns == 0 {
            return;
        }
        let _ = self.modifiers.try_push(ActiveModifier {
            kind,
            amount,
            turns_remaining: turns,
        });
    }

    /// End-of-round tick: decrement durations, revert and drop expired
    /// modifiers, and re-sync tied pools if a stat changed. Returns the
    /// expired entries for the caller's log.
    pub fn tick_modifiers(&mut self) -> Vec<ActiveModifier> {
        let mut expired = Vec::new();
        let mut keep: ArrayVec<ActiveModifier, { CombatConfig::MAX_ACTIVE_MODIFIERS }> =
            ArrayVec::new();
        let mut stats_changed = false;

        for mut modifier in self.modifiers.take() {
            modifier.turns_remaining = modifier.turns_remaining.saturating_sub(1);
            if modifier.turns_remaining > 0 {
                let _ = keep.try_push(modifier);
                continue;
            }
            match modifier.kind {
                ModifierKind::Stat(stat) => {
                    self.stats.add(stat, -modifier.amount);
                    stats_changed = true;
                }
                ModifierKind::EvasionBonus => {
                    self.evasion_bonus_percent -= modifier.amount;
                }
                ModifierKind::Vulnerability => {
                    self.vulnerability -= modifier.amount;
                }
            }
            expired.push(modifier);
        }

        self.modifiers = keep;
        if stats_changed {
            self.pools.sync_tied(&self.stats);
        }
        expired
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Read-only view for the presentation layer. Rebuilt on demand; never
    /// cached.
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            name: self.name.clone(),
            archetype: self.archetype.clone(),
            level: self.level,
            hp: self.hp(),
            hp_max: self.hp_max(),
            shield: self.shield,
            pools: self.pools.iter().map(PoolSnapshot::from).collect(),
            attack: self.stats.attack,
            magic: self.stats.magic,
            defense: self.stats.defense,
            speed: self.stats.speed,
        }
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// One resource bar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolSnapshot {
    pub key: String,
    pub label: String,
    pub current: u32,
    pub max: u32,
}

impl From<&ResourcePool> for PoolSnapshot {
    fn from(pool: &ResourcePool) -> Self {
        Self {
            key: pool.key.clone(),
            label: pool.label.clone(),
            current: pool.current,
            max: pool.max,
        }
    }
}

/// Read-only view of one combatant for HUD rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub name: String,
    pub archetype: String,
    pub level: u32,
    pub hp: u32,
    pub hp_max: u32,
    pub shield: u32,
    pub pools: Vec<PoolSnapshot>,
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub speed: i32,
}

/// Read-only view of the whole encounter, published after every mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSnapshot {
    pub round: u32,
    pub phase: crate::engine::Phase,
    pub player: CombatantSnapshot,
    pub enemy: CombatantSnapshot,
}

// ============================================================================
// Test helpers
// ============================================================================

#[cfg(test)]
pub(crate) mod testkit {
    use super::*;
    use crate::resource::StartSpec;

    /// Combatant with the given stats and a 30/30 HP pool.
    pub fn combatant(name: &str, stats: &[(&str, i32)]) -> Combatant {
        let stats = BaseStats::from_catalog(stats.iter().copied());
        Combatant::new(
            name,
            "test",
            1,
            stats,
            vec![PoolSpec {
                explicit_max: Some(30),
                start: StartSpec::Full,
                ..PoolSpec::bare("hp")
            }],
        )
    }
}
