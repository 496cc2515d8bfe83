//! Resource pools and the pool manager.
//!
//! Every gauge a combatant owns (HP, mana, stamina, ...) is a [`ResourcePool`]
//! inside a [`PoolSet`]. Pools are created once at encounter start from
//! catalog-derived [`PoolSpec`]s and mutated only through the manager, which
//! clamps after every change.
//!
//! Invariant: `0 <= current <= max` for every pool at all times.
//!
//! Missing pools are never an error: costs against an absent pool are simply
//! unaffordable and restores are no-ops, so a hole in catalog data degrades a
//! skill instead of crashing combat.

use crate::config::CombatConfig;
use crate::stats::{BaseStats, StatKind};

// ============================================================================
// Resource Kind
// ============================================================================

/// Coarse classification of a pool key, used only to pick domain defaults.
///
/// Keys are free-form catalog strings; classification is by convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Health,
    Mana,
    Stamina,
    Other,
}

impl ResourceKind {
    pub fn classify(key: &str) -> Self {
        match key {
            "hp" | "health" => Self::Health,
            "mp" | "mana" => Self::Mana,
            "stamina" | "sp" => Self::Stamina,
            _ => Self::Other,
        }
    }
}

// ============================================================================
// Pool
// ============================================================================

/// A named gauge with current/max, per-round regen, and an optional tie to a
/// stat that defines its ceiling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub key: String,
    pub label: String,
    pub current: u32,
    pub max: u32,
    pub regen_per_turn: u32,
    /// When set, `max` tracks this stat: [`PoolSet::sync_tied`] recomputes
    /// the ceiling after any stat-changing effect.
    pub tied_stat: Option<StatKind>,
}

impl ResourcePool {
    fn clamp(&mut self) {
        if self.current > self.max {
            self.current = self.max;
        }
    }
}

// ============================================================================
// Cost
// ============================================================================

/// Normalized resource cost: zero or more `(pool key, amount)` entries.
///
/// Single-resource and multi-resource catalog cost forms both normalize to
/// this; affordability requires every entry satisfied and deduction is
/// all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost(Vec<(String, u32)>);

impl Cost {
    /// A free action.
    pub fn free() -> Self {
        Self(Vec::new())
    }

    pub fn single(key: impl Into<String>, amount: u32) -> Self {
        if amount == 0 {
            return Self::free();
        }
        Self(vec![(key.into(), amount)])
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, u32)>) -> Self {
        Self(entries.into_iter().filter(|(_, amount)| *amount > 0).collect())
    }

    pub fn is_free(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(key, amount)| (key.as_str(), *amount))
    }
}

// ============================================================================
// Pool Initialization
// ============================================================================

/// How a pool's starting value is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartSpec {
    /// Explicit literal from the catalog.
    Literal(u32),
    /// Catalog said `"full"`: start at max.
    Full,
    /// Mirror a legacy flat gauge stat (e.g. a bare `mp` field).
    LegacyMirror(u32),
    /// Nothing declared: start at max.
    Unset,
}

/// One pool to create at encounter start, already merged from the class's
/// resource definitions, its skills' cost/restore references, and legacy
/// flat gauges. Catalog normalization produces these; see
/// [`crate::catalog::ClassDefinition::pool_specs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSpec {
    pub key: String,
    pub label: Option<String>,
    pub explicit_max: Option<u32>,
    pub tied_stat: Option<StatKind>,
    pub start: StartSpec,
    pub regen_per_turn: u32,
}

impl PoolSpec {
    /// A spec with nothing declared: the pool falls back to its kind's
    /// domain default.
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            explicit_max: None,
            tied_stat: None,
            start: StartSpec::Unset,
            regen_per_turn: 0,
        }
    }
}

// ============================================================================
// Pool Set (the manager)
// ============================================================================

/// Ordered collection of a combatant's pools.
///
/// Order is creation order, which the presentation layer relies on for
/// stable bar layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolSet {
    pools: Vec<ResourcePool>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create pools from specs.
    ///
    /// Max resolution order: explicit declared max, then the value of the
    /// named tied stat, then the domain default for the key's kind, then 0.
    /// Start resolution order: explicit literal, then "full", then the
    /// legacy flat gauge, then max. Everything clamps into `[0, max]`.
    pub fn initialize(specs: impl IntoIterator<Item = PoolSpec>, stats: &BaseStats) -> Self {
        let mut set = Self::new();
        for spec in specs {
            if set.get(&spec.key).is_some() {
                continue;
            }
            let kind = ResourceKind::classify(&spec.key);
            let max = spec
                .explicit_max
                .or_else(|| spec.tied_stat.map(|stat| stats.get(stat).max(0) as u32))
                .unwrap_or_else(|| CombatConfig::default_pool_max(kind));
            let current = match spec.start {
                StartSpec::Literal(value) => value,
                StartSpec::Full => max,
                StartSpec::LegacyMirror(value) => value,
                StartSpec::Unset => max,
            };
            let label = spec
                .label
                .unwrap_or_else(|| spec.key.to_uppercase());
            let mut pool = ResourcePool {
                key: spec.key,
                label,
                current,
                max,
                regen_per_turn: spec.regen_per_turn,
                tied_stat: spec.tied_stat,
            };
            pool.clamp();
            set.pools.push(pool);
        }
        set
    }

    pub fn get(&self, key: &str) -> Option<&ResourcePool> {
        self.pools.iter().find(|pool| pool.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ResourcePool> {
        self.pools.iter_mut().find(|pool| pool.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.iter()
    }

    /// True iff a pool exists for the key and holds at least `amount`.
    pub fn can_afford_amount(&self, key: &str, amount: u32) -> bool {
        self.get(key).is_some_and(|pool| pool.current >= amount)
    }

    /// True iff every entry of the cost is simultaneously affordable.
    pub fn can_afford(&self, cost: &Cost) -> bool {
        cost.entries()
            .all(|(key, amount)| self.can_afford_amount(key, amount))
    }

    /// Deduct a full cost, all-or-nothing: if any entry is unaffordable
    /// nothing is touched and `false` is returned.
    pub fn deduct(&mut self, cost: &Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for (key, amount) in cost.entries() {
            if let Some(pool) = self.get_mut(key) {
                pool.current -= amount;
            }
        }
        true
    }

    /// Add to a pool, clamped to max. Returns the amount actually gained.
    /// Restoring an absent pool is a no-op.
    pub fn restore(&mut self, key: &str, amount: u32) -> u32 {
        let Some(pool) = self.get_mut(key) else {
            return 0;
        };
        let before = pool.current;
        pool.current = pool.current.saturating_add(amount);
        pool.clamp();
        pool.current - before
    }

    /// Recompute the max of every tied pool from the current stat value and
    /// re-clamp. Call after any stat-changing effect.
    pub fn sync_tied(&mut self, stats: &BaseStats) {
        for pool in &mut self.pools {
            if let Some(stat) = pool.tied_stat {
                pool.max = stats.get(stat).max(0) as u32;
                pool.clamp();
            }
        }
    }

    /// Apply one round of regeneration to every pool with nonzero regen.
    ///
    /// Returns `(key, gained)` for each pool that actually changed, for the
    /// caller's log.
    pub fn tick_regen(&mut self) -> Vec<(String, u32)> {
        let mut gains = Vec::new();
        for pool in &mut self.pools {
            if pool.regen_per_turn == 0 {
                continue;
            }
            let before = pool.current;
            pool.current = pool.current.saturating_add(pool.regen_per_turn);
            pool.clamp();
            if pool.current > before {
                gains.push((pool.key.clone(), pool.current - before));
            }
        }
        gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> BaseStats {
        BaseStats::from_catalog([("mag", 12), ("atk", 7)])
    }

    fn set_with(key: &str, current: u32, max: u32, regen: u32) -> PoolSet {
        PoolSet::initialize(
            [PoolSpec {
                key: key.into(),
                label: None,
                explicit_max: Some(max),
                tied_stat: None,
                start: StartSpec::Literal(current),
                regen_per_turn: regen,
            }],
            &stats(),
        )
    }

    #[test]
    fn max_resolution_order() {
        let specs = [
            PoolSpec {
                key: "mana".into(),
                explicit_max: Some(20),
                tied_stat: Some(StatKind::Magic),
                ..PoolSpec::bare("mana")
            },
            PoolSpec {
                key: "focus".into(),
                tied_stat: Some(StatKind::Magic),
                ..PoolSpec::bare("focus")
            },
            PoolSpec::bare("stamina"),
            PoolSpec::bare("embers"),
        ];
        let set = PoolSet::initialize(specs, &stats());
        // explicit beats tied stat
        assert_eq!(set.get("mana").unwrap().max, 20);
        // tied stat value
        assert_eq!(set.get("focus").unwrap().max, 12);
        // domain default
        assert_eq!(
            set.get("stamina").unwrap().max,
            CombatConfig::DEFAULT_STAMINA_MAX
        );
        // unknown kind: 0
        assert_eq!(set.get("embers").unwrap().max, 0);
    }

    #[test]
    fn start_values_clamp_into_bounds() {
        let set = PoolSet::initialize(
            [PoolSpec {
                key: "mana".into(),
                explicit_max: Some(10),
                start: StartSpec::Literal(99),
                ..PoolSpec::bare("mana")
            }],
            &stats(),
        );
        assert_eq!(set.get("mana").unwrap().current, 10);
    }

    #[test]
    fn legacy_mirror_start() {
        let set = PoolSet::initialize(
            [PoolSpec {
                key: "mana".into(),
                explicit_max: Some(30),
                start: StartSpec::LegacyMirror(8),
                ..PoolSpec::bare("mana")
            }],
            &stats(),
        );
        assert_eq!(set.get("mana").unwrap().current, 8);
    }

    #[test]
    fn deduct_requires_full_amount() {
        let mut set = set_with("mana", 3, 10, 0);
        assert!(!set.deduct(&Cost::single("mana", 5)));
        assert_eq!(set.get("mana").unwrap().current, 3);
        assert!(set.deduct(&Cost::single("mana", 3)));
        assert_eq!(set.get("mana").unwrap().current, 0);
    }

    #[test]
    fn multi_cost_is_atomic() {
        let mut set = PoolSet::initialize(
            [
                PoolSpec {
                    key: "mana".into(),
                    explicit_max: Some(10),
                    start: StartSpec::Full,
                    ..PoolSpec::bare("mana")
                },
                PoolSpec {
                    key: "stamina".into(),
                    explicit_max: Some(10),
                    start: StartSpec::Literal(3),
                    ..PoolSpec::bare("stamina")
                },
            ],
            &stats(),
        );
        let cost = Cost::from_entries([("mana".to_string(), 5), ("stamina".to_string(), 5)]);
        assert!(!set.deduct(&cost));
        assert_eq!(set.get("mana").unwrap().current, 10);
        assert_eq!(set.get("stamina").unwrap().current, 3);
    }

    #[test]
    fn missing_pool_is_unaffordable_not_fatal() {
        let mut set = set_with("mana", 5, 10, 0);
        assert!(!set.can_afford_amount("rage", 1));
        assert!(!set.deduct(&Cost::single("rage", 1)));
        assert_eq!(set.restore("rage", 5), 0);
    }

    #[test]
    fn restore_clamps_to_max() {
        let mut set = set_with("mana", 8, 10, 0);
        assert_eq!(set.restore("mana", 5), 2);
        assert_eq!(set.get("mana").unwrap().current, 10);
    }

    #[test]
    fn regen_clamps_and_reports_gains() {
        let mut set = set_with("mana", 9, 10, 3);
        let gains = set.tick_regen();
        assert_eq!(gains, vec![("mana".to_string(), 1)]);
        assert_eq!(set.get("mana").unwrap().current, 10);
        // Already full: no gain reported.
        assert!(set.tick_regen().is_empty());
    }

    #[test]
    fn sync_tied_reclamps_current() {
        let mut combat_stats = stats();
        let mut set = PoolSet::initialize(
            [PoolSpec {
                key: "mana".into(),
                tied_stat: Some(StatKind::Magic),
                start: StartSpec::Full,
                ..PoolSpec::bare("mana")
            }],
            &combat_stats,
        );
        assert_eq!(set.get("mana").unwrap().max, 12);
        combat_stats.add(StatKind::Magic, -8);
        set.sync_tied(&combat_stats);
        let pool = set.get("mana").unwrap();
        assert_eq!(pool.max, 4);
        assert_eq!(pool.current, 4);
    }

    #[test]
    fn free_cost_always_affordable() {
        let set = PoolSet::new();
        assert!(set.can_afford(&Cost::free()));
        assert!(Cost::single("mana", 0).is_free());
    }
}
