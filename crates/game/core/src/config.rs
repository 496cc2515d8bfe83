/// Combat configuration constants and tunable balance parameters.
///
/// Everything a designer tunes lives here so the rules code stays free of
/// magic numbers. The defaults mirror the prototype balance; none of them
/// change engine behavior beyond the formulas they parameterize.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Base chance (percent) that an attack lands before accuracy/evasion
    /// adjustments.
    pub base_hit_chance: i32,

    /// Soft-cap constant `K` in the mitigation multiplier `K / (def + K)`.
    /// Larger K weakens defense; damage approaches but never reaches 0.
    pub mitigation_k: u32,

    /// Post-mitigation variance band, inclusive, as percentages.
    pub variance_min_percent: u32,
    pub variance_max_percent: u32,

    /// Critical hit chance (percent) and damage multiplier (percent).
    pub crit_chance: u32,
    pub crit_multiplier_percent: u32,

    /// Base power of the synthesized enemy fallback attack.
    pub fallback_attack_power: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of timed stat modifiers tracked per combatant.
    pub const MAX_ACTIVE_MODIFIERS: usize = 16;

    // ===== hit roll bounds =====
    /// Hard floor on hit chance: no attack is a guaranteed miss.
    pub const HIT_CHANCE_MIN: i32 = 5;
    /// Hard ceiling on hit chance: no attack is a guaranteed hit.
    pub const HIT_CHANCE_MAX: i32 = 95;

    // ===== domain-default pool maxima per resource kind =====
    pub const DEFAULT_HEALTH_MAX: u32 = 30;
    pub const DEFAULT_MANA_MAX: u32 = 10;
    pub const DEFAULT_STAMINA_MAX: u32 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_HIT_CHANCE: i32 = 85;
    pub const DEFAULT_MITIGATION_K: u32 = 50;
    pub const DEFAULT_VARIANCE_MIN: u32 = 90;
    pub const DEFAULT_VARIANCE_MAX: u32 = 110;
    pub const DEFAULT_CRIT_CHANCE: u32 = 10;
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 150;
    pub const DEFAULT_FALLBACK_POWER: u32 = 4;

    pub fn new() -> Self {
        Self {
            base_hit_chance: Self::DEFAULT_BASE_HIT_CHANCE,
            mitigation_k: Self::DEFAULT_MITIGATION_K,
            variance_min_percent: Self::DEFAULT_VARIANCE_MIN,
            variance_max_percent: Self::DEFAULT_VARIANCE_MAX,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            crit_multiplier_percent: Self::DEFAULT_CRIT_MULTIPLIER,
            fallback_attack_power: Self::DEFAULT_FALLBACK_POWER,
        }
    }

    /// Default pool maximum for a resource kind when the catalog declares
    /// neither an explicit max nor a tied stat.
    pub fn default_pool_max(kind: crate::resource::ResourceKind) -> u32 {
        use crate::resource::ResourceKind;
        match kind {
            ResourceKind::Health => Self::DEFAULT_HEALTH_MAX,
            ResourceKind::Mana => Self::DEFAULT_MANA_MAX,
            ResourceKind::Stamina => Self::DEFAULT_STAMINA_MAX,
            ResourceKind::Other => 0,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
