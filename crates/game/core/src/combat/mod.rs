//! Combat resolution system.
//!
//! Pure functions for resolving attacks. Nothing in this module mutates a
//! combatant: [`resolve_strike`] returns the number and the caller applies
//! it (shield first, then HP).
//!
//! # Canonical pipeline
//!
//! ```text
//! hit roll    chance = clamp(base + acc + bonus - eva - eva_bonus, 5, 95)
//! raw         varied_base + attack_stat + power_bonus
//! mitigation  raw × K / (max(0, def - vulnerability) + K)
//! variance    × uniform[band]
//! critical    × crit multiplier (on configured chance)
//! elemental   × (100 - resist%) / 100
//! floor       max(1, value)  - a hit always deals at least 1
//! ```

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{apply_variance, elemental_reduction, mitigate};
pub use hit::{check_hit, hit_chance};
pub use result::{AttackReport, AttackResolution, DamageBreakdown, resolve_attack, resolve_strike};
