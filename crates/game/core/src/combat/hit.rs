//! Hit chance and accuracy calculations.

use crate::config::CombatConfig;

/// Calculate hit chance from accuracy vs evasion.
///
/// # Formula
///
/// ```text
/// chance = base + accuracy + ability_bonus - evasion - evasion_bonus
/// clamped to [5, 95]
/// ```
///
/// The clamp is a hard rule: no attack is ever a guaranteed hit or a
/// guaranteed miss, no matter how extreme the stats.
pub fn hit_chance(
    base: i32,
    accuracy: i32,
    ability_bonus: i32,
    evasion: i32,
    evasion_bonus_percent: i32,
) -> i32 {
    (base + accuracy + ability_bonus - evasion - evasion_bonus_percent)
        .clamp(CombatConfig::HIT_CHANCE_MIN, CombatConfig::HIT_CHANCE_MAX)
}

/// Check a d100 roll (1-100) against a computed chance.
pub fn check_hit(chance: i32, roll: u32) -> bool {
    roll as i32 <= chance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chance_clamps_to_floor_and_ceiling() {
        // Hopeless attacker still has 5%.
        assert_eq!(hit_chance(85, -200, 0, 100, 50), 5);
        // Perfect attacker still caps at 95%.
        assert_eq!(hit_chance(85, 200, 50, 0, 0), 95);
    }

    #[test]
    fn evasion_bonus_subtracts() {
        assert_eq!(hit_chance(85, 0, 0, 0, 0), 85);
        assert_eq!(hit_chance(85, 0, 0, 10, 15), 60);
    }

    #[test]
    fn roll_boundaries() {
        assert!(check_hit(85, 85));
        assert!(!check_hit(85, 86));
        assert!(check_hit(5, 1));
    }
}
