//! Session configuration.

use std::time::Duration;

/// Tunables for one combat session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Pause after each published combat event, so a multi-effect skill
    /// shows its changes incrementally.
    pub effect_delay: Duration,
    /// Extra pause before the enemy's reply begins.
    pub phase_delay: Duration,
    /// Session seed; drawn randomly when absent. Fixing it makes the whole
    /// encounter replayable.
    pub seed: Option<u64>,
    /// Event bus channel capacity per topic.
    pub bus_capacity: usize,
}

impl SessionConfig {
    /// Zero-delay configuration for tests and headless simulation.
    pub fn instant(seed: u64) -> Self {
        Self {
            effect_delay: Duration::ZERO,
            phase_delay: Duration::ZERO,
            seed: Some(seed),
            bus_capacity: 256,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            effect_delay: Duration::from_millis(300),
            phase_delay: Duration::from_millis(450),
            seed: None,
            bus_capacity: 100,
        }
    }
}
