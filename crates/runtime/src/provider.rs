//! Action provider seam.
//!
//! A provider is anything that produces the player's next action: a UI
//! bridge, a replay file, or a script in tests. The session pulls one action
//! at a time and stops when the provider runs dry or the encounter ends.

use std::collections::VecDeque;

use async_trait::async_trait;
use skirmish_core::{EncounterSnapshot, PlayerAction};

/// Source of player actions.
#[async_trait]
pub trait ActionProvider: Send {
    /// Produce the next action given the current encounter state, or `None`
    /// to stop driving.
    async fn next_action(&mut self, snapshot: &EncounterSnapshot) -> Option<PlayerAction>;
}

/// Fixed action sequence; `None` once exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Repeat one skill forever (grind until someone drops).
    pub fn repeat_skill(id: impl Into<String>) -> RepeatProvider {
        RepeatProvider {
            action: PlayerAction::Skill(id.into()),
        }
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn next_action(&mut self, _snapshot: &EncounterSnapshot) -> Option<PlayerAction> {
        self.actions.pop_front()
    }
}

/// Endlessly repeats a single action.
#[derive(Clone, Debug)]
pub struct RepeatProvider {
    action: PlayerAction,
}

#[async_trait]
impl ActionProvider for RepeatProvider {
    async fn next_action(&mut self, _snapshot: &EncounterSnapshot) -> Option<PlayerAction> {
        Some(self.action.clone())
    }
}
