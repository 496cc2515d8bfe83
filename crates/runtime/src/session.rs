//! Combat session worker and handle.
//!
//! One session = one worker task owning the engine. All combat runs on that
//! single logical thread of control; the handle only passes messages. The
//! busy flag is the turn lock from the combat model: a boolean guard, not a
//! queue - submissions while locked are dropped silently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::{mpsc, oneshot};

use skirmish_core::{
    CombatConfig, CombatEngine, Combatant, CombatEvent, EncounterSnapshot, Phase, PlayerAction,
    TurnReport,
};

use crate::config::SessionConfig;
use crate::error::RuntimeError;
use crate::events::{Event, EventBus, Topic};
use crate::provider::ActionProvider;

enum Command {
    Act {
        action: PlayerAction,
        reply: Option<oneshot::Sender<Result<TurnReport, RuntimeError>>>,
    },
}

/// Spawns combat sessions.
pub struct CombatSession;

impl CombatSession {
    /// Start a session worker for the given matchup and hand back its
    /// handle. The worker exits when the encounter reaches a terminal phase
    /// or every handle is dropped.
    pub fn spawn(
        player: Combatant,
        enemy: Combatant,
        combat: CombatConfig,
        config: SessionConfig,
    ) -> SessionHandle {
        let seed = config.seed.unwrap_or_else(rand::random);
        let engine = CombatEngine::new(player, enemy, combat, seed);

        let bus = Arc::new(EventBus::with_capacity(config.bus_capacity));
        let busy = Arc::new(AtomicBool::new(false));
        let latest = Arc::new(Mutex::new(engine.snapshot()));
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = Worker {
            engine,
            bus: Arc::clone(&bus),
            busy: Arc::clone(&busy),
            latest: Arc::clone(&latest),
            config,
        };
        tokio::spawn(worker.run(rx));

        SessionHandle {
            commands: tx,
            bus,
            busy,
            latest,
        }
    }
}

/// Client side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    bus: Arc<EventBus>,
    busy: Arc<AtomicBool>,
    latest: Arc<Mutex<EncounterSnapshot>>,
}

impl SessionHandle {
    /// Subscribe to a bus topic.
    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Most recent encounter snapshot.
    pub fn snapshot(&self) -> EncounterSnapshot {
        self.latest.lock().expect("snapshot lock poisoned").clone()
    }

    /// Fire-and-forget: use a class skill. Returns false when the input was
    /// dropped (turn resolving, or session over).
    pub fn use_skill(&self, id: impl Into<String>) -> bool {
        self.submit(PlayerAction::Skill(id.into()))
    }

    /// Fire-and-forget: end the turn without acting.
    pub fn end_turn(&self) -> bool {
        self.submit(PlayerAction::EndTurn)
    }

    fn submit(&self, action: PlayerAction) -> bool {
        if self.busy.swap(true, Ordering::AcqRel) {
            tracing::debug!(?action, "input dropped: turn already resolving");
            return false;
        }
        let sent = self
            .commands
            .send(Command::Act {
                action,
                reply: None,
            })
            .is_ok();
        if !sent {
            self.busy.store(false, Ordering::Release);
        }
        sent
    }

    /// Submit an action and wait for the round to finish resolving.
    pub async fn act(&self, action: PlayerAction) -> Result<TurnReport, RuntimeError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(RuntimeError::Busy);
        }
        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = self.commands.send(Command::Act {
            action,
            reply: Some(reply_tx),
        });
        if sent.is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(RuntimeError::SessionClosed);
        }
        reply_rx.await.map_err(|_| RuntimeError::SessionClosed)?
    }

    /// Drive the session with a provider until the encounter ends or the
    /// provider runs dry. Returns the final phase.
    pub async fn drive(
        &self,
        provider: &mut dyn ActionProvider,
    ) -> Result<Phase, RuntimeError> {
        loop {
            let snapshot = self.snapshot();
            if snapshot.phase.is_terminal() {
                return Ok(snapshot.phase);
            }
            let Some(action) = provider.next_action(&snapshot).await else {
                return Ok(snapshot.phase);
            };
            match self.act(action).await {
                Ok(report) if report.phase.is_terminal() => return Ok(report.phase),
                Ok(_) => {}
                Err(RuntimeError::SessionClosed) => return Ok(self.snapshot().phase),
                Err(error) => return Err(error),
            }
        }
    }
}

/// The session worker: sole owner of the engine.
struct Worker {
    engine: CombatEngine,
    bus: Arc<EventBus>,
    busy: Arc<AtomicBool>,
    latest: Arc<Mutex<EncounterSnapshot>>,
    config: SessionConfig,
}

impl Worker {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let enemy_name = self.engine.enemy().name.clone();

        // Open the log with the matchup before any input arrives.
        let mut events: Vec<CombatEvent> = Vec::new();
        self.engine.announce(&mut events);
        self.publish_batch(events.drain(..), &enemy_name).await;
        self.publish_snapshot();

        while let Some(Command::Act { action, reply }) = commands.recv().await {
            tracing::debug!(round = self.engine.round(), ?action, "resolving turn");

            let result = self.engine.submit_player_action(&action, &mut events);
            match result {
                Ok(report) => {
                    self.publish_batch(events.drain(..), &enemy_name).await;
                    self.publish_snapshot();
                    if let Some(reply) = reply {
                        let _ = reply.send(Ok(report));
                    }
                    self.busy.store(false, Ordering::Release);
                    if report.phase.is_terminal() {
                        tracing::info!(phase = ?report.phase, "encounter finished");
                        break;
                    }
                }
                Err(error) => {
                    // Locked/terminal submissions drop silently; the protocol
                    // error still reaches an awaiting caller.
                    tracing::debug!(%error, "engine refused action");
                    events.clear();
                    if let Some(reply) = reply {
                        let _ = reply.send(Err(error.into()));
                    }
                    self.busy.store(false, Ordering::Release);
                }
            }
        }
    }

    /// Publish a batch of combat events with pacing delays: a beat after
    /// every event, and a longer one before the enemy's reply.
    async fn publish_batch(
        &self,
        events: impl Iterator<Item = CombatEvent>,
        enemy_name: &str,
    ) {
        for event in events {
            if self.config.phase_delay > std::time::Duration::ZERO
                && matches!(&event, CombatEvent::SkillUsed { actor, .. } if actor == enemy_name)
            {
                tokio::time::sleep(self.config.phase_delay).await;
            }
            self.bus.publish(Event::Combat {
                line: event.to_string(),
                event,
            });
            if self.config.effect_delay > std::time::Duration::ZERO {
                tokio::time::sleep(self.config.effect_delay).await;
            }
        }
    }

    fn publish_snapshot(&self) {
        let snapshot = self.engine.snapshot();
        *self.latest.lock().expect("snapshot lock poisoned") = snapshot.clone();
        self.bus.publish(Event::Snapshot(snapshot));
    }
}
