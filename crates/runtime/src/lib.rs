//! Async session driver for the combat engine.
//!
//! This crate wires a [`skirmish_core::CombatEngine`] into a single worker
//! task - the one logical thread of control the combat model assumes - and
//! exposes it through [`SessionHandle`]: fire-and-forget player commands in,
//! a topic-based event bus out. Pacing delays between published events give
//! the presentation layer its sequential animation beats; the engine itself
//! stays synchronous and instant.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the worker task and handle
//! - [`events`] provides the topic-based event bus
//! - [`provider`] is the seam for scripted or interactive action sources
pub mod config;
pub mod error;
pub mod events;
pub mod provider;
pub mod session;

pub use config::SessionConfig;
pub use error::RuntimeError;
pub use events::{Event, EventBus, Topic};
pub use provider::{ActionProvider, RepeatProvider, ScriptedProvider};
pub use session::{CombatSession, SessionHandle};
