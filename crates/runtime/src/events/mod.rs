//! Topic-based event routing between the session worker and its consumers.

mod bus;

pub use bus::{Event, EventBus, Topic};
