//! Typed, synchronous event bus.
//!
//! Subscribers are called in registration order on the publishing thread.
//! Every published event is also appended to an in-memory log, which the
//! JSON API returns and fingerprints.

use std::fmt;

use crate::models::{SimEvent, TimedEvent};

pub type Subscriber = Box<dyn FnMut(&TimedEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    log: Vec<TimedEvent>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("log_len", &self.log.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&TimedEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, tick: u64, sim_ms: u64, event: SimEvent) {
        let timed = TimedEvent { tick, sim_ms, event };
        for subscriber in &mut self.subscribers {
            subscriber(&timed);
        }
        self.log.push(timed);
    }

    pub fn log(&self) -> &[TimedEvent] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.log)
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}
