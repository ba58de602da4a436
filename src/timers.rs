use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Identity of a scheduled callback.
///
/// Every pending timer in the game is registered under one of these keys, so
/// a single `cancel_all` can stop the spawn chain, the clock, and every
/// per-hole retreat in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// The self-rescheduling spawn loop.
    SpawnChain,
    /// The 1-second session countdown.
    ClockTick,
    /// Retreat deadline for the mole in the given hole.
    Retreat(usize),
}

/// Deadline registry over an explicit clock.
///
/// No background threads: the event loop supplies `now` and collects fired
/// keys via `drain_due`. A key scheduled twice keeps only the later request.
/// Cancellation is cooperative — a caller that drained a key must still
/// re-check session state before acting on it, since `cancel_all` may have
/// run between draining and dispatch.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    pending: HashMap<TimerKey, Instant>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, key: TimerKey, now: Instant, delay: Duration) {
        self.pending.insert(key, now + delay);
    }

    pub fn cancel(&mut self, key: &TimerKey) {
        self.pending.remove(key);
    }

    /// Cancel every pending timer. Idempotent; safe on an empty registry.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: &TimerKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return every key whose deadline has passed, ordered by
    /// deadline. Ties carry no ordering guarantee beyond the deadline itself.
    pub fn drain_due(&mut self, now: Instant) -> Vec<TimerKey> {
        let mut due: Vec<(TimerKey, Instant)> = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(k, at)| (*k, *at))
            .collect();
        due.sort_by_key(|(_, at)| *at);
        for (key, _) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }
}
