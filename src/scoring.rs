use crate::difficulty::DifficultyConfig;

/// Raw event counts for the current round.
///
/// Counters only ever increase while a round is active; `reset` is called
/// once per round, at round end, after the final score has been read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    hits: u32,
    missed: u32,
    errors: u32,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.missed += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Current score under the given point weights, clamped at zero.
    pub fn score(&self, config: &DifficultyConfig) -> i64 {
        let raw = self.hits as i64 * config.hit_points
            - self.missed as i64 * config.miss_penalty
            - self.errors as i64 * config.error_penalty;
        raw.max(0)
    }
}
