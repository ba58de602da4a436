use crate::difficulty::{Difficulty, DifficultyConfig};
use crate::error::GameError;
use crate::history::RoundHistory;
use crate::leaderboard::{LeaderboardDb, LeaderboardRecord};
use crate::scoring::ScoreLedger;
use crate::timers::{TimerKey, TimerRegistry};
use crate::util::{sanitize_player_name, today_stamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Round length in seconds.
pub const ROUND_SECS: u64 = 60;

const CLOCK_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    Ended,
}

/// One grid cell capable of holding a mole. The retreat deadline itself
/// lives in the timer registry under `TimerKey::Retreat(index)`; while the
/// session is running a hole is occupied iff that key is pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoleState {
    pub occupied: bool,
}

/// Final numbers for a finished round, handed to the presentation layer
/// and appended to the round history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub player: String,
    pub difficulty: Difficulty,
    pub hits: u32,
    pub missed: u32,
    pub errors: u32,
    pub points: i64,
    pub date: String,
}

/// Plain-data notifications for the presentation layer. The core never
/// touches the terminal; the UI decides what a hole or score change looks
/// like.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    HoleChanged { hole: usize, occupied: bool },
    ScoreChanged { hits: u32, missed: u32, errors: u32, score: i64 },
    ClockChanged { remaining_secs: u64 },
    SessionEnded(RoundSummary),
}

/// The session state machine: owns the clock, the difficulty selection, all
/// hole state and the ledger, and drives the spawn/retreat loop through the
/// timer registry.
///
/// Everything is single-threaded and callback-free: the event loop calls
/// `advance(now)` and the session dispatches whatever timers came due. A
/// timer that lost a cancellation race is swallowed by the phase check at
/// the top of the dispatch loop.
#[derive(Debug)]
pub struct GameSession {
    phase: SessionPhase,
    difficulty: Difficulty,
    holes: Vec<HoleState>,
    ledger: ScoreLedger,
    timers: TimerRegistry,
    remaining_secs: u64,
    player_name: String,
    rng: StdRng,
    leaderboard: Option<LeaderboardDb>,
    history: Option<RoundHistory>,
}

impl GameSession {
    /// Session wired to the default on-disk leaderboard and round history.
    /// Store failures degrade to no-ops rather than aborting the game.
    pub fn new(difficulty: Difficulty, player_name: &str) -> Self {
        Self::with_stores(
            difficulty,
            player_name,
            LeaderboardDb::open_default().ok(),
            RoundHistory::open_default(),
        )
    }

    pub fn with_stores(
        difficulty: Difficulty,
        player_name: &str,
        leaderboard: Option<LeaderboardDb>,
        history: Option<RoundHistory>,
    ) -> Self {
        Self {
            phase: SessionPhase::Idle,
            difficulty,
            holes: vec![HoleState::default(); difficulty.config().holes],
            ledger: ScoreLedger::new(),
            timers: TimerRegistry::new(),
            remaining_secs: ROUND_SECS,
            player_name: if player_name.is_empty() {
                String::new()
            } else {
                sanitize_player_name(player_name)
            },
            rng: StdRng::from_entropy(),
            leaderboard,
            history,
        }
    }

    /// Store-less session with a seeded rng, for headless tests.
    pub fn headless(difficulty: Difficulty, player_name: &str, seed: u64) -> Self {
        let mut session = Self::with_stores(difficulty, player_name, None, None);
        session.rng = StdRng::seed_from_u64(seed);
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &'static DifficultyConfig {
        self.difficulty.config()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn score(&self) -> i64 {
        self.ledger.score(self.config())
    }

    pub fn holes(&self) -> &[HoleState] {
        &self.holes
    }

    pub fn hole_occupied(&self, hole: usize) -> bool {
        self.holes.get(hole).map(|h| h.occupied).unwrap_or(false)
    }

    pub fn leaderboard(&self) -> Option<&LeaderboardDb> {
        self.leaderboard.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    /// Occupied-iff-retreat-pending co-invariant. Meaningful while `Running`;
    /// a paused session holds no timers at all by design.
    pub fn holes_consistent(&self) -> bool {
        self.holes
            .iter()
            .enumerate()
            .all(|(i, h)| h.occupied == self.timers.is_pending(&TimerKey::Retreat(i)))
    }

    /// Begin a round. Fails without scheduling anything when no player name
    /// is registered; the caller should send the user back to registration.
    pub fn start(&mut self, now: Instant) -> Result<Vec<SessionEvent>, GameError> {
        if self.player_name.is_empty() {
            return Err(GameError::NoPlayerRegistered);
        }
        if !matches!(self.phase, SessionPhase::Idle | SessionPhase::Ended) {
            return Ok(Vec::new());
        }

        self.phase = SessionPhase::Running;
        self.remaining_secs = ROUND_SECS;

        let mut events = vec![SessionEvent::ClockChanged {
            remaining_secs: self.remaining_secs,
        }];
        self.timers.schedule(TimerKey::ClockTick, now, CLOCK_TICK);
        // The first spawn fires immediately; the chain takes over from there.
        self.spawn_tick(now, &mut events);
        Ok(events)
    }

    /// Suspend the round: every timer is cancelled synchronously, while the
    /// clock, hole state and ledger are preserved for `resume`.
    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.timers.cancel_all();
        self.phase = SessionPhase::Paused;
    }

    /// Restart the clock and the spawn chain from the preserved state.
    ///
    /// Moles that were up when the round paused get a fresh retreat window;
    /// their original deadlines died with `cancel_all`, and without a new
    /// timer they would stay up forever.
    pub fn resume(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.phase != SessionPhase::Paused || self.remaining_secs == 0 {
            return events;
        }
        self.phase = SessionPhase::Running;

        let window = self.config().exposure_window;
        for hole in 0..self.holes.len() {
            if self.holes[hole].occupied {
                self.timers.schedule(TimerKey::Retreat(hole), now, window);
            }
        }
        self.timers.schedule(TimerKey::ClockTick, now, CLOCK_TICK);
        self.spawn_tick(now, &mut events);
        events
    }

    /// Player strike on a hole. Hit when occupied, error when empty; a
    /// strike racing a retreat simply observes the hole already empty.
    pub fn strike(&mut self, hole: usize) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.phase != SessionPhase::Running || hole >= self.holes.len() {
            return events;
        }

        if self.holes[hole].occupied {
            // Cancel before the state change so a due retreat can never
            // double-count this mole.
            self.timers.cancel(&TimerKey::Retreat(hole));
            self.holes[hole].occupied = false;
            self.ledger.record_hit();
            events.push(SessionEvent::HoleChanged {
                hole,
                occupied: false,
            });
        } else {
            self.ledger.record_error();
        }
        self.push_score(&mut events);
        events
    }

    /// Change the active tier. Locked while a round is running or paused.
    pub fn select_difficulty(&mut self, tier: Difficulty) -> Result<(), GameError> {
        if !matches!(self.phase, SessionPhase::Idle | SessionPhase::Ended) {
            return Err(GameError::DifficultyLocked);
        }
        self.difficulty = tier;
        self.holes = vec![HoleState::default(); tier.config().holes];
        Ok(())
    }

    /// Dispatch every timer that came due. This is the only place spawn,
    /// retreat and clock callbacks run, so no two of them can ever overlap.
    pub fn advance(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for key in self.timers.drain_due(now) {
            // Liveness check: end() inside an earlier iteration cancels the
            // registry, but keys already drained would still be in hand.
            if self.phase != SessionPhase::Running {
                break;
            }
            match key {
                TimerKey::ClockTick => self.clock_tick(now, &mut events),
                TimerKey::SpawnChain => self.spawn_tick(now, &mut events),
                TimerKey::Retreat(hole) => self.retreat(hole, &mut events),
            }
        }
        events
    }

    fn clock_tick(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        events.push(SessionEvent::ClockChanged {
            remaining_secs: self.remaining_secs,
        });
        if self.remaining_secs == 0 {
            self.end(events);
        } else {
            self.timers.schedule(TimerKey::ClockTick, now, CLOCK_TICK);
        }
    }

    fn spawn_tick(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let config = self.config();
        let hole = self.rng.gen_range(0..config.holes);
        // An occupied pick is simply wasted for this tick; holes are not
        // weighted for unoccupied time.
        if !self.holes[hole].occupied {
            self.holes[hole].occupied = true;
            self.timers
                .schedule(TimerKey::Retreat(hole), now, config.exposure_window);
            events.push(SessionEvent::HoleChanged {
                hole,
                occupied: true,
            });
        }
        self.timers
            .schedule(TimerKey::SpawnChain, now, config.spawn_interval);
    }

    fn retreat(&mut self, hole: usize, events: &mut Vec<SessionEvent>) {
        if !self.holes[hole].occupied {
            return;
        }
        self.holes[hole].occupied = false;
        self.ledger.record_miss();
        events.push(SessionEvent::HoleChanged {
            hole,
            occupied: false,
        });
        self.push_score(events);
    }

    fn end(&mut self, events: &mut Vec<SessionEvent>) {
        self.timers.cancel_all();

        let summary = RoundSummary {
            player: self.player_name.clone(),
            difficulty: self.difficulty,
            hits: self.ledger.hits(),
            missed: self.ledger.missed(),
            errors: self.ledger.errors(),
            points: self.score(),
            date: today_stamp(),
        };

        if let Some(ref db) = self.leaderboard {
            let _ = db.append(&LeaderboardRecord {
                name: summary.player.clone(),
                points: summary.points,
                date: summary.date.clone(),
                difficulty: summary.difficulty,
            });
        }
        if let Some(ref history) = self.history {
            let _ = history.append(&summary);
        }

        for (hole, state) in self.holes.iter_mut().enumerate() {
            if state.occupied {
                state.occupied = false;
                events.push(SessionEvent::HoleChanged {
                    hole,
                    occupied: false,
                });
            }
        }

        self.ledger.reset();
        self.phase = SessionPhase::Ended;
        events.push(SessionEvent::ScoreChanged {
            hits: 0,
            missed: 0,
            errors: 0,
            score: 0,
        });
        events.push(SessionEvent::SessionEnded(summary));
    }

    fn push_score(&self, events: &mut Vec<SessionEvent>) {
        events.push(SessionEvent::ScoreChanged {
            hits: self.ledger.hits(),
            missed: self.ledger.missed(),
            errors: self.ledger.errors(),
            score: self.score(),
        });
    }
}
