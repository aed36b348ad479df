//! Cancellable repeating tick scheduler.
//!
//! The scheduler never reads a clock itself: callers pass a monotonic
//! timestamp in milliseconds to [`TickScheduler::poll`]. This keeps the
//! simulation loop deterministic under test and lets the binary drive it
//! from `std::time::Instant`.
//!
//! Every call to [`TickScheduler::start`] opens a new run and cancels the
//! previous one. Ticks carry the id of the run that produced them, so a
//! tick held across a restart is recognised as stale and dropped instead
//! of producing a duplicate sample.

use serde::{Deserialize, Serialize};

/// Identifier of one scheduler run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

/// A single scheduled tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Run that produced this tick
    pub run: RunId,
    /// 1-based tick number within the run
    pub sequence: u64,
    /// Clock time at which the tick fired (ms)
    pub fired_at_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SchedulerState {
    Idle,
    Armed {
        run: RunId,
        /// Time of the last fired tick, or of the anchoring poll
        last_fire_ms: Option<f64>,
        fired: u64,
    },
}

/// Frame-gated repeating task
#[derive(Debug, Clone)]
pub struct TickScheduler {
    /// Minimum clock time between ticks (ms)
    interval_ms: f64,
    next_run: u64,
    state: SchedulerState,
}

impl TickScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            next_run: 0,
            state: SchedulerState::Idle,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Start a new run, cancelling any run in progress
    pub fn start(&mut self) -> RunId {
        if let SchedulerState::Armed { run, .. } = self.state {
            log::debug!("Cancelling run {} before restart", run.0);
        }
        let run = RunId(self.next_run);
        self.next_run += 1;
        self.state = SchedulerState::Armed {
            run,
            last_fire_ms: None,
            fired: 0,
        };
        run
    }

    /// Stop scheduling further ticks
    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Armed { .. })
    }

    /// Run currently armed, if any
    pub fn current_run(&self) -> Option<RunId> {
        match self.state {
            SchedulerState::Armed { run, .. } => Some(run),
            SchedulerState::Idle => None,
        }
    }

    /// Whether a tick belongs to the armed run
    pub fn is_current(&self, tick: &Tick) -> bool {
        self.current_run() == Some(tick.run)
    }

    /// Ticks fired in the current run
    pub fn fired(&self) -> u64 {
        match self.state {
            SchedulerState::Armed { fired, .. } => fired,
            SchedulerState::Idle => 0,
        }
    }

    /// Advance the scheduler clock
    ///
    /// The first poll after `start` only anchors the clock. Later polls fire
    /// at most one tick, once `interval_ms` has elapsed since the previous
    /// one. A clock that goes backwards fires nothing.
    pub fn poll(&mut self, now_ms: f64) -> Option<Tick> {
        let interval = self.interval_ms;
        match &mut self.state {
            SchedulerState::Idle => None,
            SchedulerState::Armed {
                last_fire_ms: last @ None,
                ..
            } => {
                *last = Some(now_ms);
                None
            }
            SchedulerState::Armed {
                run,
                last_fire_ms: Some(last),
                fired,
            } => {
                if now_ms - *last < interval {
                    return None;
                }
                *last = now_ms;
                *fired += 1;
                Some(Tick {
                    run: *run,
                    sequence: *fired,
                    fired_at_ms: now_ms,
                })
            }
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(16.0)
    }
}
