//! Time management utilities
//!
//! The simulation never reads ambient time. A [`TimeSource`] yields frame deltas
//! and a [`SimulationClock`] value turns them into monotonic ticks that are
//! threaded explicitly through the update and render calls.

use std::collections::VecDeque;
use std::time::Instant;

/// Source of per-frame time deltas in seconds
pub trait TimeSource {
    /// Time elapsed since the previous call
    fn next_delta(&mut self) -> f32;
}

/// Real-time source backed by a monotonic [`Instant`]
pub struct WallClock {
    last_frame: Instant,
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock {
    /// Create a new wall clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }
}

impl TimeSource for WallClock {
    fn next_delta(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed.as_secs_f32()
    }
}

/// Replays a fixed sequence of deltas, then repeats a fallback step
///
/// Used for deterministic runs and tests.
#[derive(Debug, Clone)]
pub struct FixedDeltas {
    queued: VecDeque<f32>,
    fallback: f32,
}

impl FixedDeltas {
    /// Replay `deltas` in order, then yield `fallback` forever
    pub fn new(deltas: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            queued: deltas.into_iter().collect(),
            fallback,
        }
    }

    /// Yield the same step on every call
    pub fn constant(step: f32) -> Self {
        Self::new(std::iter::empty(), step)
    }
}

impl TimeSource for FixedDeltas {
    fn next_delta(&mut self) -> f32 {
        self.queued.pop_front().unwrap_or(self.fallback)
    }
}

/// One advance of the simulation clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Zero-based tick index
    pub index: u64,
    /// Sanitized delta for this tick in seconds
    pub delta: f32,
    /// Elapsed simulation time including this tick's delta
    pub elapsed: f32,
}

/// Explicit simulation clock
///
/// Elapsed time is accumulated in `f64` so long runs do not lose precision,
/// and is guaranteed non-decreasing.
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    next_tick: u64,
    elapsed: f64,
    last_delta: f32,
}

impl SimulationClock {
    /// Create a clock at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta` seconds
    ///
    /// Negative or non-finite deltas are logged and treated as zero.
    pub fn advance(&mut self, delta: f32) -> ClockTick {
        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            log::warn!("Ignoring invalid frame delta {} at tick {}", delta, self.next_tick);
            0.0
        };

        self.elapsed += f64::from(delta);
        self.last_delta = delta;

        let tick = ClockTick {
            index: self.next_tick,
            delta,
            elapsed: self.elapsed as f32,
        };
        self.next_tick += 1;
        tick
    }

    /// Pull the next delta from `source` and advance
    pub fn advance_from(&mut self, source: &mut dyn TimeSource) -> ClockTick {
        let delta = source.next_delta();
        self.advance(delta)
    }

    /// Number of ticks produced so far
    pub fn ticks(&self) -> u64 {
        self.next_tick
    }

    /// Elapsed simulation time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Delta of the most recent tick
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }
}
