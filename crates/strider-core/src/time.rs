use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn secs_to_nanos(secs: f64) -> u64 {
    (secs * NANOS_PER_SEC).round() as u64
}

// ---------------------------------------------------------------------------
// SimTime
// ---------------------------------------------------------------------------

/// Integer-nanosecond simulation time.
///
/// Used as the recorder timestamp; control-step counts are derived from it
/// without accumulating floating-point drift.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    pub const ZERO: Self = Self { nanos: 0 };

    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Negative and non-finite inputs clamp to zero.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self {
                nanos: secs_to_nanos(secs),
            }
        } else {
            Self::ZERO
        }
    }

    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / NANOS_PER_SEC
    }

    #[must_use]
    pub const fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    pub const fn advance(&mut self, delta_nanos: u64) {
        self.nanos = self.nanos.saturating_add(delta_nanos);
    }

    pub const fn reset(&mut self) {
        self.nanos = 0;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.nanos / 1_000_000_000;
        let millis = (self.nanos % 1_000_000_000) / 1_000_000;
        write!(f, "{secs}.{millis:03}s")
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Fixed-timestep accumulator: feeds a variable frame delta, hands out
/// fixed control steps, and caps the number of steps per frame.
#[derive(Debug, Clone)]
pub struct Accumulator {
    accumulated: u64,
    timestep_nanos: u64,
    timestep_secs: f64,
    max_steps: u32,
    steps_this_frame: u32,
}

impl Accumulator {
    pub fn new(timestep_secs: f64) -> Self {
        Self {
            accumulated: 0,
            timestep_nanos: secs_to_nanos(timestep_secs.max(0.0)),
            timestep_secs,
            max_steps: 10,
            steps_this_frame: 0,
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Add a frame delta and start a new frame.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn accumulate(&mut self, delta: Duration) {
        self.accumulated = self.accumulated.saturating_add(delta.as_nanos() as u64);
        self.steps_this_frame = 0;
    }

    /// Consume one timestep if available and the frame cap allows it.
    pub const fn should_step(&mut self) -> bool {
        if self.timestep_nanos == 0 || self.steps_this_frame >= self.max_steps {
            return false;
        }
        if self.accumulated >= self.timestep_nanos {
            self.accumulated -= self.timestep_nanos;
            self.steps_this_frame += 1;
            return true;
        }
        false
    }

    /// Drop time left over once the frame cap was hit, so a slow frame does
    /// not snowball into the next one.
    pub const fn discard_backlog(&mut self) {
        if self.timestep_nanos > 0 && self.accumulated > self.timestep_nanos {
            self.accumulated %= self.timestep_nanos;
        }
    }

    #[must_use]
    pub const fn timestep(&self) -> f64 {
        self.timestep_secs
    }

    #[must_use]
    pub const fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accumulated_secs(&self) -> f64 {
        self.accumulated as f64 / NANOS_PER_SEC
    }

    pub const fn reset(&mut self) {
        self.accumulated = 0;
        self.steps_this_frame = 0;
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Control-loop clock: [`SimTime`] plus an [`Accumulator`] and a step counter.
///
/// ```ignore
/// clock.tick(frame_delta);
/// while clock.should_step() {
///     controller.step(clock.timestep(), &world)?;
///     controller.integrate(&mut world);
///     clock.advance();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    time: SimTime,
    steps: u64,
    accumulator: Accumulator,
}

impl Clock {
    pub fn new(timestep_secs: f64) -> Self {
        Self {
            time: SimTime::ZERO,
            steps: 0,
            accumulator: Accumulator::new(timestep_secs),
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.accumulator = self.accumulator.with_max_steps(max_steps);
        self
    }

    pub const fn tick(&mut self, delta: Duration) {
        self.accumulator.accumulate(delta);
    }

    pub const fn should_step(&mut self) -> bool {
        self.accumulator.should_step()
    }

    /// Record one completed control step.
    pub const fn advance(&mut self) {
        self.time.advance(self.accumulator.timestep_nanos);
        self.steps += 1;
    }

    /// Finish a frame, discarding any backlog beyond the step cap.
    pub const fn end_frame(&mut self) {
        self.accumulator.discard_backlog();
    }

    #[must_use]
    pub const fn time(&self) -> SimTime {
        self.time
    }

    /// Control steps taken since the last reset.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub const fn timestep(&self) -> f64 {
        self.accumulator.timestep()
    }

    pub const fn reset(&mut self) {
        self.time.reset();
        self.steps = 0;
        self.accumulator.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
