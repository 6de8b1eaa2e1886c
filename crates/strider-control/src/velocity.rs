//! Rate-limited approach of the travel velocity toward its goal.

use nalgebra::Vector3;

/// Relative slack on the snap window; absorbs rounding from renormalizing
/// the step direction every frame.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Which way the last ramp step went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RampDirection {
    /// Goal is faster than the current speed.
    Accelerating,
    /// Goal is slower than, or as fast as, the current speed.
    Decelerating,
    /// Already at the goal.
    #[default]
    Holding,
}

/// Ramped current velocity chasing a goal velocity.
///
/// Each step moves `current` along `goal - current` by `ramp_rate * dt` and
/// snaps onto the goal once the remaining distance fits in one step, so
/// starting from rest convergence takes `ceil(|goal| / (ramp_rate * dt))`
/// steps.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityRamp {
    current: Vector3<f64>,
    goal: Vector3<f64>,
    ramp_rate: f64,
}

impl VelocityRamp {
    pub fn new(goal: Vector3<f64>, ramp_rate: f64) -> Self {
        Self {
            current: Vector3::zeros(),
            goal,
            ramp_rate,
        }
    }

    pub const fn current(&self) -> Vector3<f64> {
        self.current
    }

    pub const fn goal(&self) -> Vector3<f64> {
        self.goal
    }

    pub const fn ramp_rate(&self) -> f64 {
        self.ramp_rate
    }

    pub const fn set_goal(&mut self, goal: Vector3<f64>) {
        self.goal = goal;
    }

    pub const fn set_current(&mut self, current: Vector3<f64>) {
        self.current = current;
    }

    pub fn is_converged(&self) -> bool {
        self.current == self.goal
    }

    /// Advance one step of `dt` seconds.
    pub fn step(&mut self, dt: f64) -> RampDirection {
        if self.is_converged() {
            return RampDirection::Holding;
        }
        // classify by the actual current speed
        let direction = if self.goal.norm_squared() > self.current.norm_squared() {
            RampDirection::Accelerating
        } else {
            RampDirection::Decelerating
        };

        let step = self.ramp_rate * dt;
        let delta = self.goal - self.current;
        let remaining = delta.norm();
        if remaining <= step * (1.0 + SNAP_TOLERANCE) {
            self.current = self.goal;
        } else {
            self.current += delta * (step / remaining);
        }
        direction
    }
}
