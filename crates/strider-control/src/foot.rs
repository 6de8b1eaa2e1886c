//! Per-leg foot placement state machine.

use nalgebra::Point3;

/// Whether the foot is planted or airborne this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FootState {
    #[default]
    Stance,
    Swing,
}

/// Lift position, strike target and current foot target of one leg.
///
/// The lift latch guarantees the lift position is captured once per entry
/// into stance: it is set on the first stance tick and cleared by any swing
/// tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FootPlacement {
    state: FootState,
    lift: Point3<f64>,
    strike: Point3<f64>,
    target: Point3<f64>,
    lift_latched: bool,
    latches: u64,
}

impl FootPlacement {
    /// Place the foot at rest on `ground`.
    pub fn planted_at(ground: Point3<f64>) -> Self {
        Self {
            state: FootState::Stance,
            lift: ground,
            strike: ground,
            target: ground,
            lift_latched: false,
            latches: 0,
        }
    }

    /// Stance tick with a freshly computed strike target.
    ///
    /// Returns `true` when the lift latch fired on this tick.
    pub fn stance_tick(&mut self, strike: Point3<f64>) -> bool {
        self.state = FootState::Stance;
        let fired = !self.lift_latched;
        if fired {
            self.lift = self.strike;
            self.lift_latched = true;
            self.latches += 1;
        }
        self.strike = strike;
        self.target = self.lift;
        fired
    }

    /// Swing tick given the height and easing curve values at the swing
    /// phase.
    pub fn swing_tick(&mut self, height: f64, ease: f64) {
        self.state = FootState::Swing;
        self.lift_latched = false;
        self.target = strider_gait::swing::swing_foot_position(&self.lift, &self.strike, ease, height);
    }

    pub const fn state(&self) -> FootState {
        self.state
    }

    /// Where the foot left the ground.
    pub const fn lift(&self) -> Point3<f64> {
        self.lift
    }

    /// Where the foot should land next.
    pub const fn strike(&self) -> Point3<f64> {
        self.strike
    }

    /// Current point along the foot trajectory.
    pub const fn target(&self) -> Point3<f64> {
        self.target
    }

    pub const fn is_lift_latched(&self) -> bool {
        self.lift_latched
    }

    /// Number of times the lift latch has fired.
    pub const fn latch_count(&self) -> u64 {
        self.latches
    }
}
