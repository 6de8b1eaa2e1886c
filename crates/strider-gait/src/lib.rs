//! Gait timing and foot-trajectory building blocks.
//!
//! - [`GaitPlayer`](player::GaitPlayer) advances the shared gait phase.
//! - [`StepCycle`](step_cycle::StepCycle) decides stance or swing for one
//!   leg and normalizes the phase within each interval.
//! - [`PiecewiseLinear`](curve::PiecewiseLinear) curves shape step height,
//!   swing easing and body orientation over the phase.
//! - [`swing`] holds the strike-target and swing-position geometry.

pub mod curve;
pub mod player;
pub mod step_cycle;
pub mod swing;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::curve::PiecewiseLinear;
    pub use crate::player::GaitPlayer;
    pub use crate::step_cycle::StepCycle;
    pub use crate::swing::{nominal_foot_local, strike_target, swing_foot_position};
}
