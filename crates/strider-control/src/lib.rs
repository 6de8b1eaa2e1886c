//! Procedural locomotion control.
//!
//! Each control step runs, in order:
//!
//! ```text
//! gait phase → velocity ramp → foot planning → raw torques → leg-frame balancing
//! ```
//!
//! and the resulting torque vector is submitted to the physics engine in a
//! separate [`integrate`](controller::Controller::integrate) call.
//!
//! # Quick Start
//!
//! ```ignore
//! use strider_control::prelude::*;
//!
//! let mut controller = Controller::from_config(&config.controller)?;
//! controller.reset(&world);
//! loop {
//!     let report = controller.step(dt, &world)?;
//!     controller.integrate(&mut world);
//!     world.integrate(dt);
//! }
//! ```

pub mod controller;
pub mod diagnostics;
pub mod foot;
pub mod joints;
pub mod leg_frame;
pub mod physics;
pub mod snapshot;
pub mod velocity;
pub mod virtual_force;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::controller::Controller;
    pub use crate::diagnostics::{Diagnostic, StepReport};
    pub use crate::foot::{FootPlacement, FootState};
    pub use crate::joints::{JointDrive, JointGraph, LegFrameJoints};
    pub use crate::leg_frame::{BalanceIssue, BalanceOutcome, LegFrame, OrientationCurves};
    pub use crate::physics::PhysicsBackend;
    pub use crate::snapshot::{ControllerSnapshot, FootSnapshot, LegFrameSnapshot};
    pub use crate::velocity::{RampDirection, VelocityRamp};
    pub use crate::virtual_force::{NoVirtualForces, VirtualForceModel};
}
