//! Framework-agnostic PD drives for joint and body orientation control.
//!
//! ```text
//! current rotation ─┐
//!                   ├─ rotation_error ─ per-axis PD ─ torque (world frame)
//! desired rotation ─┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use strider_drive::prelude::*;
//! use nalgebra::UnitQuaternion;
//!
//! let mut pd = OrientationPd::new(40.0, 4.0);
//! let desired = yaw_pitch_roll(0.0, 0.1, 0.0);
//! let torque = pd.drive(&UnitQuaternion::identity(), &desired, 1.0 / 120.0);
//! assert!(torque.is_some());
//! ```

pub mod drive;
pub mod orientation;
pub mod pd;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::drive::Drive;
    pub use crate::orientation::{OrientationPd, rotation_error, yaw_pitch_roll};
    pub use crate::pd::PdController;
}
