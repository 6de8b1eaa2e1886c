//! Orientation error and the three-axis orientation PD.

use nalgebra::{UnitQuaternion, Vector3};

use crate::drive::Drive;
use crate::pd::PdController;

/// Compose `Rz(yaw) · Rx(pitch) · Ry(roll)`.
///
/// Z is up, X is lateral (pitch axis), Y is forward (roll axis).
#[must_use]
pub fn yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), roll)
}

/// Shortest-arc rotation taking `current` to `desired`, as a world-frame
/// axis × angle vector with angle in `[0, π]`.
///
/// Returns `None` if either input or the result is non-finite. A
/// near-identity error yields zero rather than an undefined axis.
#[must_use]
pub fn rotation_error(
    current: &UnitQuaternion<f64>,
    desired: &UnitQuaternion<f64>,
) -> Option<Vector3<f64>> {
    let finite = |q: &UnitQuaternion<f64>| q.coords.iter().all(|c| c.is_finite());
    if !finite(current) || !finite(desired) {
        return None;
    }
    let error = desired * current.inverse();
    // scaled_axis picks the hemisphere with w >= 0, so the angle never exceeds π.
    let v = error.scaled_axis();
    v.iter().all(|c| c.is_finite()).then_some(v)
}

// ---------------------------------------------------------------------------
// OrientationPd
// ---------------------------------------------------------------------------

/// PD on the rotation error, one scalar controller per world axis.
#[derive(Clone, Debug)]
pub struct OrientationPd {
    axes: [PdController; 3],
}

impl OrientationPd {
    pub const fn new(kp: f64, kd: f64) -> Self {
        Self {
            axes: [
                PdController::new(kp, kd),
                PdController::new(kp, kd),
                PdController::new(kp, kd),
            ],
        }
    }

    pub const fn kp(&self) -> f64 {
        self.axes[0].kp
    }

    pub const fn kd(&self) -> f64 {
        self.axes[0].kd
    }
}

impl Drive for OrientationPd {
    fn drive(
        &mut self,
        current: &UnitQuaternion<f64>,
        desired: &UnitQuaternion<f64>,
        dt: f64,
    ) -> Option<Vector3<f64>> {
        let error = rotation_error(current, desired)?;
        let torque = Vector3::from_fn(|i, _| self.axes[i].compute(error[i], 0.0, dt));
        torque.iter().all(|c| c.is_finite()).then_some(torque)
    }

    fn reset(&mut self) {
        for axis in &mut self.axes {
            axis.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
