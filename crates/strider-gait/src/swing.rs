//! Foot placement geometry: nominal foot point, velocity-corrected strike
//! target and the swing trajectory between lift and strike.

use nalgebra::{Point3, Vector3};
use strider_core::types::{Leg, up};

/// Nominal foot position in leg-frame space: `(mirror·coronal, sagittal, 0)`.
pub fn nominal_foot_local(leg: Leg, step_length: [f64; 2]) -> Point3<f64> {
    Point3::new(leg.mirror() * step_length[0], step_length[1], 0.0)
}

/// Strike target for the next touchdown.
///
/// Shifts the nominal point by the velocity error scaled by
/// `placement_scale` and projects it onto the ground plane
/// `z = ground_height`. Moving faster than desired steps further ahead.
pub fn strike_target(
    nominal: &Point3<f64>,
    current_velocity: &Vector3<f64>,
    desired_velocity: &Vector3<f64>,
    placement_scale: f64,
    ground_height: f64,
) -> Point3<f64> {
    let mut target = nominal + (current_velocity - desired_velocity) * placement_scale;
    target.z = ground_height;
    target
}

/// Foot position during swing.
///
/// `ease` moves the ground point from `lift` to `strike`; `height` raises it
/// along the world up axis.
pub fn swing_foot_position(
    lift: &Point3<f64>,
    strike: &Point3<f64>,
    ease: f64,
    height: f64,
) -> Point3<f64> {
    let ground = lift + (strike - lift) * ease;
    ground + up() * height
}
