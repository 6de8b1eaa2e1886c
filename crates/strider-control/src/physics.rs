//! Interface to the rigid-body engine.
//!
//! The controller only reads body poses and submits torques; integration is
//! the engine's business.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use strider_core::types::JointId;

/// Body access the controller needs from a physics engine.
///
/// Joint ids index the engine's joint list; each joint owns the body whose
/// pose is reported.
pub trait PhysicsBackend {
    /// Human-readable engine name.
    fn name(&self) -> &str;

    /// Number of joints, matching the configured joint list.
    fn joint_count(&self) -> usize;

    /// World rotation of the joint's body.
    fn rotation(&self, joint: JointId) -> UnitQuaternion<f64>;

    /// Map a point from the joint body's local space into world space.
    fn transform_point(&self, joint: JointId, local: &Point3<f64>) -> Point3<f64>;

    /// Queue a world-frame torque on the joint's body for the next
    /// integration step.
    fn apply_torque(&mut self, joint: JointId, torque: Vector3<f64>);

    /// World origin of the joint's body.
    fn position(&self, joint: JointId) -> Point3<f64> {
        self.transform_point(joint, &Point3::origin())
    }

    /// Linear velocity of the joint's body. Engines without velocity
    /// tracking report zero.
    fn linear_velocity(&self, _joint: JointId) -> Vector3<f64> {
        Vector3::zeros()
    }
}
