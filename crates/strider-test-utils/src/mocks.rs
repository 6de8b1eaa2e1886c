//! Mock implementations of core traits for testing.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use strider_control::physics::PhysicsBackend;
use strider_control::virtual_force::VirtualForceModel;
use strider_core::types::JointId;

// ---------------------------------------------------------------------------
// RecordingPhysics
// ---------------------------------------------------------------------------

/// A physics backend with settable body poses that records every submitted
/// torque.
#[derive(Clone, Debug)]
pub struct RecordingPhysics {
    rotations: Vec<UnitQuaternion<f64>>,
    positions: Vec<Point3<f64>>,
    velocities: Vec<Vector3<f64>>,
    applied: Vec<(JointId, Vector3<f64>)>,
}

impl RecordingPhysics {
    /// `n` bodies at the origin with identity rotation.
    pub fn new(n: usize) -> Self {
        Self {
            rotations: vec![UnitQuaternion::identity(); n],
            positions: vec![Point3::origin(); n],
            velocities: vec![Vector3::zeros(); n],
            applied: Vec::new(),
        }
    }

    /// Every body lifted to `height` above the ground.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        for p in &mut self.positions {
            p.z = height;
        }
        self
    }

    pub fn set_rotation(&mut self, joint: JointId, rotation: UnitQuaternion<f64>) {
        self.rotations[joint.index()] = rotation;
    }

    pub fn set_position(&mut self, joint: JointId, position: Point3<f64>) {
        self.positions[joint.index()] = position;
    }

    pub fn set_velocity(&mut self, joint: JointId, velocity: Vector3<f64>) {
        self.velocities[joint.index()] = velocity;
    }

    /// Every `(joint, torque)` submitted so far, in call order.
    pub fn applied(&self) -> &[(JointId, Vector3<f64>)] {
        &self.applied
    }

    /// Torques submitted for `joint`, in call order.
    pub fn applied_for(&self, joint: JointId) -> Vec<Vector3<f64>> {
        self.applied
            .iter()
            .filter(|(j, _)| *j == joint)
            .map(|(_, t)| *t)
            .collect()
    }

    pub fn clear_applied(&mut self) {
        self.applied.clear();
    }
}

impl PhysicsBackend for RecordingPhysics {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "recording"
    }

    fn joint_count(&self) -> usize {
        self.rotations.len()
    }

    fn rotation(&self, joint: JointId) -> UnitQuaternion<f64> {
        self.rotations[joint.index()]
    }

    fn transform_point(&self, joint: JointId, local: &Point3<f64>) -> Point3<f64> {
        self.positions[joint.index()] + self.rotations[joint.index()] * local.coords
    }

    fn apply_torque(&mut self, joint: JointId, torque: Vector3<f64>) {
        self.applied.push((joint, torque));
    }

    fn linear_velocity(&self, joint: JointId) -> Vector3<f64> {
        self.velocities[joint.index()]
    }
}

// ---------------------------------------------------------------------------
// FixedVirtualForces
// ---------------------------------------------------------------------------

/// Returns a fixed torque per joint regardless of phase; joints past the end
/// get zero.
#[derive(Clone, Debug, Default)]
pub struct FixedVirtualForces {
    pub torques: Vec<Vector3<f64>>,
}

impl FixedVirtualForces {
    pub fn new(torques: Vec<Vector3<f64>>) -> Self {
        Self { torques }
    }
}

impl VirtualForceModel for FixedVirtualForces {
    fn torque(&self, joint: JointId, _phase: f64, _physics: &dyn PhysicsBackend) -> Vector3<f64> {
        self.torques.get(joint.index()).copied().unwrap_or_else(Vector3::zeros)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
