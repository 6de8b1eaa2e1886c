//! Extension point for virtual-force (ground-reaction based) torques.

use nalgebra::Vector3;
use strider_core::types::JointId;

use crate::physics::PhysicsBackend;

/// Extra per-joint torque summed into the raw torques each frame.
pub trait VirtualForceModel: Send + Sync {
    fn torque(&self, joint: JointId, phase: f64, physics: &dyn PhysicsBackend) -> Vector3<f64>;
}

/// Contributes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVirtualForces;

impl VirtualForceModel for NoVirtualForces {
    fn torque(&self, _joint: JointId, _phase: f64, _physics: &dyn PhysicsBackend) -> Vector3<f64> {
        Vector3::zeros()
    }
}
