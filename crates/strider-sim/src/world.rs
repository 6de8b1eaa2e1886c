//! Minimal rigid-body backend.
//!
//! Bodies are independent rotors hung off a kinematic root: each has a pose
//! relative to the root, an angular velocity, a scalar inertia and linear
//! angular damping. Torques accumulate between [`RigidWorld::integrate`]
//! calls, which advance every body with semi-implicit Euler and then clear
//! them. The root translates at a commanded velocity.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use strider_control::physics::PhysicsBackend;
use strider_core::types::JointId;

const fn default_inertia() -> f64 {
    1.0
}
const fn default_damping() -> f64 {
    4.0
}

// ---------------------------------------------------------------------------
// BodySpec
// ---------------------------------------------------------------------------

/// Initial layout of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    /// Position relative to the root at rest.
    pub offset: [f64; 3],
    #[serde(default = "default_inertia")]
    pub inertia: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
}

impl BodySpec {
    pub fn new(name: impl Into<String>, offset: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            offset,
            inertia: default_inertia(),
            damping: default_damping(),
        }
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub offset: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub angular_velocity: Vector3<f64>,
    pub inertia: f64,
    pub damping: f64,
    torque: Vector3<f64>,
}

impl Body {
    fn from_spec(spec: &BodySpec) -> Self {
        Self {
            name: spec.name.clone(),
            offset: Vector3::from(spec.offset),
            rotation: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
            inertia: spec.inertia,
            damping: spec.damping,
            torque: Vector3::zeros(),
        }
    }

    /// Torque accumulated since the last integration.
    pub const fn pending_torque(&self) -> Vector3<f64> {
        self.torque
    }

    fn integrate(&mut self, dt: f64) {
        let alpha = (self.torque - self.angular_velocity * self.damping) / self.inertia;
        self.angular_velocity += alpha * dt;
        self.rotation = UnitQuaternion::from_scaled_axis(self.angular_velocity * dt) * self.rotation;
        self.torque = Vector3::zeros();
    }
}

// ---------------------------------------------------------------------------
// RigidWorld
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RigidWorld {
    bodies: Vec<Body>,
    root: Point3<f64>,
    root_velocity: Vector3<f64>,
}

impl RigidWorld {
    pub fn new(specs: &[BodySpec]) -> Self {
        Self {
            bodies: specs.iter().map(Body::from_spec).collect(),
            root: Point3::origin(),
            root_velocity: Vector3::zeros(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, joint: JointId) -> Option<&Body> {
        self.bodies.get(joint.index())
    }

    pub fn body_mut(&mut self, joint: JointId) -> Option<&mut Body> {
        self.bodies.get_mut(joint.index())
    }

    pub const fn root(&self) -> Point3<f64> {
        self.root
    }

    pub const fn root_velocity(&self) -> Vector3<f64> {
        self.root_velocity
    }

    /// Commanded root velocity, applied on every integration.
    pub const fn set_root_velocity(&mut self, velocity: Vector3<f64>) {
        self.root_velocity = velocity;
    }

    /// Advance every body by `dt` and clear accumulated torques.
    pub fn integrate(&mut self, dt: f64) {
        for body in &mut self.bodies {
            body.integrate(dt);
        }
        self.root += self.root_velocity * dt;
    }

    /// Largest angular speed over all bodies.
    pub fn max_angular_speed(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.angular_velocity.norm())
            .fold(0.0, f64::max)
    }

    /// Every pose, velocity and pending torque is finite.
    pub fn is_finite(&self) -> bool {
        self.root.iter().all(|c| c.is_finite())
            && self.bodies.iter().all(|b| {
                b.rotation.coords.iter().all(|c| c.is_finite())
                    && b.angular_velocity.iter().all(|c| c.is_finite())
                    && b.torque.iter().all(|c| c.is_finite())
            })
    }

    /// Back to the rest pose at the origin.
    pub fn reset(&mut self) {
        self.root = Point3::origin();
        self.root_velocity = Vector3::zeros();
        for body in &mut self.bodies {
            body.rotation = UnitQuaternion::identity();
            body.angular_velocity = Vector3::zeros();
            body.torque = Vector3::zeros();
        }
    }
}

impl PhysicsBackend for RigidWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "rigid"
    }

    fn joint_count(&self) -> usize {
        self.bodies.len()
    }

    fn rotation(&self, joint: JointId) -> UnitQuaternion<f64> {
        self.body(joint)
            .map_or_else(UnitQuaternion::identity, |b| b.rotation)
    }

    fn transform_point(&self, joint: JointId, local: &Point3<f64>) -> Point3<f64> {
        match self.body(joint) {
            Some(b) => self.root + b.offset + b.rotation * local.coords,
            None => self.root + local.coords,
        }
    }

    fn apply_torque(&mut self, joint: JointId, torque: Vector3<f64>) {
        if let Some(body) = self.body_mut(joint) {
            body.torque += torque;
        }
    }

    fn linear_velocity(&self, _joint: JointId) -> Vector3<f64> {
        self.root_velocity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
