//! Joint graph: configuration names resolved once into [`JointId`] handles.

use std::collections::HashMap;

use nalgebra::{UnitQuaternion, Vector3};
use strider_core::config::{DriveConfig, JointConfig, LegFrameConfig};
use strider_core::error::ConfigError;
use strider_core::types::{JointId, JointTorques, Leg, PerLeg};
use strider_drive::prelude::*;

use crate::physics::PhysicsBackend;

// ---------------------------------------------------------------------------
// JointDrive
// ---------------------------------------------------------------------------

/// Source of a joint's raw torque each frame.
#[derive(Clone, Debug)]
pub enum JointDrive {
    /// Orientation PD toward a fixed world rotation.
    Pd {
        pd: OrientationPd,
        target: UnitQuaternion<f64>,
    },
    /// The joint's final torque from the previous frame.
    Feedback,
    /// Always zero.
    Passive,
}

impl JointDrive {
    pub fn from_config(config: &DriveConfig) -> Self {
        match *config {
            DriveConfig::Pd {
                kp,
                kd,
                target_rpy: [roll, pitch, yaw],
            } => Self::Pd {
                pd: OrientationPd::new(kp, kd),
                target: yaw_pitch_roll(yaw, pitch, roll),
            },
            DriveConfig::Feedback => Self::Feedback,
            DriveConfig::Passive => Self::Passive,
        }
    }

    /// Raw torque for `joint`. A degenerate PD error yields zero and clears
    /// the PD memory.
    pub fn torque(
        &mut self,
        joint: JointId,
        previous: &JointTorques,
        physics: &dyn PhysicsBackend,
        dt: f64,
    ) -> Vector3<f64> {
        match self {
            Self::Pd { pd, target } => {
                let current = physics.rotation(joint);
                pd.drive(&current, target, dt).unwrap_or_else(|| {
                    pd.reset();
                    Vector3::zeros()
                })
            }
            Self::Feedback => previous.get_or_zero(Some(joint)),
            Self::Passive => Vector3::zeros(),
        }
    }

    pub fn reset(&mut self) {
        if let Self::Pd { pd, .. } = self {
            pd.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// LegFrameJoints
// ---------------------------------------------------------------------------

/// Resolved joint wiring of one leg frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegFrameJoints {
    /// The frame's own torque-bearing node.
    pub joint: JointId,
    pub hips: PerLeg<Option<JointId>>,
    pub spine: Option<JointId>,
}

impl LegFrameJoints {
    pub const fn new(joint: JointId) -> Self {
        Self {
            joint,
            hips: PerLeg::new(None, None),
            spine: None,
        }
    }

    #[must_use]
    pub const fn with_hip(mut self, leg: Leg, hip: JointId) -> Self {
        match leg {
            Leg::Left => self.hips.left = Some(hip),
            Leg::Right => self.hips.right = Some(hip),
        }
        self
    }

    #[must_use]
    pub const fn with_spine(mut self, spine: JointId) -> Self {
        self.spine = Some(spine);
        self
    }

    /// Hip joint of `leg`, if any.
    pub fn hip(&self, leg: Leg) -> Option<JointId> {
        self.hips[leg]
    }
}

// ---------------------------------------------------------------------------
// JointGraph
// ---------------------------------------------------------------------------

/// Arena of physics joints in engine order with their drives.
#[derive(Clone, Debug)]
pub struct JointGraph {
    names: Vec<String>,
    index: HashMap<String, JointId>,
    drives: Vec<JointDrive>,
}

impl JointGraph {
    pub fn from_config(joints: &[JointConfig]) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(joints.len());
        for (i, joint) in joints.iter().enumerate() {
            if index.insert(joint.name.clone(), JointId(i)).is_some() {
                return Err(ConfigError::DuplicateJoint(joint.name.clone()));
            }
        }
        Ok(Self {
            names: joints.iter().map(|j| j.name.clone()).collect(),
            index,
            drives: joints
                .iter()
                .map(|j| JointDrive::from_config(&j.drive))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<JointId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, joint: JointId) -> Option<&str> {
        self.names.get(joint.index()).map(String::as_str)
    }

    /// Joint names in engine order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Resolve `name` for leg frame `frame`.
    pub fn resolve(&self, frame: &str, name: &str) -> Result<JointId, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::UnknownJoint {
            frame: frame.into(),
            joint: name.into(),
        })
    }

    /// Resolve a leg frame's own joint and neighbours.
    pub fn resolve_frame(&self, config: &LegFrameConfig) -> Result<LegFrameJoints, ConfigError> {
        let resolve_opt = |name: &Option<String>| {
            name.as_deref()
                .map(|n| self.resolve(&config.name, n))
                .transpose()
        };
        let joints = LegFrameJoints {
            joint: self.resolve(&config.name, &config.joint)?,
            hips: PerLeg::new(resolve_opt(&config.left_hip)?, resolve_opt(&config.right_hip)?),
            spine: resolve_opt(&config.spine)?,
        };
        let neighbours = [joints.hips.left, joints.hips.right, joints.spine];
        if neighbours.contains(&Some(joints.joint)) {
            return Err(ConfigError::SelfNeighbour(config.name.clone()));
        }
        Ok(joints)
    }

    pub fn drives_mut(&mut self) -> impl Iterator<Item = (JointId, &mut JointDrive)> {
        self.drives
            .iter_mut()
            .enumerate()
            .map(|(i, d)| (JointId(i), d))
    }

    pub fn reset_drives(&mut self) {
        for drive in &mut self.drives {
            drive.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
