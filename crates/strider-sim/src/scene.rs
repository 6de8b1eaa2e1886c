//! Scene presets: a controller configuration paired with a body layout.

use std::path::Path;

use strider_core::config::{
    ControllerConfig, CurveConfig, CurveShape, DriveConfig, GaitConfig, JointConfig,
    LegFrameConfig, StepCycleConfig, StriderConfig, VelocityConfig,
};
use strider_core::error::ConfigError;
use strider_core::types::PerLeg;

use crate::world::{BodySpec, RigidWorld};

/// Names accepted by [`preset`].
pub const PRESETS: &[&str] = &["biped", "quadruped"];

/// Rest height of bodies in scenes loaded from a bare configuration.
const DEFAULT_BODY_HEIGHT: f64 = 1.0;

/// A runnable setup: configuration plus one body per configured joint, in
/// joint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub config: StriderConfig,
    pub bodies: Vec<BodySpec>,
}

impl Scene {
    /// Scene for an arbitrary configuration, every body at rest height
    /// above the root.
    pub fn from_config(name: impl Into<String>, config: StriderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bodies = config
            .controller
            .joints
            .iter()
            .map(|j| BodySpec::new(j.name.clone(), [0.0, 0.0, DEFAULT_BODY_HEIGHT]))
            .collect();
        Ok(Self {
            name: name.into(),
            config,
            bodies,
        })
    }

    /// Load a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = StriderConfig::from_file(path)?;
        Self::from_config(path.display().to_string(), config)
    }

    pub fn build_world(&self) -> RigidWorld {
        RigidWorld::new(&self.bodies)
    }
}

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<Scene> {
    match name {
        "biped" => Some(biped()),
        "quadruped" => Some(quadruped()),
        _ => None,
    }
}

fn cycles(left: f64, right: f64, duty_factor: f64) -> PerLeg<StepCycleConfig> {
    PerLeg::new(
        StepCycleConfig {
            trigger_offset: left,
            duty_factor,
        },
        StepCycleConfig {
            trigger_offset: right,
            duty_factor,
        },
    )
}

fn pd(kp: f64, kd: f64, pitch: f64) -> DriveConfig {
    DriveConfig::Pd {
        kp,
        kd,
        target_rpy: [0.0, pitch, 0.0],
    }
}

fn sway(scale: f64) -> CurveConfig {
    CurveConfig::Shape {
        shape: CurveShape::Sin,
        samples: 9,
        scale,
    }
}

/// One leg frame on the pelvis with hips and knees, plus a passive head.
pub fn biped() -> Scene {
    let joints = vec![
        JointConfig::new("pelvis", DriveConfig::Passive),
        JointConfig::new("hip_l", pd(30.0, 3.0, 0.0)),
        JointConfig::new("hip_r", pd(30.0, 3.0, 0.0)),
        JointConfig::new("knee_l", pd(20.0, 2.0, 0.15)),
        JointConfig::new("knee_r", pd(20.0, 2.0, 0.15)),
        JointConfig::new("head", DriveConfig::Passive),
    ];
    let bodies = vec![
        BodySpec::new("pelvis", [0.0, 0.0, 0.95]),
        BodySpec::new("hip_l", [-0.1, 0.0, 0.75]),
        BodySpec::new("hip_r", [0.1, 0.0, 0.75]),
        BodySpec::new("knee_l", [-0.1, 0.0, 0.35]),
        BodySpec::new("knee_r", [0.1, 0.0, 0.35]),
        BodySpec {
            inertia: 0.5,
            ..BodySpec::new("head", [0.0, 0.0, 1.6])
        },
    ];

    let mut hips = LegFrameConfig::new("hips", "pelvis");
    hips.left_hip = Some("hip_l".into());
    hips.right_hip = Some("hip_r".into());
    hips.step_cycles = cycles(0.0, 0.5, 0.6);
    hips.step_length = [0.1, 0.0];
    hips.placement_velocity_scale = 0.3;
    hips.orientation.roll = sway(0.03);

    Scene {
        name: "biped".into(),
        config: StriderConfig {
            controller: ControllerConfig {
                gait: GaitConfig {
                    stride_period: 0.8,
                    initial_phase: 0.0,
                },
                velocity: VelocityConfig {
                    goal: [0.0, 0.6, 0.0],
                    ramp_rate: 0.5,
                },
                joints,
                leg_frames: vec![hips],
                head: Some("head".into()),
            },
            ..StriderConfig::default()
        },
        bodies,
    }
}

/// Front and rear leg frames joined through the chest; the rear frame takes
/// the front frame's body as its spine, so the front frame runs first.
pub fn quadruped() -> Scene {
    let joints = vec![
        JointConfig::new("chest", DriveConfig::Passive),
        JointConfig::new("shoulder_l", pd(25.0, 2.5, 0.0)),
        JointConfig::new("shoulder_r", pd(25.0, 2.5, 0.0)),
        JointConfig::new("pelvis", DriveConfig::Passive),
        JointConfig::new("hip_l", pd(25.0, 2.5, 0.0)),
        JointConfig::new("hip_r", pd(25.0, 2.5, 0.0)),
        JointConfig::new("neck", DriveConfig::Passive),
    ];
    let bodies = vec![
        BodySpec::new("chest", [0.0, 0.35, 0.6]),
        BodySpec::new("shoulder_l", [-0.15, 0.35, 0.45]),
        BodySpec::new("shoulder_r", [0.15, 0.35, 0.45]),
        BodySpec::new("pelvis", [0.0, -0.35, 0.6]),
        BodySpec::new("hip_l", [-0.15, -0.35, 0.45]),
        BodySpec::new("hip_r", [0.15, -0.35, 0.45]),
        BodySpec {
            inertia: 0.3,
            ..BodySpec::new("neck", [0.0, 0.55, 0.8])
        },
    ];

    let mut front = LegFrameConfig::new("shoulders", "chest");
    front.left_hip = Some("shoulder_l".into());
    front.right_hip = Some("shoulder_r".into());
    front.step_cycles = cycles(0.25, 0.75, 0.6);
    front.step_length = [0.15, 0.0];
    front.placement_velocity_scale = 0.3;

    let mut rear = LegFrameConfig::new("hips", "pelvis");
    rear.left_hip = Some("hip_l".into());
    rear.right_hip = Some("hip_r".into());
    rear.spine = Some("chest".into());
    rear.step_cycles = cycles(0.0, 0.5, 0.6);
    rear.step_length = [0.15, 0.0];
    rear.placement_velocity_scale = 0.3;
    rear.orientation.pitch = sway(0.02);

    Scene {
        name: "quadruped".into(),
        config: StriderConfig {
            controller: ControllerConfig {
                gait: GaitConfig {
                    stride_period: 1.0,
                    initial_phase: 0.0,
                },
                velocity: VelocityConfig {
                    goal: [0.0, 0.8, 0.0],
                    ramp_rate: 0.5,
                },
                joints,
                leg_frames: vec![front, rear],
                head: Some("neck".into()),
            },
            ..StriderConfig::default()
        },
        bodies,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
