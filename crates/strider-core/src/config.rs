use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::PerLeg;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_stride_period() -> f64 {
    1.0
}
const fn default_ramp_rate() -> f64 {
    0.5
}
const fn default_control_dt() -> f64 {
    1.0 / 120.0
}
const fn default_max_substeps() -> u32 {
    10
}
const fn default_one() -> f64 {
    1.0
}
const fn default_curve_samples() -> usize {
    9
}
const fn default_step_length() -> [f64; 2] {
    [0.1, 0.0]
}
const fn default_orientation_kp() -> f64 {
    40.0
}
const fn default_orientation_kd() -> f64 {
    4.0
}
const fn default_push_interval() -> f64 {
    2.0
}
const fn default_push_magnitude() -> f64 {
    5.0
}
const fn default_wd() -> f64 {
    100.0
}
const fn default_wv() -> f64 {
    5.0
}
const fn default_wh() -> f64 {
    0.5
}
const fn default_wr() -> f64 {
    0.01
}
fn default_step_cycles() -> PerLeg<StepCycleConfig> {
    PerLeg::new(
        StepCycleConfig {
            trigger_offset: 0.0,
            duty_factor: 0.6,
        },
        StepCycleConfig {
            trigger_offset: 0.5,
            duty_factor: 0.6,
        },
    )
}
fn default_step_height() -> CurveConfig {
    CurveConfig::Shape {
        shape: CurveShape::HalfSin,
        samples: default_curve_samples(),
        scale: 0.1,
    }
}
fn default_swing_ease() -> CurveConfig {
    CurveConfig::Shape {
        shape: CurveShape::LinearIncreasing,
        samples: 2,
        scale: 1.0,
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("{value} is not finite"),
        })
    }
}

fn ensure_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("{value} must be >= 0"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// StriderConfig
// ---------------------------------------------------------------------------

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StriderConfig {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub sim: SimConfig,

    #[serde(default)]
    pub objective: ObjectiveWeights,
}

impl StriderConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        self.sim.validate()?;
        self.objective.validate()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// ControllerConfig
// ---------------------------------------------------------------------------

/// Everything the controller needs: gait timing, velocity goal, the joint
/// list and the leg frames wired onto it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub gait: GaitConfig,

    #[serde(default)]
    pub velocity: VelocityConfig,

    /// Physics joints in engine order.
    #[serde(default)]
    pub joints: Vec<JointConfig>,

    /// Leg frames in processing order. A frame naming another frame's
    /// joint as its `spine` should come after it.
    #[serde(default)]
    pub leg_frames: Vec<LegFrameConfig>,

    /// Joint tracked for head stability by the objective evaluator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gait.validate()?;
        self.velocity.validate()?;

        let mut names = HashSet::with_capacity(self.joints.len());
        for joint in &self.joints {
            if !names.insert(joint.name.as_str()) {
                return Err(ConfigError::DuplicateJoint(joint.name.clone()));
            }
            joint.drive.validate(&joint.name)?;
        }

        for frame in &self.leg_frames {
            frame.validate(&names)?;
        }

        match &self.head {
            Some(head) if !names.contains(head.as_str()) => Err(ConfigError::UnknownJoint {
                frame: "head".into(),
                joint: head.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Index of the joint called `name` in the joint list.
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }
}

// ---------------------------------------------------------------------------
// GaitConfig / VelocityConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitConfig {
    /// Seconds per full gait cycle (default: 1.0).
    #[serde(default = "default_stride_period")]
    pub stride_period: f64,

    /// Phase at reset, wrapped into `[0, 1)`.
    #[serde(default)]
    pub initial_phase: f64,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            stride_period: default_stride_period(),
            initial_phase: 0.0,
        }
    }
}

impl GaitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.stride_period.is_finite() || self.stride_period <= 0.0 {
            return Err(ConfigError::InvalidStridePeriod(self.stride_period));
        }
        ensure_finite("gait.initial_phase", self.initial_phase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityConfig {
    /// Desired travel velocity `[x, y, z]` in m/s (y is forward).
    #[serde(default)]
    pub goal: [f64; 3],

    /// Ramp acceleration in m/s^2 (default: 0.5).
    #[serde(default = "default_ramp_rate")]
    pub ramp_rate: f64,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            goal: [0.0; 3],
            ramp_rate: default_ramp_rate(),
        }
    }
}

impl VelocityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, v) in self.goal.iter().enumerate() {
            ensure_finite(&format!("velocity.goal[{i}]"), *v)?;
        }
        ensure_finite("velocity.ramp_rate", self.ramp_rate)?;
        if self.ramp_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "velocity.ramp_rate".into(),
                message: format!("{} must be > 0", self.ramp_rate),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Joints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    pub name: String,

    #[serde(default)]
    pub drive: DriveConfig,
}

impl JointConfig {
    pub fn new(name: impl Into<String>, drive: DriveConfig) -> Self {
        Self {
            name: name.into(),
            drive,
        }
    }
}

/// How a joint's raw torque is produced each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriveConfig {
    /// Orientation PD toward a fixed world rotation given as roll/pitch/yaw.
    Pd {
        kp: f64,
        kd: f64,
        #[serde(default)]
        target_rpy: [f64; 3],
    },
    /// Carries the joint's final torque from the previous frame.
    Feedback,
    /// No drive torque.
    #[default]
    Passive,
}

impl DriveConfig {
    pub fn validate(&self, joint: &str) -> Result<(), ConfigError> {
        if let Self::Pd {
            kp,
            kd,
            target_rpy,
        } = self
        {
            ensure_non_negative(&format!("{joint}.drive.kp"), *kp)?;
            ensure_non_negative(&format!("{joint}.drive.kd"), *kd)?;
            for v in target_rpy {
                ensure_finite(&format!("{joint}.drive.target_rpy"), *v)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Leg frames
// ---------------------------------------------------------------------------

/// Stance window of one leg within the gait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepCycleConfig {
    /// Phase at which stance begins, in `[0, 1)`.
    pub trigger_offset: f64,
    /// Fraction of the cycle spent in stance, in `(0, 1]`.
    pub duty_factor: f64,
}

impl StepCycleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.trigger_offset) {
            return Err(ConfigError::InvalidTriggerOffset(self.trigger_offset));
        }
        if !(self.duty_factor > 0.0 && self.duty_factor <= 1.0) {
            return Err(ConfigError::InvalidDutyFactor(self.duty_factor));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGainsConfig {
    #[serde(default = "default_orientation_kp")]
    pub kp: f64,
    #[serde(default = "default_orientation_kd")]
    pub kd: f64,
}

impl Default for PdGainsConfig {
    fn default() -> Self {
        Self {
            kp: default_orientation_kp(),
            kd: default_orientation_kd(),
        }
    }
}

/// Desired body orientation over the gait phase, in radians.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationCurvesConfig {
    #[serde(default)]
    pub yaw: CurveConfig,
    #[serde(default)]
    pub pitch: CurveConfig,
    #[serde(default)]
    pub roll: CurveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegFrameConfig {
    pub name: String,

    /// Joint whose body is the leg frame itself.
    pub joint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_hip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_hip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spine: Option<String>,

    #[serde(default = "default_step_cycles")]
    pub step_cycles: PerLeg<StepCycleConfig>,

    /// Nominal foot offset `[coronal, sagittal]` in frame space; the
    /// coronal part is mirrored per leg.
    #[serde(default = "default_step_length")]
    pub step_length: [f64; 2],

    #[serde(default = "default_one")]
    pub placement_velocity_scale: f64,

    #[serde(default)]
    pub ground_height: f64,

    #[serde(default)]
    pub orientation: OrientationCurvesConfig,

    #[serde(default = "default_step_height")]
    pub step_height: CurveConfig,

    #[serde(default = "default_swing_ease")]
    pub swing_ease: CurveConfig,

    #[serde(default)]
    pub orientation_pd: PdGainsConfig,
}

impl LegFrameConfig {
    /// A frame with default gait parameters and no neighbours.
    pub fn new(name: impl Into<String>, joint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint: joint.into(),
            left_hip: None,
            right_hip: None,
            spine: None,
            step_cycles: default_step_cycles(),
            step_length: default_step_length(),
            placement_velocity_scale: 1.0,
            ground_height: 0.0,
            orientation: OrientationCurvesConfig::default(),
            step_height: default_step_height(),
            swing_ease: default_swing_ease(),
            orientation_pd: PdGainsConfig::default(),
        }
    }

    /// Neighbour joint names paired with their role, absent ones skipped.
    pub fn neighbours(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("left_hip", self.left_hip.as_deref()),
            ("right_hip", self.right_hip.as_deref()),
            ("spine", self.spine.as_deref()),
        ]
        .into_iter()
        .filter_map(|(role, name)| name.map(|n| (role, n)))
    }

    fn validate(&self, joints: &HashSet<&str>) -> Result<(), ConfigError> {
        if self.joint.is_empty() {
            return Err(ConfigError::MissingField(format!("{}.joint", self.name)));
        }
        if !joints.contains(self.joint.as_str()) {
            return Err(ConfigError::UnknownJoint {
                frame: self.name.clone(),
                joint: self.joint.clone(),
            });
        }
        for (_, neighbour) in self.neighbours() {
            if neighbour == self.joint {
                return Err(ConfigError::SelfNeighbour(self.name.clone()));
            }
            if !joints.contains(neighbour) {
                return Err(ConfigError::UnknownJoint {
                    frame: self.name.clone(),
                    joint: neighbour.into(),
                });
            }
        }

        for (_, cycle) in self.step_cycles.iter() {
            cycle.validate()?;
        }
        ensure_finite(&format!("{}.step_length[0]", self.name), self.step_length[0])?;
        ensure_finite(&format!("{}.step_length[1]", self.name), self.step_length[1])?;
        ensure_finite(
            &format!("{}.placement_velocity_scale", self.name),
            self.placement_velocity_scale,
        )?;
        ensure_finite(&format!("{}.ground_height", self.name), self.ground_height)?;
        ensure_non_negative(&format!("{}.orientation_pd.kp", self.name), self.orientation_pd.kp)?;
        ensure_non_negative(&format!("{}.orientation_pd.kd", self.name), self.orientation_pd.kd)?;

        self.orientation.yaw.validate(&format!("{}.orientation.yaw", self.name))?;
        self.orientation.pitch.validate(&format!("{}.orientation.pitch", self.name))?;
        self.orientation.roll.validate(&format!("{}.orientation.roll", self.name))?;
        self.step_height.validate(&format!("{}.step_height", self.name))?;
        self.swing_ease.validate(&format!("{}.swing_ease", self.name))
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

/// Preset curve shapes over the unit phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    Flat,
    LinearIncreasing,
    LinearDecreasing,
    Sin,
    Cos,
    HalfSin,
}

impl CurveShape {
    /// Unscaled value of the shape at `t` in `[0, 1]`.
    #[must_use]
    pub fn value(self, t: f64) -> f64 {
        use std::f64::consts::{PI, TAU};
        match self {
            Self::Flat => 0.0,
            Self::LinearIncreasing => t,
            Self::LinearDecreasing => 1.0 - t,
            Self::Sin => (TAU * t).sin(),
            Self::Cos => (TAU * t).cos(),
            Self::HalfSin => (PI * t).sin(),
        }
    }
}

/// A piecewise-linear curve as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveConfig {
    /// Constant value.
    Flat {
        #[serde(default)]
        value: f64,
    },
    /// A preset shape sampled at `samples` evenly spaced knots and scaled.
    Shape {
        shape: CurveShape,
        #[serde(default = "default_curve_samples")]
        samples: usize,
        #[serde(default = "default_one")]
        scale: f64,
    },
    /// Explicit `[t, value]` knots with strictly increasing `t`.
    Points { points: Vec<[f64; 2]> },
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self::Flat { value: 0.0 }
    }
}

impl CurveConfig {
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidCurve {
            name: name.into(),
            message: message.into(),
        };
        match self {
            Self::Flat { value } => {
                if !value.is_finite() {
                    return Err(invalid("value is not finite"));
                }
            }
            Self::Shape { samples, scale, .. } => {
                if *samples < 2 {
                    return Err(invalid("a shape needs at least two samples"));
                }
                if !scale.is_finite() {
                    return Err(invalid("scale is not finite"));
                }
            }
            Self::Points { points } => {
                if points.is_empty() {
                    return Err(invalid("no knots"));
                }
                if points.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(invalid("knots must be finite"));
                }
                if points.windows(2).any(|w| w[1][0] <= w[0][0]) {
                    return Err(invalid("knot times must be strictly increasing"));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Headless simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed control timestep in seconds (default: 1/120).
    #[serde(default = "default_control_dt")]
    pub control_dt: f64,

    /// Maximum control steps per rendered frame (default: 10).
    #[serde(default = "default_max_substeps")]
    pub max_substeps: u32,

    /// Master random seed.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub push: PushConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            control_dt: default_control_dt(),
            max_substeps: default_max_substeps(),
            seed: 0,
            push: PushConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.control_dt.is_finite() || self.control_dt <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "sim.control_dt".into(),
                message: format!("{} must be > 0", self.control_dt),
            });
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sim.max_substeps".into(),
                message: "must be at least 1".into(),
            });
        }
        self.push.validate()
    }

    /// Control rate in Hz.
    #[must_use]
    pub fn control_hz(&self) -> f64 {
        1.0 / self.control_dt
    }
}

/// Random horizontal torque impulses applied to the first leg frame body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between pushes (default: 2.0).
    #[serde(default = "default_push_interval")]
    pub interval: f64,

    /// Peak torque magnitude in N·m (default: 5.0).
    #[serde(default = "default_push_magnitude")]
    pub magnitude: f64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: default_push_interval(),
            magnitude: default_push_magnitude(),
        }
    }
}

impl PushConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("sim.push.magnitude", self.magnitude)?;
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "sim.push.interval".into(),
                message: format!("{} must be > 0", self.interval),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ObjectiveWeights
// ---------------------------------------------------------------------------

/// Weights of the movement-quality objective terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Height deviation (default: 100).
    #[serde(default = "default_wd")]
    pub wd: f64,
    /// Velocity tracking (default: 5).
    #[serde(default = "default_wv")]
    pub wv: f64,
    /// Head acceleration (default: 0.5).
    #[serde(default = "default_wh")]
    pub wh: f64,
    /// Orientation error (default: 0.01).
    #[serde(default = "default_wr")]
    pub wr: f64,
    /// Forward progress reward (default: 0).
    #[serde(default)]
    pub wp: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            wd: default_wd(),
            wv: default_wv(),
            wh: default_wh(),
            wr: default_wr(),
            wp: 0.0,
        }
    }
}

impl ObjectiveWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("objective.wd", self.wd)?;
        ensure_non_negative("objective.wv", self.wv)?;
        ensure_non_negative("objective.wh", self.wh)?;
        ensure_non_negative("objective.wr", self.wr)?;
        ensure_non_negative("objective.wp", self.wp)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn biped_toml() -> &'static str {
        r#"
            [controller.gait]
            stride_period = 0.8

            [controller.velocity]
            goal = [0.0, 0.6, 0.0]

            [[controller.joints]]
            name = "pelvis"
            drive = { kind = "feedback" }

            [[controller.joints]]
            name = "hip_l"
            drive = { kind = "feedback" }

            [[controller.joints]]
            name = "hip_r"
            drive = { kind = "feedback" }

            [[controller.joints]]
            name = "knee_l"
            drive = { kind = "pd", kp = 30.0, kd = 2.0 }

            [[controller.leg_frames]]
            name = "hips"
            joint = "pelvis"
            left_hip = "hip_l"
            right_hip = "hip_r"
            step_cycles.left = { trigger_offset = 0.0, duty_factor = 0.5 }
            step_cycles.right = { trigger_offset = 0.5, duty_factor = 0.5 }
            step_height = { kind = "points", points = [[0.0, 0.0], [0.5, 0.1], [1.0, 0.0]] }
            orientation.pitch = { kind = "shape", shape = "sin", scale = 0.05 }
        "#
    }

    #[test]
    fn default_config_is_valid() {
        let config = StriderConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.controller.gait.stride_period, 1.0);
        assert_relative_eq!(config.controller.velocity.ramp_rate, 0.5);
        assert_relative_eq!(config.sim.control_dt, 1.0 / 120.0);
    }

    #[test]
    fn default_objective_weights() {
        let w = ObjectiveWeights::default();
        assert_relative_eq!(w.wd, 100.0);
        assert_relative_eq!(w.wv, 5.0);
        assert_relative_eq!(w.wh, 0.5);
        assert_relative_eq!(w.wr, 0.01);
        assert_relative_eq!(w.wp, 0.0);
    }

    #[test]
    fn parse_biped_toml() {
        let config = StriderConfig::from_toml_str(biped_toml()).unwrap();
        let ctrl = &config.controller;
        assert_eq!(ctrl.joints.len(), 4);
        assert_eq!(ctrl.joints[0].drive, DriveConfig::Feedback);
        assert_eq!(
            ctrl.joints[3].drive,
            DriveConfig::Pd {
                kp: 30.0,
                kd: 2.0,
                target_rpy: [0.0; 3]
            }
        );
        let frame = &ctrl.leg_frames[0];
        assert_eq!(frame.left_hip.as_deref(), Some("hip_l"));
        assert!(frame.spine.is_none());
        assert_relative_eq!(frame.step_cycles.right.trigger_offset, 0.5);
        assert_relative_eq!(frame.placement_velocity_scale, 1.0);
        assert!(matches!(
            frame.orientation.pitch,
            CurveConfig::Shape {
                shape: CurveShape::Sin,
                samples: 9,
                ..
            }
        ));
        assert_eq!(frame.orientation.yaw, CurveConfig::Flat { value: 0.0 });
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let config = StriderConfig::from_toml_str(biped_toml()).unwrap();
        let text = config.to_toml().unwrap();
        let back = StriderConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn duplicate_joint_rejected() {
        let mut config = StriderConfig::from_toml_str(biped_toml()).unwrap();
        config
            .controller
            .joints
            .push(JointConfig::new("hip_l", DriveConfig::Passive));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateJoint(name)) if name == "hip_l"
        ));
    }

    #[test]
    fn unknown_neighbour_rejected() {
        let mut config = StriderConfig::from_toml_str(biped_toml()).unwrap();
        config.controller.leg_frames[0].spine = Some("torso".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownJoint { joint, .. }) if joint == "torso"
        ));
    }

    #[test]
    fn self_neighbour_rejected() {
        let mut config = StriderConfig::from_toml_str(biped_toml()).unwrap();
        config.controller.leg_frames[0].left_hip = Some("pelvis".into());
        assert!(matches!(config.validate(), Err(ConfigError::SelfNeighbour(_))));
    }

    #[test]
    fn step_cycle_ranges() {
        let ok = StepCycleConfig {
            trigger_offset: 0.99,
            duty_factor: 1.0,
        };
        assert!(ok.validate().is_ok());
        let bad_trigger = StepCycleConfig {
            trigger_offset: 1.0,
            duty_factor: 0.5,
        };
        assert!(matches!(
            bad_trigger.validate(),
            Err(ConfigError::InvalidTriggerOffset(_))
        ));
        let bad_duty = StepCycleConfig {
            trigger_offset: 0.0,
            duty_factor: 0.0,
        };
        assert!(matches!(
            bad_duty.validate(),
            Err(ConfigError::InvalidDutyFactor(_))
        ));
        let nan_duty = StepCycleConfig {
            trigger_offset: 0.0,
            duty_factor: f64::NAN,
        };
        assert!(nan_duty.validate().is_err());
    }

    #[test]
    fn curve_validation() {
        assert!(CurveConfig::Points { points: vec![] }.validate("c").is_err());
        assert!(
            CurveConfig::Points {
                points: vec![[0.5, 1.0], [0.5, 2.0]]
            }
            .validate("c")
            .is_err()
        );
        assert!(
            CurveConfig::Shape {
                shape: CurveShape::Cos,
                samples: 1,
                scale: 1.0
            }
            .validate("c")
            .is_err()
        );
        assert!(
            CurveConfig::Points {
                points: vec![[0.0, 1.0], [1.0, 2.0]]
            }
            .validate("c")
            .is_ok()
        );
    }

    #[test]
    fn curve_shape_values() {
        assert_relative_eq!(CurveShape::HalfSin.value(0.5), 1.0);
        assert_relative_eq!(CurveShape::Cos.value(0.0), 1.0);
        assert_relative_eq!(CurveShape::LinearDecreasing.value(0.25), 0.75);
        assert_relative_eq!(CurveShape::Flat.value(0.3), 0.0);
    }

    #[test]
    fn invalid_stride_period() {
        let gait = GaitConfig {
            stride_period: 0.0,
            initial_phase: 0.0,
        };
        assert!(matches!(
            gait.validate(),
            Err(ConfigError::InvalidStridePeriod(_))
        ));
    }

    #[test]
    fn invalid_ramp_rate() {
        let vel = VelocityConfig {
            goal: [0.0; 3],
            ramp_rate: -1.0,
        };
        assert!(vel.validate().is_err());
    }

    #[test]
    fn sim_config_rejects_zero_dt() {
        let sim = SimConfig {
            control_dt: 0.0,
            ..SimConfig::default()
        };
        assert!(sim.validate().is_err());
    }

    #[test]
    fn unknown_head_rejected() {
        let mut config = StriderConfig::from_toml_str(biped_toml()).unwrap();
        config.controller.head = Some("skull".into());
        assert!(config.validate().is_err());
        config.controller.head = Some("pelvis".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = StriderConfig::from_file("/nonexistent/strider.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
