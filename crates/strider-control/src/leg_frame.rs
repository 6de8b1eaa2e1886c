//! A row of two mirrored legs: foot planning and torque balancing.
//!
//! Balancing, once per frame:
//!
//! ```text
//! t_stance = Σ τ[hip(l)], l ∈ stance       t_swing = Σ τ[hip(l)], l ∈ swing
//! t_spine  = τ[spine] or 0
//! τ[frame] = t_lf = t_stance + t_swing + t_spine
//! td_lf    = PD(current rotation → desired rotation at phase)
//! τ[hip(l)] = (td_lf - t_swing - t_spine) / N   for every l ∈ stance, N = |stance|
//! ```

use nalgebra::{UnitQuaternion, Vector3};
use strider_core::config::LegFrameConfig;
use strider_core::error::ConfigError;
use strider_core::types::{JointTorques, Leg, PerLeg};
use strider_drive::prelude::*;
use strider_gait::prelude::*;
use tracing::trace;

use crate::foot::{FootPlacement, FootState};
use crate::joints::LegFrameJoints;
use crate::physics::PhysicsBackend;

// ---------------------------------------------------------------------------
// OrientationCurves
// ---------------------------------------------------------------------------

/// Desired yaw, pitch and roll of the frame body over the gait phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrientationCurves {
    pub yaw: PiecewiseLinear,
    pub pitch: PiecewiseLinear,
    pub roll: PiecewiseLinear,
}

impl OrientationCurves {
    /// `Rz(yaw) · Rx(pitch) · Ry(roll)` at `phase`.
    pub fn orientation_at(&self, phase: f64) -> UnitQuaternion<f64> {
        yaw_pitch_roll(
            self.yaw.value_at(phase),
            self.pitch.value_at(phase),
            self.roll.value_at(phase),
        )
    }
}

// ---------------------------------------------------------------------------
// BalanceOutcome
// ---------------------------------------------------------------------------

/// Why a balancing pass skipped redistribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceIssue {
    /// No leg in stance had a hip joint to take the correction.
    NoStanceLegs,
    /// The body rotation or desired torque was non-finite.
    DegenerateOrientation,
}

/// Values computed by one balancing pass.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceOutcome {
    pub stance: PerLeg<bool>,
    pub stance_count: usize,
    /// Stance legs with a hip joint; the correction is split between these.
    pub stance_hips: usize,
    pub t_stance: Vector3<f64>,
    pub t_swing: Vector3<f64>,
    pub t_spine: Vector3<f64>,
    /// Aggregate written at the frame's own joint.
    pub t_lf: Vector3<f64>,
    /// Desired aggregate from the orientation PD, if it could be formed.
    pub td_lf: Option<Vector3<f64>>,
    /// Torque written to each stance hip, if redistribution ran.
    pub share: Option<Vector3<f64>>,
    pub issue: Option<BalanceIssue>,
}

impl BalanceOutcome {
    /// Redistribution ran without issue.
    pub const fn is_balanced(&self) -> bool {
        self.share.is_some()
    }
}

// ---------------------------------------------------------------------------
// LegFrame
// ---------------------------------------------------------------------------

/// A torque-bearing body carrying a left and a right leg.
pub struct LegFrame {
    name: String,
    joints: LegFrameJoints,
    step_cycles: PerLeg<StepCycle>,
    step_length: [f64; 2],
    placement_scale: f64,
    ground_height: f64,
    orientation: OrientationCurves,
    step_height: PiecewiseLinear,
    swing_ease: PiecewiseLinear,
    drive: Box<dyn Drive>,
    feet: PerLeg<FootPlacement>,
}

impl std::fmt::Debug for LegFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegFrame")
            .field("name", &self.name)
            .field("joints", &self.joints)
            .field("step_cycles", &self.step_cycles)
            .field("feet", &self.feet)
            .finish_non_exhaustive()
    }
}

impl LegFrame {
    /// Build from configuration with joints already resolved.
    pub fn from_config(config: &LegFrameConfig, joints: LegFrameJoints) -> Result<Self, ConfigError> {
        let curve = |field: &str, c| PiecewiseLinear::from_config(&format!("{}.{field}", config.name), c);
        Ok(Self {
            name: config.name.clone(),
            joints,
            step_cycles: PerLeg::new(
                StepCycle::from_config(&config.step_cycles.left)?,
                StepCycle::from_config(&config.step_cycles.right)?,
            ),
            step_length: config.step_length,
            placement_scale: config.placement_velocity_scale,
            ground_height: config.ground_height,
            orientation: OrientationCurves {
                yaw: curve("orientation.yaw", &config.orientation.yaw)?,
                pitch: curve("orientation.pitch", &config.orientation.pitch)?,
                roll: curve("orientation.roll", &config.orientation.roll)?,
            },
            step_height: curve("step_height", &config.step_height)?,
            swing_ease: curve("swing_ease", &config.swing_ease)?,
            drive: Box::new(OrientationPd::new(
                config.orientation_pd.kp,
                config.orientation_pd.kd,
            )),
            feet: PerLeg::default(),
        })
    }

    /// Replace the orientation drive.
    #[must_use]
    pub fn with_drive(mut self, drive: Box<dyn Drive>) -> Self {
        self.drive = drive;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn joints(&self) -> &LegFrameJoints {
        &self.joints
    }

    pub fn step_cycle(&self, leg: Leg) -> &StepCycle {
        &self.step_cycles[leg]
    }

    pub const fn orientation_curves(&self) -> &OrientationCurves {
        &self.orientation
    }

    pub const fn orientation_curves_mut(&mut self) -> &mut OrientationCurves {
        &mut self.orientation
    }

    pub fn foot(&self, leg: Leg) -> &FootPlacement {
        &self.feet[leg]
    }

    pub const fn feet(&self) -> &PerLeg<FootPlacement> {
        &self.feet
    }

    /// Stance flag per leg at `phase`.
    pub fn stance_at(&self, phase: f64) -> PerLeg<bool> {
        PerLeg::from_fn(|leg| self.step_cycles[leg].is_in_stance(phase))
    }

    /// Desired frame orientation at `phase`.
    pub fn desired_orientation(&self, phase: f64) -> UnitQuaternion<f64> {
        self.orientation.orientation_at(phase)
    }

    /// World-space nominal strike point of `leg`, on the ground plane, for
    /// the given velocities.
    pub fn strike_target(
        &self,
        leg: Leg,
        velocity: &Vector3<f64>,
        desired_velocity: &Vector3<f64>,
        physics: &dyn PhysicsBackend,
    ) -> nalgebra::Point3<f64> {
        let nominal = physics.transform_point(
            self.joints.joint,
            &nominal_foot_local(leg, self.step_length),
        );
        strider_gait::swing::strike_target(
            &nominal,
            velocity,
            desired_velocity,
            self.placement_scale,
            self.ground_height,
        )
    }

    /// Plant both feet under their nominal positions and clear the drive.
    pub fn reset(&mut self, physics: &dyn PhysicsBackend) {
        let rest = Vector3::zeros();
        self.feet = PerLeg::from_fn(|leg| {
            FootPlacement::planted_at(self.strike_target(leg, &rest, &rest, physics))
        });
        self.drive.reset();
    }

    /// Foot planning for one frame.
    ///
    /// Returns the legs whose lift latch fired this tick.
    pub fn update_feet(
        &mut self,
        phase: f64,
        velocity: &Vector3<f64>,
        desired_velocity: &Vector3<f64>,
        physics: &dyn PhysicsBackend,
    ) -> PerLeg<bool> {
        let mut latched = PerLeg::new(false, false);
        for leg in Leg::ALL {
            let cycle = self.step_cycles[leg];
            if cycle.is_in_stance(phase) {
                let strike = self.strike_target(leg, velocity, desired_velocity, physics);
                latched[leg] = self.feet[leg].stance_tick(strike);
            } else {
                let s = cycle.swing_phase(phase);
                let height = self.step_height.value_at(s);
                let ease = self.swing_ease.value_at(s);
                self.feet[leg].swing_tick(height, ease);
            }
        }
        latched
    }

    /// Torque balancing for one frame; mutates `torques` at the hips and at
    /// the frame's own joint.
    pub fn apply_net_torque(
        &mut self,
        torques: &mut JointTorques,
        phase: f64,
        rotation: &UnitQuaternion<f64>,
        dt: f64,
    ) -> BalanceOutcome {
        let stance = self.stance_at(phase);
        let mut t_stance = Vector3::zeros();
        let mut t_swing = Vector3::zeros();
        for leg in Leg::ALL {
            let t = torques.get_or_zero(self.joints.hip(leg));
            if stance[leg] {
                t_stance += t;
            } else {
                t_swing += t;
            }
        }
        let t_spine = torques.get_or_zero(self.joints.spine);
        let t_lf = t_stance + t_swing + t_spine;
        torques[self.joints.joint] = t_lf;

        let stance_count = Leg::ALL.iter().filter(|l| stance[**l]).count();
        let stance_hips = Leg::ALL
            .iter()
            .filter(|l| stance[**l] && self.joints.hip(**l).is_some())
            .count();
        let mut outcome = BalanceOutcome {
            stance,
            stance_count,
            stance_hips,
            t_stance,
            t_swing,
            t_spine,
            t_lf,
            td_lf: None,
            share: None,
            issue: None,
        };

        let desired = self.desired_orientation(phase);
        let Some(td_lf) = self.drive.drive(rotation, &desired, dt) else {
            self.drive.reset();
            outcome.issue = Some(BalanceIssue::DegenerateOrientation);
            return outcome;
        };
        outcome.td_lf = Some(td_lf);

        if stance_hips == 0 {
            outcome.issue = Some(BalanceIssue::NoStanceLegs);
            return outcome;
        }

        #[allow(clippy::cast_precision_loss)]
        let share = (td_lf - t_swing - t_spine) / stance_hips as f64;
        if !share.iter().all(|c| c.is_finite()) {
            self.drive.reset();
            outcome.issue = Some(BalanceIssue::DegenerateOrientation);
            return outcome;
        }
        for leg in Leg::ALL {
            if let (true, Some(hip)) = (stance[leg], self.joints.hip(leg)) {
                torques[hip] = share;
            }
        }
        outcome.share = Some(share);

        trace!(
            frame = %self.name,
            phase,
            stance = stance_count,
            t_lf = ?t_lf,
            td_lf = ?td_lf,
            share = ?share,
            "balanced leg frame"
        );
        outcome
    }

    /// Foot state per leg.
    pub fn foot_states(&self) -> PerLeg<FootState> {
        PerLeg::from_fn(|leg| self.feet[leg].state())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
