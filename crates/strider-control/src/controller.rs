//! Per-frame orchestration of gait, velocity, foot planning and torques.

use nalgebra::Vector3;
use strider_core::config::ControllerConfig;
use strider_core::error::{ConfigError, ControlError};
use strider_core::types::{JointId, JointTorques, Leg, PerLeg};
use strider_gait::prelude::*;
use tracing::{debug, info, warn};

use crate::diagnostics::{Diagnostic, StepReport};
use crate::foot::FootState;
use crate::joints::JointGraph;
use crate::leg_frame::{BalanceIssue, LegFrame};
use crate::physics::PhysicsBackend;
use crate::snapshot::{ControllerSnapshot, FootSnapshot, LegFrameSnapshot};
use crate::velocity::VelocityRamp;
use crate::virtual_force::{NoVirtualForces, VirtualForceModel};

/// The locomotion controller.
///
/// Driven by an explicit loop: [`step`](Self::step) computes torques from
/// the current physics state, [`integrate`](Self::integrate) submits them,
/// [`snapshot`](Self::snapshot) exposes read-only state for rendering.
pub struct Controller {
    graph: JointGraph,
    frames: Vec<LegFrame>,
    gait: GaitPlayer,
    initial_phase: f64,
    velocity: VelocityRamp,
    virtual_forces: Box<dyn VirtualForceModel>,
    head: Option<JointId>,
    torques: JointTorques,
    previous: JointTorques,
    stance_counts: Vec<usize>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("joints", &self.graph.len())
            .field("frames", &self.frames)
            .field("gait", &self.gait)
            .field("velocity", &self.velocity)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Validate `config`, resolve every joint name and build the leg frames.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let graph = JointGraph::from_config(&config.joints)?;
        let frames = config
            .leg_frames
            .iter()
            .map(|fc| LegFrame::from_config(fc, graph.resolve_frame(fc)?))
            .collect::<Result<Vec<_>, _>>()?;
        let head = config
            .head
            .as_deref()
            .map(|name| graph.resolve("head", name))
            .transpose()?;

        let n = graph.len();
        info!(
            joints = n,
            leg_frames = frames.len(),
            stride_period = config.gait.stride_period,
            "controller configured"
        );

        Ok(Self {
            frames,
            gait: GaitPlayer::from_config(&config.gait)?,
            initial_phase: config.gait.initial_phase,
            velocity: VelocityRamp::new(
                Vector3::from(config.velocity.goal),
                config.velocity.ramp_rate,
            ),
            virtual_forces: Box::new(NoVirtualForces),
            head,
            torques: JointTorques::zeros(n),
            previous: JointTorques::zeros(n),
            stance_counts: vec![0; config.leg_frames.len()],
            graph,
        })
    }

    /// Replace the virtual-force model.
    #[must_use]
    pub fn with_virtual_forces(mut self, model: Box<dyn VirtualForceModel>) -> Self {
        self.virtual_forces = model;
        self
    }

    /// Return to the configured initial state and plant every foot under
    /// its nominal position in the current physics pose.
    pub fn reset(&mut self, physics: &dyn PhysicsBackend) {
        self.gait.reset(self.initial_phase);
        self.velocity.set_current(Vector3::zeros());
        self.graph.reset_drives();
        for frame in &mut self.frames {
            frame.reset(physics);
        }
        self.torques.clear();
        self.previous.clear();
        self.stance_counts.fill(0);
        debug!(phase = self.gait.phase(), "controller reset");
    }

    /// Compute this frame's torques.
    ///
    /// Advances the gait, ramps the velocity, plans feet, assembles raw
    /// torques and balances every leg frame in configuration order. Anomalies
    /// are reported in the [`StepReport`]; only an invalid `dt` or a joint
    /// count mismatch is an error.
    pub fn step(
        &mut self,
        dt: f64,
        physics: &dyn PhysicsBackend,
    ) -> Result<StepReport, ControlError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ControlError::InvalidTimestep(dt));
        }
        if physics.joint_count() != self.graph.len() {
            return Err(ControlError::JointCountMismatch {
                expected: self.graph.len(),
                got: physics.joint_count(),
            });
        }

        let phase = self.gait.advance(dt);
        let stride_restarted = self.gait.take_stride_restarted();
        let ramp = self.velocity.step(dt);
        let current = self.velocity.current();
        let goal = self.velocity.goal();

        for frame in &mut self.frames {
            frame.update_feet(phase, &current, &goal, physics);
        }

        // raw torques: drive contribution + virtual forces
        for (joint, drive) in self.graph.drives_mut() {
            let pd = drive.torque(joint, &self.previous, physics, dt);
            let vf = self.virtual_forces.torque(joint, phase, physics);
            self.torques[joint] = pd + vf;
        }

        let mut diagnostics = Vec::new();
        for (i, frame) in self.frames.iter_mut().enumerate() {
            let rotation = physics.rotation(frame.joints().joint);
            let outcome = frame.apply_net_torque(&mut self.torques, phase, &rotation, dt);
            self.stance_counts[i] = outcome.stance_count;
            match outcome.issue {
                Some(BalanceIssue::NoStanceLegs) => {
                    warn!(frame = frame.name(), phase, "no stance leg with a hip, skipping redistribution");
                    diagnostics.push(Diagnostic::DegenerateStanceCount { frame: i });
                }
                Some(BalanceIssue::DegenerateOrientation) => {
                    warn!(frame = frame.name(), phase, "degenerate orientation error, skipping redistribution");
                    diagnostics.push(Diagnostic::DegenerateOrientation { frame: i });
                }
                None => {}
            }
        }

        while let Some(joint) = self.torques.first_non_finite() {
            warn!(%joint, "non-finite torque zeroed");
            self.torques[joint] = Vector3::zeros();
            diagnostics.push(Diagnostic::NonFiniteTorque { joint });
        }

        self.previous.clone_from(&self.torques);

        Ok(StepReport {
            phase,
            stride_restarted,
            ramp,
            stance_counts: self.stance_counts.clone(),
            diagnostics,
        })
    }

    /// Submit the last computed torques, one call per joint.
    pub fn integrate(&self, physics: &mut dyn PhysicsBackend) {
        for (joint, torque) in self.torques.iter() {
            physics.apply_torque(joint, *torque);
        }
    }

    /// Read-only state after the last step.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let phase = self.gait.phase();
        ControllerSnapshot {
            phase,
            current_velocity: self.velocity.current(),
            goal_velocity: self.velocity.goal(),
            frames: self
                .frames
                .iter()
                .zip(&self.stance_counts)
                .map(|(frame, &stance_count)| LegFrameSnapshot {
                    name: frame.name().to_owned(),
                    joint: frame.joints().joint,
                    feet: PerLeg::from_fn(|leg| {
                        let foot = frame.foot(leg);
                        FootSnapshot {
                            state: foot.state(),
                            target: foot.target(),
                            lift: foot.lift(),
                            strike: foot.strike(),
                        }
                    }),
                    desired_orientation: frame.desired_orientation(phase),
                    stance_count,
                })
                .collect(),
            torques: self.torques.as_slice().to_vec(),
        }
    }

    pub const fn torques(&self) -> &JointTorques {
        &self.torques
    }

    pub fn phase(&self) -> f64 {
        self.gait.phase()
    }

    pub const fn gait(&self) -> &GaitPlayer {
        &self.gait
    }

    pub const fn gait_mut(&mut self) -> &mut GaitPlayer {
        &mut self.gait
    }

    pub const fn current_velocity(&self) -> Vector3<f64> {
        self.velocity.current()
    }

    pub const fn goal_velocity(&self) -> Vector3<f64> {
        self.velocity.goal()
    }

    pub const fn set_goal_velocity(&mut self, goal: Vector3<f64>) {
        self.velocity.set_goal(goal);
    }

    pub const fn joint_graph(&self) -> &JointGraph {
        &self.graph
    }

    pub fn leg_frames(&self) -> &[LegFrame] {
        &self.frames
    }

    pub fn leg_frames_mut(&mut self) -> &mut [LegFrame] {
        &mut self.frames
    }

    /// Joint tracked for head stability, if configured.
    pub const fn head(&self) -> Option<JointId> {
        self.head
    }

    /// Number of feet currently planted across all leg frames.
    pub fn planted_feet(&self) -> usize {
        self.frames
            .iter()
            .map(|f| {
                Leg::ALL
                    .iter()
                    .filter(|l| f.foot(**l).state() == FootState::Stance)
                    .count()
            })
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, UnitQuaternion};
    use strider_core::config::{DriveConfig, JointConfig, LegFrameConfig};

    struct Still {
        joints: usize,
        applied: Vec<(JointId, Vector3<f64>)>,
    }

    impl PhysicsBackend for Still {
        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "still"
        }
        fn joint_count(&self) -> usize {
            self.joints
        }
        fn rotation(&self, _joint: JointId) -> UnitQuaternion<f64> {
            UnitQuaternion::identity()
        }
        fn transform_point(&self, _joint: JointId, local: &Point3<f64>) -> Point3<f64> {
            local + Vector3::new(0.0, 0.0, 1.0)
        }
        fn apply_torque(&mut self, joint: JointId, torque: Vector3<f64>) {
            self.applied.push((joint, torque));
        }
    }

    fn config() -> ControllerConfig {
        let mut frame = LegFrameConfig::new("hips", "pelvis");
        frame.left_hip = Some("hip_l".into());
        frame.right_hip = Some("hip_r".into());
        ControllerConfig {
            joints: vec![
                JointConfig::new("pelvis", DriveConfig::Feedback),
                JointConfig::new("hip_l", DriveConfig::Feedback),
                JointConfig::new("hip_r", DriveConfig::Feedback),
            ],
            leg_frames: vec![frame],
            ..ControllerConfig::default()
        }
    }

    #[test]
    fn rejects_bad_timestep() {
        let mut c = Controller::from_config(&config()).unwrap();
        let physics = Still { joints: 3, applied: vec![] };
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                c.step(dt, &physics),
                Err(ControlError::InvalidTimestep(_))
            ));
        }
    }

    #[test]
    fn rejects_joint_count_mismatch() {
        let mut c = Controller::from_config(&config()).unwrap();
        let physics = Still { joints: 5, applied: vec![] };
        assert_eq!(
            c.step(0.01, &physics),
            Err(ControlError::JointCountMismatch {
                expected: 3,
                got: 5
            })
        );
    }

    #[test]
    fn integrate_submits_once_per_joint() {
        let mut c = Controller::from_config(&config()).unwrap();
        let mut physics = Still { joints: 3, applied: vec![] };
        c.reset(&physics);
        c.step(0.01, &physics).unwrap();
        c.integrate(&mut physics);
        let joints: Vec<_> = physics.applied.iter().map(|(j, _)| *j).collect();
        assert_eq!(joints, vec![JointId(0), JointId(1), JointId(2)]);
    }

    #[test]
    fn unknown_joint_is_config_error() {
        let mut cfg = config();
        cfg.leg_frames[0].spine = Some("chest".into());
        assert!(matches!(
            Controller::from_config(&cfg),
            Err(ConfigError::UnknownJoint { .. })
        ));
    }

    #[test]
    fn snapshot_reflects_frames() {
        let mut c = Controller::from_config(&config()).unwrap();
        let physics = Still { joints: 3, applied: vec![] };
        c.reset(&physics);
        c.step(0.01, &physics).unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.frames.len(), 1);
        assert_eq!(snap.frames[0].name, "hips");
        assert_eq!(snap.torques.len(), 3);
        assert!((snap.phase - 0.01).abs() < 1e-12);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn controller_is_send_sync() {
        assert_send_sync::<Controller>();
        assert_send_sync::<ControllerSnapshot>();
    }
}
