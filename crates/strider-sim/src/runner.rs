//! Fixed-rate headless simulation loop.
//!
//! Each control step:
//!
//! ```text
//! controller.step → controller.integrate → push → world.integrate → evaluate → record
//! ```
//!
//! [`Simulation::advance`] decouples the control rate from the caller's frame
//! rate through the [`Clock`] accumulator.

use std::time::Duration;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strider_control::prelude::*;
use strider_core::config::PushConfig;
use strider_core::error::{ConfigError, ControlError};
use strider_core::time::{Clock, SimTime};
use strider_core::types::JointId;
use strider_record::prelude::*;
use tracing::{debug, error, info};

use crate::scene::Scene;
use crate::stats::RunStats;
use crate::world::RigidWorld;

// ---------------------------------------------------------------------------
// SimError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

// ---------------------------------------------------------------------------
// RenderState
// ---------------------------------------------------------------------------

/// World pose of one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyPose {
    pub name: String,
    pub position: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

/// Everything a viewer draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub time: SimTime,
    pub root: Point3<f64>,
    pub bodies: Vec<BodyPose>,
    pub controller: ControllerSnapshot,
}

// ---------------------------------------------------------------------------
// PushDisturbance
// ---------------------------------------------------------------------------

/// Seeded random horizontal torque kicks on one body.
#[derive(Clone, Debug)]
struct PushDisturbance {
    rng: ChaCha8Rng,
    target: JointId,
    interval: f64,
    magnitude: f64,
    next: f64,
}

impl PushDisturbance {
    fn new(config: &PushConfig, seed: u64, target: JointId) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            target,
            interval: config.interval,
            magnitude: config.magnitude,
            next: config.interval,
        }
    }

    /// Kick `world` if `now` has reached the next push time.
    fn maybe_push(&mut self, now: f64, world: &mut RigidWorld) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        let torque = Vector3::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
            0.0,
        ) * self.magnitude;
        world.apply_torque(self.target, torque);
        debug!(target = %self.target, ?torque, at = now, "push");
        true
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A controller walking a [`RigidWorld`] at a fixed control rate.
pub struct Simulation {
    name: String,
    controller: Controller,
    world: RigidWorld,
    clock: Clock,
    recorder: Option<Recorder>,
    evaluator: MovementEvaluator,
    stats: RunStats,
    push: Option<PushDisturbance>,
    last_report: StepReport,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("name", &self.name)
            .field("time", &self.clock.time())
            .field("stats", &self.stats)
            .field("recording", &self.recorder.is_some())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Build the controller and world for `scene` and plant the feet.
    pub fn new(scene: &Scene) -> Result<Self, SimError> {
        let config = &scene.config;
        config.validate()?;

        let mut controller = Controller::from_config(&config.controller)?;
        let world = scene.build_world();
        if world.joint_count() != controller.joint_graph().len() {
            return Err(ControlError::JointCountMismatch {
                expected: controller.joint_graph().len(),
                got: world.joint_count(),
            }
            .into());
        }
        controller.reset(&world);

        let nominal_heights = controller
            .leg_frames()
            .iter()
            .map(|f| world.position(f.joints().joint).z)
            .collect();
        let evaluator = MovementEvaluator::new(config.objective).with_nominal_heights(nominal_heights);

        let push = if config.sim.push.enabled {
            controller
                .leg_frames()
                .first()
                .map(|f| PushDisturbance::new(&config.sim.push, config.sim.seed, f.joints().joint))
        } else {
            None
        };

        info!(
            scene = %scene.name,
            joints = world.joint_count(),
            control_hz = config.sim.control_hz(),
            pushes = push.is_some(),
            seed = config.sim.seed,
            "simulation ready"
        );

        Ok(Self {
            name: scene.name.clone(),
            controller,
            world,
            clock: Clock::new(config.sim.control_dt).with_max_steps(config.sim.max_substeps),
            recorder: None,
            evaluator,
            stats: RunStats::new(),
            push,
            last_report: StepReport::default(),
        })
    }

    /// Record every control step to `recorder`.
    #[must_use]
    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Run one control step of the fixed timestep.
    pub fn step(&mut self) -> Result<&StepReport, SimError> {
        let dt = self.clock.timestep();
        let report = self.controller.step(dt, &self.world)?;
        self.controller.integrate(&mut self.world);

        let now = self.clock.time().secs_f64();
        let pushed = match self.push.as_mut() {
            Some(push) => push.maybe_push(now, &mut self.world),
            None => false,
        };
        self.stats.pushes += u64::from(pushed);

        self.world.set_root_velocity(self.controller.current_velocity());
        self.world.integrate(dt);
        self.clock.advance();

        self.evaluator.record(&MovementSample::observe(
            &self.controller,
            &self.world,
            dt,
            report.stride_restarted,
        ));
        self.stats.record(&report, self.controller.torques());

        let failed = self.recorder.as_mut().and_then(|recorder| {
            recorder
                .record_step(self.clock.time(), &self.controller, &report)
                .err()
        });
        if let Some(e) = failed {
            error!("strider-sim: recording stopped: {e}");
            self.recorder = None;
        }

        self.last_report = report;
        Ok(&self.last_report)
    }

    /// Feed one rendered frame's worth of wall time and run every control
    /// step it covers, up to the substep cap. Returns the steps taken.
    pub fn advance(&mut self, frame_delta: Duration) -> Result<u32, SimError> {
        self.clock.tick(frame_delta);
        let mut steps = 0;
        while self.clock.should_step() {
            self.step()?;
            steps += 1;
        }
        self.clock.end_frame();
        Ok(steps)
    }

    /// Run control steps until `seconds` of simulated time have passed.
    pub fn run_for(&mut self, seconds: f64) -> Result<(), SimError> {
        let end = self.clock.time().secs_f64() + seconds.max(0.0);
        let half_step = self.clock.timestep() * 0.5;
        while self.clock.time().secs_f64() + half_step < end {
            self.step()?;
        }
        Ok(())
    }

    pub fn render(&self) -> RenderState {
        RenderState {
            time: self.clock.time(),
            root: self.world.root(),
            bodies: self
                .world
                .bodies()
                .iter()
                .enumerate()
                .map(|(i, body)| BodyPose {
                    name: body.name.clone(),
                    position: self.world.position(JointId(i)),
                    rotation: body.rotation,
                })
                .collect(),
            controller: self.controller.snapshot(),
        }
    }

    /// Objective so far, counting the stride in progress.
    pub fn objective(&self) -> Objective {
        let mut evaluator = self.evaluator.clone();
        evaluator.close_stride();
        evaluator.evaluate()
    }

    /// Finalize the recording, if any.
    pub fn finish(&mut self) -> Result<(), SimError> {
        if let Some(mut recorder) = self.recorder.take() {
            recorder.finish()?;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn controller(&self) -> &Controller {
        &self.controller
    }

    pub const fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub const fn world(&self) -> &RigidWorld {
        &self.world
    }

    pub const fn time(&self) -> SimTime {
        self.clock.time()
    }

    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub const fn last_report(&self) -> &StepReport {
        &self.last_report
    }

    pub const fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
