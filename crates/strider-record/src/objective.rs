//! Movement-quality objective accumulated over a run.
//!
//! Five terms, each a mean over the samples that fed it:
//!
//! | term | measures                                                    |
//! |------|-------------------------------------------------------------|
//! | `fd` | squared leg-frame height deviation from the nominal height  |
//! | `fv` | per-stride mean velocity error against the straight goal    |
//! | `fr` | leg-frame rotation error to the desired orientation (deg)   |
//! | `fh` | head acceleration magnitude                                 |
//! | `fp` | forward progress (a sum, not a mean)                        |
//!
//! `total = wd·fd + wv·fv + wr·fr + wh·fh − wp·fp`; lower is better.

use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use strider_control::controller::Controller;
use strider_control::physics::PhysicsBackend;
use strider_core::config::ObjectiveWeights;

fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
    #[allow(clippy::cast_precision_loss)]
    let n = n.max(1) as f64;
    sum / n
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// One leg frame's body state at a control step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
    pub rotation: UnitQuaternion<f64>,
    pub desired_orientation: UnitQuaternion<f64>,
    pub height: f64,
}

/// Everything the evaluator reads from one control step.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementSample {
    pub dt: f64,
    pub stride_restarted: bool,
    pub current_velocity: Vector3<f64>,
    pub goal_velocity: Vector3<f64>,
    pub frames: Vec<FrameSample>,
    pub head_velocity: Option<Vector3<f64>>,
}

impl MovementSample {
    /// Read the controller's state after a step together with the body
    /// poses from `physics`.
    pub fn observe(
        controller: &Controller,
        physics: &dyn PhysicsBackend,
        dt: f64,
        stride_restarted: bool,
    ) -> Self {
        let phase = controller.phase();
        Self {
            dt,
            stride_restarted,
            current_velocity: controller.current_velocity(),
            goal_velocity: controller.goal_velocity(),
            frames: controller
                .leg_frames()
                .iter()
                .map(|frame| {
                    let joint = frame.joints().joint;
                    FrameSample {
                        rotation: physics.rotation(joint),
                        desired_orientation: frame.desired_orientation(phase),
                        height: physics.position(joint).z,
                    }
                })
                .collect(),
            head_velocity: controller.head().map(|head| physics.linear_velocity(head)),
        }
    }
}

// ---------------------------------------------------------------------------
// Objective
// ---------------------------------------------------------------------------

/// Evaluated objective terms and their weighted total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub fd: f64,
    pub fv: f64,
    pub fr: f64,
    pub fh: f64,
    pub fp: f64,
    pub total: f64,
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4} (fd {:.4}, fv {:.4}, fr {:.4}, fh {:.4}, fp {:.4})",
            self.total, self.fd, self.fv, self.fr, self.fh, self.fp
        )
    }
}

// ---------------------------------------------------------------------------
// MovementEvaluator
// ---------------------------------------------------------------------------

/// Accumulates objective terms sample by sample.
#[derive(Clone, Debug, Default)]
pub struct MovementEvaluator {
    weights: ObjectiveWeights,
    nominal_heights: Vec<f64>,

    stride_velocities: Vec<Vector3<f64>>,
    stride_goals: Vec<Vector3<f64>>,
    velocity_deviations: Vec<f64>,

    rotation_deviations: Vec<f64>,
    head_accelerations: Vec<f64>,
    last_head_velocity: Option<Vector3<f64>>,
    height_deviations: Vec<f64>,

    progress: Vector3<f64>,
    last_goal: Vector3<f64>,
}

impl MovementEvaluator {
    pub fn new(weights: ObjectiveWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    /// Nominal height per leg frame; frames without one are left out of
    /// `fd`.
    #[must_use]
    pub fn with_nominal_heights(mut self, heights: Vec<f64>) -> Self {
        self.nominal_heights = heights;
        self
    }

    pub const fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }

    /// Feed one control step.
    pub fn record(&mut self, sample: &MovementSample) {
        if sample.stride_restarted {
            self.close_stride();
        } else {
            self.stride_velocities.push(sample.current_velocity);
            // straight-line walking: no coronal goal
            let mut goal = sample.goal_velocity;
            goal.x = 0.0;
            self.stride_goals.push(goal);
        }

        for frame in &sample.frames {
            let angle = frame.rotation.angle_to(&frame.desired_orientation);
            self.rotation_deviations.push(angle.to_degrees());
        }

        if let Some(velocity) = sample.head_velocity {
            match self.last_head_velocity {
                Some(last) if sample.dt > 0.0 => {
                    self.head_accelerations.push(((velocity - last) / sample.dt).norm());
                }
                _ => {}
            }
            self.last_head_velocity = Some(velocity);
        }

        let deviation: f64 = sample
            .frames
            .iter()
            .zip(&self.nominal_heights)
            .map(|(frame, nominal)| (frame.height - nominal).powi(2))
            .sum();
        self.height_deviations.push(deviation);

        self.progress += sample.current_velocity;
        self.last_goal = sample.goal_velocity;
    }

    /// Close the current stride early, e.g. at the end of a run.
    pub fn close_stride(&mut self) {
        if self.stride_velocities.is_empty() {
            return;
        }
        let current = self.stride_velocities.iter().sum::<Vector3<f64>>();
        let goal = self.stride_goals.iter().sum::<Vector3<f64>>();
        #[allow(clippy::cast_precision_loss)]
        let n = self.stride_velocities.len() as f64;
        self.velocity_deviations.push((current / n - goal / n).norm());
        self.stride_velocities.clear();
        self.stride_goals.clear();
    }

    /// Completed strides contributing to `fv`.
    pub fn strides(&self) -> usize {
        self.velocity_deviations.len()
    }

    pub fn evaluate(&self) -> Objective {
        let fd = mean(self.height_deviations.iter().copied());
        let fv = mean(self.velocity_deviations.iter().copied());
        let fr = mean(self.rotation_deviations.iter().copied());
        let fh = mean(self.head_accelerations.iter().copied());
        // direction floor keeps a zero or backwards goal scoring forwards
        let direction = self.last_goal.y.max(0.1).signum();
        let fp = (self.progress.y * direction).max(0.0);

        let w = &self.weights;
        Objective {
            fd,
            fv,
            fr,
            fh,
            fp,
            total: w.wd * fd + w.wv * fv + w.wr * fr + w.wh * fh - w.wp * fp,
        }
    }

    /// Drop every accumulated sample, keeping weights and nominal heights.
    pub fn reset(&mut self) {
        *self = Self {
            weights: self.weights,
            nominal_heights: std::mem::take(&mut self.nominal_heights),
            ..Self::default()
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
