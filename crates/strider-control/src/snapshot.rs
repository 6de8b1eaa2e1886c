//! Read-only controller state for rendering and telemetry.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use strider_core::types::{JointId, PerLeg};

use crate::foot::FootState;

/// One foot's planner state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootSnapshot {
    pub state: FootState,
    pub target: Point3<f64>,
    pub lift: Point3<f64>,
    pub strike: Point3<f64>,
}

/// One leg frame's state after the last step.
#[derive(Clone, Debug, PartialEq)]
pub struct LegFrameSnapshot {
    pub name: String,
    pub joint: JointId,
    pub feet: PerLeg<FootSnapshot>,
    pub desired_orientation: UnitQuaternion<f64>,
    pub stance_count: usize,
}

/// Everything a renderer or recorder reads after a step.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerSnapshot {
    pub phase: f64,
    pub current_velocity: Vector3<f64>,
    pub goal_velocity: Vector3<f64>,
    pub frames: Vec<LegFrameSnapshot>,
    pub torques: Vec<Vector3<f64>>,
}
