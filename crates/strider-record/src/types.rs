//! Serializable frame types written as MCAP message payloads.
//!
//! Each frame type corresponds to one MCAP topic:
//! - `TorqueFrame` → `/torques`
//! - `FootFrame`   → `/feet`
//! - `GaitFrame`   → `/gait`

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use strider_control::diagnostics::StepReport;
use strider_control::foot::FootState;
use strider_control::snapshot::{ControllerSnapshot, FootSnapshot};

fn xyz(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn point(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

// ---------------------------------------------------------------------------
// TorqueFrame
// ---------------------------------------------------------------------------

/// Final per-joint torques of one control step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorqueFrame {
    /// Simulation timestamp in nanoseconds.
    pub timestamp_ns: u64,
    /// Joint names, same order as `torques`.
    pub names: Vec<String>,
    /// Torque per joint (N·m).
    pub torques: Vec<[f64; 3]>,
}

impl TorqueFrame {
    pub fn from_snapshot(timestamp_ns: u64, names: &[String], snapshot: &ControllerSnapshot) -> Self {
        Self {
            timestamp_ns,
            names: names.to_vec(),
            torques: snapshot.torques.iter().map(xyz).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// FootFrame
// ---------------------------------------------------------------------------

/// One foot's planner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootSample {
    pub stance: bool,
    pub target: [f64; 3],
    pub lift: [f64; 3],
    pub strike: [f64; 3],
}

impl From<&FootSnapshot> for FootSample {
    fn from(foot: &FootSnapshot) -> Self {
        Self {
            stance: foot.state == FootState::Stance,
            target: point(&foot.target),
            lift: point(&foot.lift),
            strike: point(&foot.strike),
        }
    }
}

/// Both feet of one leg frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameFeet {
    pub name: String,
    pub stance_count: usize,
    pub left: FootSample,
    pub right: FootSample,
}

/// Foot targets of every leg frame after one control step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootFrame {
    pub timestamp_ns: u64,
    pub frames: Vec<FrameFeet>,
}

impl FootFrame {
    pub fn from_snapshot(timestamp_ns: u64, snapshot: &ControllerSnapshot) -> Self {
        Self {
            timestamp_ns,
            frames: snapshot
                .frames
                .iter()
                .map(|f| FrameFeet {
                    name: f.name.clone(),
                    stance_count: f.stance_count,
                    left: FootSample::from(&f.feet.left),
                    right: FootSample::from(&f.feet.right),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// GaitFrame
// ---------------------------------------------------------------------------

/// Gait phase, velocities and diagnostics of one control step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitFrame {
    pub timestamp_ns: u64,
    pub phase: f64,
    pub stride_restarted: bool,
    pub current_velocity: [f64; 3],
    pub goal_velocity: [f64; 3],
    pub stance_counts: Vec<usize>,
    /// Human-readable diagnostics raised this step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl GaitFrame {
    pub fn from_report(timestamp_ns: u64, snapshot: &ControllerSnapshot, report: &StepReport) -> Self {
        Self {
            timestamp_ns,
            phase: report.phase,
            stride_restarted: report.stride_restarted,
            current_velocity: xyz(&snapshot.current_velocity),
            goal_velocity: xyz(&snapshot.goal_velocity),
            stance_counts: report.stance_counts.clone(),
            diagnostics: report.diagnostics.iter().map(ToString::to_string).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strider_control::diagnostics::Diagnostic;
    use strider_control::snapshot::LegFrameSnapshot;
    use strider_core::types::{JointId, PerLeg};

    fn foot(state: FootState, x: f64) -> FootSnapshot {
        FootSnapshot {
            state,
            target: Point3::new(x, 0.0, 0.0),
            lift: Point3::new(x, -0.1, 0.0),
            strike: Point3::new(x, 0.1, 0.0),
        }
    }

    fn snapshot() -> ControllerSnapshot {
        ControllerSnapshot {
            phase: 0.25,
            current_velocity: Vector3::new(0.0, 0.3, 0.0),
            goal_velocity: Vector3::new(0.0, 0.5, 0.0),
            frames: vec![LegFrameSnapshot {
                name: "hips".into(),
                joint: JointId(0),
                feet: PerLeg::new(foot(FootState::Stance, -0.1), foot(FootState::Swing, 0.1)),
                desired_orientation: nalgebra::UnitQuaternion::identity(),
                stance_count: 1,
            }],
            torques: vec![Vector3::new(1.0, 2.0, 3.0), Vector3::zeros()],
        }
    }

    #[test]
    fn torque_frame_from_snapshot() {
        let names = vec!["pelvis".to_string(), "hip_l".to_string()];
        let frame = TorqueFrame::from_snapshot(42, &names, &snapshot());
        assert_eq!(frame.timestamp_ns, 42);
        assert_eq!(frame.names, names);
        assert_eq!(frame.torques[0], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn foot_frame_flags_stance() {
        let frame = FootFrame::from_snapshot(0, &snapshot());
        let hips = &frame.frames[0];
        assert!(hips.left.stance);
        assert!(!hips.right.stance);
        assert_eq!(hips.right.strike, [0.1, 0.1, 0.0]);
    }

    #[test]
    fn gait_frame_carries_diagnostics() {
        let report = StepReport {
            phase: 0.25,
            stride_restarted: true,
            stance_counts: vec![1],
            diagnostics: vec![Diagnostic::DegenerateStanceCount { frame: 0 }],
            ..StepReport::default()
        };
        let frame = GaitFrame::from_report(7, &snapshot(), &report);
        assert!(frame.stride_restarted);
        assert_eq!(frame.goal_velocity, [0.0, 0.5, 0.0]);
        assert_eq!(frame.diagnostics, vec!["leg frame 0: no legs in stance".to_string()]);
    }

    #[test]
    fn clean_gait_frame_omits_diagnostics() {
        let frame = GaitFrame::from_report(0, &snapshot(), &StepReport::default());
        let json = serde_json::to_string(&frame).unwrap();
        assert!(!json.contains("diagnostics"));
        let back: GaitFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, back);
    }
}
