//! Per-frame anomalies reported by [`Controller::step`](crate::controller::Controller::step).
//!
//! None of these abort the step; the caller decides whether to log, clamp
//! or halt.

use std::fmt;

use strider_core::types::JointId;

use crate::velocity::RampDirection;

/// A recoverable anomaly detected during one control step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// No stance leg of the frame had a hip joint; redistribution was skipped.
    DegenerateStanceCount { frame: usize },
    /// The frame's desired torque could not be formed; redistribution was
    /// skipped and the orientation PD reset.
    DegenerateOrientation { frame: usize },
    /// A torque entry was non-finite and was zeroed before submission.
    NonFiniteTorque { joint: JointId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateStanceCount { frame } => {
                write!(f, "leg frame {frame}: no legs in stance")
            }
            Self::DegenerateOrientation { frame } => {
                write!(f, "leg frame {frame}: degenerate orientation error")
            }
            Self::NonFiniteTorque { joint } => write!(f, "{joint}: non-finite torque"),
        }
    }
}

/// Outcome of one control step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Gait phase after advancing.
    pub phase: f64,
    /// Whether the gait wrapped into a new stride this step.
    pub stride_restarted: bool,
    /// How the velocity ramp moved.
    pub ramp: RampDirection,
    /// Stance legs per leg frame, in configuration order.
    pub stance_counts: Vec<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StepReport {
    /// No diagnostics were raised.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
