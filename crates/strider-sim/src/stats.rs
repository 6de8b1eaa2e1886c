//! Run statistics.
//!
//! [`RunStats`] counts control steps, completed strides and diagnostics over
//! a run, and tracks the largest torque submitted.

use std::fmt;

use strider_control::diagnostics::{Diagnostic, StepReport};
use strider_core::types::JointTorques;

// ---------------------------------------------------------------------------
// RunStats
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    /// Control steps taken.
    pub steps: u64,
    /// Completed gait strides.
    pub strides: u64,
    /// Steps where some leg frame had no stance leg with a hip.
    pub degenerate_stance: u64,
    /// Steps where some leg frame's orientation error was degenerate.
    pub degenerate_orientation: u64,
    /// Torque entries zeroed for being non-finite.
    pub non_finite_torques: u64,
    /// Push disturbances applied.
    pub pushes: u64,
    /// Largest torque magnitude submitted (N·m).
    pub max_torque: f64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one step's report and its final torques.
    pub fn record(&mut self, report: &StepReport, torques: &JointTorques) {
        self.steps += 1;
        if report.stride_restarted {
            self.strides += 1;
        }
        let mut stance = false;
        let mut orientation = false;
        for diagnostic in &report.diagnostics {
            match diagnostic {
                Diagnostic::DegenerateStanceCount { .. } => stance = true,
                Diagnostic::DegenerateOrientation { .. } => orientation = true,
                Diagnostic::NonFiniteTorque { .. } => self.non_finite_torques += 1,
            }
        }
        self.degenerate_stance += u64::from(stance);
        self.degenerate_orientation += u64::from(orientation);
        let peak = torques
            .iter()
            .map(|(_, t)| t.norm())
            .fold(0.0, f64::max);
        self.max_torque = self.max_torque.max(peak);
    }

    /// Sum of the diagnostic counters.
    pub const fn diagnostics_total(&self) -> u64 {
        self.degenerate_stance + self.degenerate_orientation + self.non_finite_torques
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps, {} strides, {} pushes, max torque {:.3} N·m, \
             diagnostics: {} no-stance, {} orientation, {} non-finite",
            self.steps,
            self.strides,
            self.pushes,
            self.max_torque,
            self.degenerate_stance,
            self.degenerate_orientation,
            self.non_finite_torques,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use strider_core::types::JointId;

    #[test]
    fn stats_default_empty() {
        let stats = RunStats::new();
        assert_eq!(stats.steps, 0);
        assert_eq!(stats.diagnostics_total(), 0);
        assert!(stats.max_torque.abs() < f64::EPSILON);
    }

    #[test]
    fn record_counts_strides_and_diagnostics() {
        let mut stats = RunStats::new();
        let torques = JointTorques::from_vec(vec![Vector3::new(3.0, 4.0, 0.0), Vector3::x()]);
        let report = StepReport {
            stride_restarted: true,
            diagnostics: vec![
                Diagnostic::DegenerateStanceCount { frame: 0 },
                Diagnostic::DegenerateStanceCount { frame: 1 },
                Diagnostic::NonFiniteTorque { joint: JointId(1) },
            ],
            ..StepReport::default()
        };
        stats.record(&report, &torques);
        stats.record(&StepReport::default(), &JointTorques::zeros(2));
        assert_eq!(stats.steps, 2);
        assert_eq!(stats.strides, 1);
        // two frames in one step count once
        assert_eq!(stats.degenerate_stance, 1);
        assert_eq!(stats.non_finite_torques, 1);
        assert!((stats.max_torque - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_clears_stats() {
        let mut stats = RunStats::new();
        stats.steps = 10;
        stats.pushes = 2;
        stats.reset();
        assert_eq!(stats, RunStats::default());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn stats_is_send_sync() {
        assert_send_sync::<RunStats>();
    }
}
