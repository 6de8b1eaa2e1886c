//! Per-leg stance window within the gait cycle.
//!
//! A leg is in stance on the interval `[t, t + d)` taken modulo 1, where `t`
//! is the trigger offset and `d` the duty factor. Everything else is swing.

use strider_core::config::StepCycleConfig;
use strider_core::error::ConfigError;

/// Largest value strictly below 1.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Stance/swing schedule of a single leg.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepCycle {
    trigger_offset: f64,
    duty_factor: f64,
}

impl StepCycle {
    /// Validates `trigger_offset ∈ [0, 1)` and `duty_factor ∈ (0, 1]`.
    pub fn new(trigger_offset: f64, duty_factor: f64) -> Result<Self, ConfigError> {
        Self::from_config(&StepCycleConfig {
            trigger_offset,
            duty_factor,
        })
    }

    pub fn from_config(config: &StepCycleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            trigger_offset: config.trigger_offset,
            duty_factor: config.duty_factor,
        })
    }

    pub const fn trigger_offset(&self) -> f64 {
        self.trigger_offset
    }

    pub const fn duty_factor(&self) -> f64 {
        self.duty_factor
    }

    /// Phase measured from the trigger, in `[0, 1)`.
    fn local_phase(&self, phase: f64) -> f64 {
        let p = (phase - self.trigger_offset).rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
        if p >= 1.0 { 0.0 } else { p }
    }

    /// Whether the leg is planted at `phase`.
    pub fn is_in_stance(&self, phase: f64) -> bool {
        self.duty_factor >= 1.0 || self.local_phase(phase) < self.duty_factor
    }

    /// Progress through the stance interval in `[0, 1)`; `0` while in swing.
    pub fn stance_phase(&self, phase: f64) -> f64 {
        let p = self.local_phase(phase);
        if p < self.duty_factor {
            (p / self.duty_factor).min(BELOW_ONE)
        } else {
            0.0
        }
    }

    /// Progress through the swing interval in `[0, 1)`; `0` while in stance.
    pub fn swing_phase(&self, phase: f64) -> f64 {
        if self.is_in_stance(phase) {
            return 0.0;
        }
        let p = self.local_phase(phase);
        ((p - self.duty_factor) / (1.0 - self.duty_factor)).min(BELOW_ONE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
