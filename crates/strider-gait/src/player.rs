//! Shared gait phase source.

use strider_core::config::GaitConfig;
use strider_core::error::ConfigError;

fn wrap(phase: f64) -> f64 {
    let p = phase.rem_euclid(1.0);
    if p >= 1.0 { 0.0 } else { p }
}

/// Advances the gait phase in `[0, 1)` at one cycle per `stride_period`.
///
/// Every wrap past 1 marks a stride restart, held until
/// [`take_stride_restarted`](Self::take_stride_restarted) reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct GaitPlayer {
    phase: f64,
    stride_period: f64,
    stride_restarted: bool,
    strides: u64,
}

impl GaitPlayer {
    pub fn new(stride_period: f64) -> Result<Self, ConfigError> {
        Self::from_config(&GaitConfig {
            stride_period,
            initial_phase: 0.0,
        })
    }

    pub fn from_config(config: &GaitConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            phase: wrap(config.initial_phase),
            stride_period: config.stride_period,
            stride_restarted: false,
            strides: 0,
        })
    }

    /// Advance by `dt` seconds and return the new phase.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance(&mut self, dt: f64) -> f64 {
        let raw = self.phase + dt / self.stride_period;
        if raw >= 1.0 {
            self.stride_restarted = true;
            self.strides += raw.floor() as u64;
        }
        self.phase = wrap(raw);
        self.phase
    }

    pub const fn phase(&self) -> f64 {
        self.phase
    }

    /// Jump to `phase` (wrapped) without registering a restart.
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap(phase);
    }

    pub const fn stride_period(&self) -> f64 {
        self.stride_period
    }

    pub fn set_stride_period(&mut self, stride_period: f64) -> Result<(), ConfigError> {
        if !stride_period.is_finite() || stride_period <= 0.0 {
            return Err(ConfigError::InvalidStridePeriod(stride_period));
        }
        self.stride_period = stride_period;
        Ok(())
    }

    /// Whether a stride restarted since the last call; clears the flag.
    pub const fn take_stride_restarted(&mut self) -> bool {
        let restarted = self.stride_restarted;
        self.stride_restarted = false;
        restarted
    }

    /// Completed strides since construction or reset.
    pub const fn strides(&self) -> u64 {
        self.strides
    }

    pub fn reset(&mut self, phase: f64) {
        self.phase = wrap(phase);
        self.stride_restarted = false;
        self.strides = 0;
    }
}
