//! Piecewise-linear curves over the gait phase.

use strider_core::config::{CurveConfig, CurveShape};
use strider_core::error::ConfigError;

/// A curve through `(t, value)` knots with strictly increasing `t`.
///
/// Evaluation clamps to the first/last value outside the knot range.
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseLinear {
    knots: Vec<(f64, f64)>,
}

impl PiecewiseLinear {
    /// Constant curve.
    pub fn flat(value: f64) -> Self {
        Self {
            knots: vec![(0.0, value)],
        }
    }

    /// Values at evenly spaced knots over `[0, 1]`. Needs at least two.
    pub fn from_samples(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let last = (values.len() - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let knots = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64 / last, *v))
            .collect();
        Some(Self { knots })
    }

    /// A preset shape sampled at `samples` knots (at least two) and scaled.
    pub fn from_shape(shape: CurveShape, samples: usize, scale: f64) -> Self {
        let n = samples.max(2);
        #[allow(clippy::cast_precision_loss)]
        let last = (n - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let knots = (0..n)
            .map(|i| {
                let t = i as f64 / last;
                (t, scale * shape.value(t))
            })
            .collect();
        Self { knots }
    }

    /// Explicit knots; `None` if empty, non-finite or not strictly increasing.
    pub fn from_knots(knots: Vec<(f64, f64)>) -> Option<Self> {
        let finite = knots.iter().all(|(t, v)| t.is_finite() && v.is_finite());
        let increasing = knots.windows(2).all(|w| w[1].0 > w[0].0);
        (!knots.is_empty() && finite && increasing).then_some(Self { knots })
    }

    /// Build from configuration, reporting problems against `name`.
    pub fn from_config(name: &str, config: &CurveConfig) -> Result<Self, ConfigError> {
        config.validate(name)?;
        Ok(match config {
            CurveConfig::Flat { value } => Self::flat(*value),
            CurveConfig::Shape {
                shape,
                samples,
                scale,
            } => Self::from_shape(*shape, *samples, *scale),
            CurveConfig::Points { points } => Self {
                knots: points.iter().map(|[t, v]| (*t, *v)).collect(),
            },
        })
    }

    pub fn knots(&self) -> &[(f64, f64)] {
        &self.knots
    }

    /// Value at `t`, linearly interpolated between the surrounding knots.
    pub fn value_at(&self, t: f64) -> f64 {
        let Some(&(t0, v0)) = self.knots.first() else {
            return 0.0;
        };
        if t <= t0 {
            return v0;
        }
        // first knot with time > t
        let idx = self.knots.partition_point(|(kt, _)| *kt <= t);
        if idx >= self.knots.len() {
            return self.knots[self.knots.len() - 1].1;
        }
        let (ta, va) = self.knots[idx - 1];
        let (tb, vb) = self.knots[idx];
        let s = (t - ta) / (tb - ta);
        s.mul_add(vb - va, va)
    }
}

impl Default for PiecewiseLinear {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
