//! Scalar PD controller.

// ---------------------------------------------------------------------------
// PdController
// ---------------------------------------------------------------------------

/// PD controller (no integral term).
///
/// Output: `kp × error + kd × d(error)/dt`, with the derivative taken on the
/// error. The first call after construction or [`reset`](Self::reset) has a
/// zero derivative.
#[derive(Clone, Debug)]
pub struct PdController {
    /// Proportional gain.
    pub kp: f64,
    /// Derivative gain.
    pub kd: f64,
    last_error: f64,
    initialized: bool,
}

impl PdController {
    pub const fn new(kp: f64, kd: f64) -> Self {
        Self {
            kp,
            kd,
            last_error: 0.0,
            initialized: false,
        }
    }

    /// Compute control output. `dt` must be > 0.
    pub fn compute(&mut self, setpoint: f64, measured: f64, dt: f64) -> f64 {
        let error = setpoint - measured;
        let derivative = if self.initialized {
            (error - self.last_error) / dt
        } else {
            self.initialized = true;
            0.0
        };
        self.last_error = error;
        self.kp.mul_add(error, self.kd * derivative)
    }

    /// Whether a previous error is remembered.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reset derivative state.
    pub const fn reset(&mut self) {
        self.last_error = 0.0;
        self.initialized = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f64 = 0.01;

    #[test]
    fn proportional_only() {
        let mut pd = PdController::new(10.0, 0.0);
        assert_relative_eq!(pd.compute(1.0, 0.0, DT), 10.0);
    }

    #[test]
    fn derivative_first_step_is_zero() {
        let mut pd = PdController::new(0.0, 10.0);
        assert_relative_eq!(pd.compute(1.0, 0.0, DT), 0.0);
        assert!(pd.is_initialized());
    }

    #[test]
    fn derivative_second_step() {
        let mut pd = PdController::new(0.0, 1.0);
        pd.compute(1.0, 0.0, DT);
        // error 1.0 -> 0.5 over 0.01 s
        assert_relative_eq!(pd.compute(1.0, 0.5, DT), -50.0, epsilon = 1e-9);
    }

    #[test]
    fn reset_clears_memory() {
        let mut pd = PdController::new(0.0, 1.0);
        pd.compute(1.0, 0.0, DT);
        pd.reset();
        assert!(!pd.is_initialized());
        assert_relative_eq!(pd.compute(5.0, 0.0, DT), 0.0);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn pd_is_send_sync() {
        assert_send_sync::<PdController>();
    }
}
