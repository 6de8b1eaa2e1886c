use nalgebra::{UnitQuaternion, Vector3};

/// A stateful drive turning an orientation error into a torque.
///
/// Object-safe so leg frames can hold `Box<dyn Drive>`.
pub trait Drive: Send + Sync {
    /// World-frame torque pulling `current` toward `desired`.
    ///
    /// Returns `None` when the error cannot be formed (non-finite input);
    /// callers treat that as a degenerate frame and [`reset`](Self::reset).
    fn drive(
        &mut self,
        current: &UnitQuaternion<f64>,
        desired: &UnitQuaternion<f64>,
        dt: f64,
    ) -> Option<Vector3<f64>>;

    /// Forget derivative memory.
    fn reset(&mut self);
}
