//! Shared value types: joint handles, leg tags, and the per-joint torque
//! vector.
//!
//! Coordinates are right-handed with Z up. Inside a leg frame, `x` is the
//! coronal (lateral, +right) axis and `y` the sagittal (forward) axis.

use std::fmt;
use std::ops::{Index, IndexMut};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// World up axis.
#[must_use]
pub fn up() -> Vector3<f64> {
    Vector3::z()
}

// ---------------------------------------------------------------------------
// JointId
// ---------------------------------------------------------------------------

/// Stable handle to a joint in the physics joint list.
///
/// Resolved once from configuration; the index is 1:1 with the physics
/// engine's joint ordering and with [`JointTorques`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JointId(pub usize);

impl JointId {
    /// Raw index into the joint list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joint#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Leg
// ---------------------------------------------------------------------------

/// One side of a leg frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Left,
    Right,
}

impl Leg {
    /// Both legs in storage order.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Sign applied to coronal offsets: `-1` for the left leg, `+1` for the right.
    #[must_use]
    pub const fn mirror(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite leg.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

// ---------------------------------------------------------------------------
// PerLeg
// ---------------------------------------------------------------------------

/// A value for each leg of a leg frame, indexed by [`Leg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerLeg<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerLeg<T> {
    /// Build from explicit left and right values.
    pub const fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Build by evaluating `f` once per leg.
    pub fn from_fn(mut f: impl FnMut(Leg) -> T) -> Self {
        Self {
            left: f(Leg::Left),
            right: f(Leg::Right),
        }
    }

    /// Map each entry, keeping the leg association.
    pub fn map<U>(self, mut f: impl FnMut(Leg, T) -> U) -> PerLeg<U> {
        PerLeg {
            left: f(Leg::Left, self.left),
            right: f(Leg::Right, self.right),
        }
    }

    /// Borrow each entry.
    pub const fn as_ref(&self) -> PerLeg<&T> {
        PerLeg {
            left: &self.left,
            right: &self.right,
        }
    }

    /// Iterate `(leg, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Leg, &T)> {
        [(Leg::Left, &self.left), (Leg::Right, &self.right)].into_iter()
    }
}

impl<T> Index<Leg> for PerLeg<T> {
    type Output = T;

    fn index(&self, leg: Leg) -> &T {
        match leg {
            Leg::Left => &self.left,
            Leg::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Leg> for PerLeg<T> {
    fn index_mut(&mut self, leg: Leg) -> &mut T {
        match leg {
            Leg::Left => &mut self.left,
            Leg::Right => &mut self.right,
        }
    }
}

// ---------------------------------------------------------------------------
// JointTorques
// ---------------------------------------------------------------------------

/// Per-joint torque vector, one entry per physics joint (N·m, world frame).
///
/// Rebuilt every control frame and mutated in sequence by each leg frame's
/// balancing pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointTorques {
    values: Vec<Vector3<f64>>,
}

impl JointTorques {
    /// All-zero torques for `n` joints.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            values: vec![Vector3::zeros(); n],
        }
    }

    /// Wrap an existing vector.
    #[must_use]
    pub const fn from_vec(values: Vec<Vector3<f64>>) -> Self {
        Self { values }
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Torque at `joint`, or zero when the joint is absent.
    #[must_use]
    pub fn get_or_zero(&self, joint: Option<JointId>) -> Vector3<f64> {
        joint.map_or_else(Vector3::zeros, |j| self[j])
    }

    /// Overwrite every entry with zero.
    pub fn clear(&mut self) {
        for v in &mut self.values {
            *v = Vector3::zeros();
        }
    }

    /// Whether every component of every entry is finite.
    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.iter().all(|c| c.is_finite()))
    }

    /// First joint whose torque contains a non-finite component.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<JointId> {
        self.values
            .iter()
            .position(|v| !v.iter().all(|c| c.is_finite()))
            .map(JointId)
    }

    /// Iterate `(joint, torque)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &Vector3<f64>)> {
        self.values.iter().enumerate().map(|(i, v)| (JointId(i), v))
    }

    /// Raw slice view.
    #[must_use]
    pub fn as_slice(&self) -> &[Vector3<f64>] {
        &self.values
    }

    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> Vector3<f64> {
        self.values.iter().sum()
    }
}

impl Index<JointId> for JointTorques {
    type Output = Vector3<f64>;

    fn index(&self, joint: JointId) -> &Vector3<f64> {
        &self.values[joint.0]
    }
}

impl IndexMut<JointId> for JointTorques {
    fn index_mut(&mut self, joint: JointId) -> &mut Vector3<f64> {
        &mut self.values[joint.0]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_signs() {
        assert!((Leg::Left.mirror() + 1.0).abs() < f64::EPSILON);
        assert!((Leg::Right.mirror() - 1.0).abs() < f64::EPSILON);
        assert_eq!(Leg::Left.other(), Leg::Right);
    }

    #[test]
    fn per_leg_index_and_map() {
        let mut legs = PerLeg::new(1, 2);
        assert_eq!(legs[Leg::Left], 1);
        legs[Leg::Right] = 5;
        let doubled = legs.map(|_, v| v * 2);
        assert_eq!(doubled, PerLeg::new(2, 10));
        let from_fn = PerLeg::from_fn(Leg::mirror);
        assert!((from_fn.left + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn per_leg_iter_order() {
        let legs = PerLeg::new("l", "r");
        let collected: Vec<_> = legs.iter().map(|(leg, v)| (leg, *v)).collect();
        assert_eq!(collected, vec![(Leg::Left, "l"), (Leg::Right, "r")]);
    }

    #[test]
    fn joint_torques_absent_is_zero() {
        let mut t = JointTorques::zeros(3);
        t[JointId(1)] = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(t.get_or_zero(None), Vector3::zeros());
        assert_eq!(t.get_or_zero(Some(JointId(1))), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(t.total(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn joint_torques_non_finite_detection() {
        let mut t = JointTorques::zeros(2);
        assert!(t.all_finite());
        t[JointId(1)] = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(!t.all_finite());
        assert_eq!(t.first_non_finite(), Some(JointId(1)));
        t.clear();
        assert!(t.all_finite());
    }

    #[test]
    fn leg_serde_snake_case() {
        let json = serde_json::to_string(&Leg::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn types_are_send_sync() {
        assert_send_sync::<JointId>();
        assert_send_sync::<PerLeg<f64>>();
        assert_send_sync::<JointTorques>();
    }
}
