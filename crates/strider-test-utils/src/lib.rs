//! Shared test fixtures and utilities for Strider crates.
//!
//! Provides a recording physics backend, canned controller configurations,
//! and deterministic RNG setup.

pub mod configs;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use configs::{biped_joints, single_frame_config, two_frame_config};
pub use mocks::{FixedVirtualForces, RecordingPhysics};
pub use rng::{random_torques, seeded_rng};
