//! Deterministic RNG utilities for reproducible tests.

use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strider_core::types::JointTorques;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `n` torques with components uniform in `[-scale, scale)`.
pub fn random_torques(n: usize, scale: f64, seed: u64) -> JointTorques {
    use rand::Rng;
    let mut rng = seeded_rng(seed);
    JointTorques::from_vec(
        (0..n)
            .map(|_| Vector3::from_fn(|_, _| rng.gen_range(-scale..scale)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
