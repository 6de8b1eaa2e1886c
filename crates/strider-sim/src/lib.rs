//! `strider-sim`: headless runs of the Strider controller.
//!
//! A [`Scene`](scene::Scene) pairs a controller configuration with a body
//! layout. [`Simulation`](runner::Simulation) builds a
//! [`RigidWorld`](world::RigidWorld) from it and drives the control loop at a
//! fixed rate, scoring the walk and optionally recording it to MCAP.
//!
//! ```no_run
//! use std::time::Duration;
//! use strider_sim::prelude::*;
//!
//! let mut sim = Simulation::new(&biped()).unwrap();
//! for _ in 0..600 {
//!     sim.advance(Duration::from_millis(16)).unwrap();
//! }
//! println!("{}", sim.objective());
//! ```

pub mod runner;
pub mod scene;
pub mod stats;
pub mod world;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        runner::{BodyPose, RenderState, SimError, Simulation},
        scene::{PRESETS, Scene, biped, preset, quadruped},
        stats::RunStats,
        world::{Body, BodySpec, RigidWorld},
    };
}
