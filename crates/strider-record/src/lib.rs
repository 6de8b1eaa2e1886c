//! `strider-record`: telemetry and scoring for Strider runs.
//!
//! [`Recorder`](recorder::Recorder) writes one JSON message per control step
//! on each of three MCAP channels. [`MovementEvaluator`](objective::MovementEvaluator)
//! accumulates movement-quality terms over a run and folds them into a
//! weighted [`Objective`](objective::Objective).
//!
//! # Example
//!
//! ```no_run
//! use strider_record::prelude::*;
//!
//! let mut recorder = Recorder::create("walk.mcap").unwrap();
//! // ... recorder.record_step(clock.time(), &controller, &report) per step ...
//! recorder.finish().unwrap();
//! ```

pub mod objective;
pub mod recorder;
pub mod types;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        objective::{FrameSample, MovementEvaluator, MovementSample, Objective},
        recorder::{RecordError, Recorder},
        types::{FootFrame, FootSample, FrameFeet, GaitFrame, TorqueFrame},
    };
}
