// strider-core: types, config, time, and errors for the Strider locomotion controller.

pub mod config;
pub mod error;
pub mod time;
pub mod types;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{
        ControllerConfig, CurveConfig, CurveShape, DriveConfig, GaitConfig, JointConfig,
        LegFrameConfig, ObjectiveWeights, OrientationCurvesConfig, PdGainsConfig, PushConfig,
        SimConfig, StepCycleConfig, StriderConfig, VelocityConfig,
    };
    pub use crate::error::{ConfigError, ControlError, StriderError};
    pub use crate::time::{Accumulator, Clock, SimTime};
    pub use crate::types::{JointId, JointTorques, Leg, PerLeg, up};
}
