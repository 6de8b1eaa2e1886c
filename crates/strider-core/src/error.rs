use thiserror::Error;

/// Top-level error type for strider-core.
#[derive(Debug, Error)]
pub enum StriderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Control error: {0}")]
    Control(#[from] ControlError),
}

/// Configuration errors.
///
/// Raised while loading or resolving a configuration, never during a
/// control step.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid trigger offset: {0} (must be in [0, 1))")]
    InvalidTriggerOffset(f64),

    #[error("Invalid duty factor: {0} (must be in (0, 1])")]
    InvalidDutyFactor(f64),

    #[error("Invalid stride period: {0} (must be > 0)")]
    InvalidStridePeriod(f64),

    #[error("Invalid curve {name}: {message}")]
    InvalidCurve { name: String, message: String },

    #[error("Unknown joint '{joint}' referenced by leg frame '{frame}'")]
    UnknownJoint { frame: String, joint: String },

    #[error("Duplicate joint name: {0}")]
    DuplicateJoint(String),

    #[error("Leg frame '{0}' lists its own joint as a neighbour")]
    SelfNeighbour(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Control-loop errors.
///
/// Copy + static messages, cheap to return from the per-frame path.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ControlError {
    #[error("Invalid timestep: {0} (must be finite and > 0)")]
    InvalidTimestep(f64),

    #[error("Joint count mismatch: controller has {expected}, physics has {got}")]
    JointCountMismatch { expected: usize, got: usize },
}
