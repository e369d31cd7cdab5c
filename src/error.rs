use thiserror::Error;

/// Configuration problems caught before any integration starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("burn rate must be non-negative, got {0} kg/s")]
    NegativeBurnRate(f64),

    #[error("end time must be positive, got {0} s")]
    NonPositiveEndTime(f64),

    #[error("time step must be positive, got {0} s")]
    NonPositiveTimeStep(f64),

    #[error("turn end altitude ({end} m) must be above turn start altitude ({start} m)")]
    InvertedTurnBand { start: f64, end: f64 },

    #[error("adaptive integration needs at least two output samples, got {0}")]
    TooFewSamples(usize),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("throttled thrust fraction must lie in [0, 1], got {0}")]
    ThrottleOutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum AscentError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("temperature lookup failed at index {index}: {reason}")]
    TemperatureLookup { index: usize, reason: String },

    #[error("vehicle mass is exactly zero at t={time} s, acceleration is undefined")]
    ZeroMass { time: f64 },

    #[error("adaptive integration failed: {0}")]
    Integration(String),

    #[error("telemetry record {index} is malformed: {reason}")]
    MalformedTelemetry { index: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AscentError>;
