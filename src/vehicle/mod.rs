pub mod config;

pub use config::{VehicleConfig, VehicleConfigBuilder, DEFAULT_THROTTLED_FRACTION};
