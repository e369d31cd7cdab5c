pub mod compare;
pub mod csv;
pub mod json;
pub mod telemetry;

pub use compare::{compare, Comparison, Residual};
pub use json::AscentSummary;
pub use telemetry::{load_temperature_table, ReferenceTelemetry, TelemetryPoint};
