pub mod error;
pub mod physics;
pub mod dynamics;
pub mod vehicle;
pub mod gnc;
pub mod sim;
pub mod io;
pub mod scenario;

pub use error::{AscentError, ConfigError, Result};
pub use scenario::{presets, Scenario};
pub use sim::{simulate, AscentSimulator};

// Flat re-exports of the data model
pub mod types {
    pub use crate::dynamics::state::{
        Deriv, Integrator, MassUpdate, SimConfig, TrajectorySample, VehicleState,
    };
    pub use crate::gnc::PitchProgram;
    pub use crate::io::telemetry::{ReferenceTelemetry, TelemetryPoint};
    pub use crate::physics::{AtmosphereSample, DensityModel, DragModel, GravityModel, TemperatureTable};
    pub use crate::vehicle::{VehicleConfig, VehicleConfigBuilder};
}
