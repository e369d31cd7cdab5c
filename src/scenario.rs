//! Scenario files: a vehicle, an initial state and integration settings in
//! one TOML document.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dynamics::state::{SimConfig, TrajectorySample, VehicleState};
use crate::error::Result;
use crate::gnc::PitchProgram;
use crate::io::telemetry::load_temperature_table;
use crate::physics::atmosphere::{
    DEFAULT_BAROMETRIC_GRAVITY, DEFAULT_FALLBACK_TEMPERATURE, DEFAULT_TABLE_CUTOFF, DEFAULT_TABLE_RHO0,
};
use crate::physics::{DensityModel, DragModel, GravityModel};
use crate::sim::AscentSimulator;
use crate::vehicle::{VehicleConfig, DEFAULT_THROTTLED_FRACTION};

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    name: String,
    vehicle: VehicleSection,
    gravity: GravityModel,
    atmosphere: AtmosphereSection,
    #[serde(default)]
    drag: DragModel,
    #[serde(default)]
    pitch_program: Option<PitchProgram>,
    #[serde(default)]
    initial: InitialSection,
    sim: SimConfig,
}

#[derive(Debug, Deserialize)]
struct VehicleSection {
    dry_mass: f64,
    propellant_mass: f64,
    max_thrust: f64,
    #[serde(default = "default_throttled_fraction")]
    throttled_fraction: f64,
    burn_rate: f64,
    area: f64,
    planet_radius: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
enum AtmosphereSection {
    Exponential {
        rho0: f64,
        scale_height: f64,
    },
    TemperatureIndexed {
        /// JSON temperature log, relative to the scenario file.
        table: PathBuf,
        #[serde(default = "default_table_rho0")]
        rho0: f64,
        #[serde(default = "default_cutoff")]
        cutoff: f64,
        #[serde(default = "default_fallback")]
        fallback_temperature: f64,
        #[serde(default = "default_barometric_gravity")]
        gravity: f64,
    },
}

fn default_throttled_fraction() -> f64 {
    DEFAULT_THROTTLED_FRACTION
}

fn default_table_rho0() -> f64 {
    DEFAULT_TABLE_RHO0
}

fn default_cutoff() -> f64 {
    DEFAULT_TABLE_CUTOFF
}

fn default_fallback() -> f64 {
    DEFAULT_FALLBACK_TEMPERATURE
}

fn default_barometric_gravity() -> f64 {
    DEFAULT_BAROMETRIC_GRAVITY
}

#[derive(Debug, Default, Deserialize)]
struct InitialSection {
    #[serde(default)]
    velocity: f64,
    #[serde(default)]
    altitude: f64,
    /// Defaults to dry + propellant mass.
    #[serde(default)]
    mass: Option<f64>,
}

impl AtmosphereSection {
    fn resolve(self, base_dir: &Path) -> Result<DensityModel> {
        Ok(match self {
            AtmosphereSection::Exponential { rho0, scale_height } => {
                DensityModel::Exponential { rho0, scale_height }
            }
            AtmosphereSection::TemperatureIndexed {
                table,
                rho0,
                cutoff,
                fallback_temperature,
                gravity,
            } => DensityModel::TemperatureIndexed {
                rho0,
                table: load_temperature_table(base_dir.join(table))?,
                cutoff,
                fallback_temperature,
                gravity,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Everything needed for one run.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub vehicle: VehicleConfig,
    pub initial: VehicleState,
    pub sim: SimConfig,
}

impl Scenario {
    /// Parse a scenario; relative table paths resolve against `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self> {
        let file: ScenarioFile = toml::from_str(text)?;
        let v = file.vehicle;
        let vehicle = VehicleConfig {
            dry_mass: v.dry_mass,
            propellant_mass: v.propellant_mass,
            max_thrust: v.max_thrust,
            throttled_fraction: v.throttled_fraction,
            burn_rate: v.burn_rate,
            area: v.area,
            planet_radius: v.planet_radius,
            gravity: file.gravity,
            density: file.atmosphere.resolve(base_dir)?,
            drag: file.drag,
            pitch_program: file.pitch_program,
        };
        let initial = VehicleState::initial(
            file.initial.velocity,
            file.initial.altitude,
            file.initial.mass.unwrap_or_else(|| vehicle.launch_mass()),
        );
        Ok(Scenario { name: file.name, vehicle, initial, sim: file.sim })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&text, base_dir)
    }

    pub fn simulator(&self) -> Result<AscentSimulator> {
        AscentSimulator::new(self.vehicle.clone(), self.sim)
    }

    pub fn run(&self) -> Result<Vec<TrajectorySample>> {
        self.simulator()?.run(&self.initial)
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::dynamics::state::{Integrator, MassUpdate};
    use crate::physics::TemperatureTable;
    use crate::vehicle::VehicleConfigBuilder;

    pub const KERBIN_MASS: f64 = 5.2915158e22; // kg

    /// Kerbin single-stage gravity turn, 129 s of 1 s Euler steps from 1 m.
    pub fn kerbin_gravity_turn() -> Scenario {
        let vehicle = VehicleConfigBuilder::new().build();
        Scenario {
            name: "Kerbin gravity turn".into(),
            initial: VehicleState::initial(0.0, 1.0, vehicle.launch_mass()),
            vehicle,
            sim: SimConfig { end_time: 129.0, integrator: Integrator::euler(1.0) },
        }
    }

    /// Vertical climb against a recorded temperature log: constant drag
    /// coefficient, Newtonian gravity, mass recomputed from elapsed time.
    pub fn kerbin_flight_log(table: TemperatureTable) -> Scenario {
        let diameter: f64 = 2.81;
        let launch_mass = 133_630.0;
        let vehicle = VehicleConfigBuilder::new()
            .propellant_mass(launch_mass - 61_700.0)
            .area(std::f64::consts::PI * (diameter / 2.0).powi(2))
            .gravity(GravityModel::Newtonian { planet_mass: KERBIN_MASS })
            .density(DensityModel::temperature_indexed(table))
            .drag(DragModel::Constant { cd: 0.5 })
            .pitch_program(None)
            .build();
        Scenario {
            name: "Kerbin flight log".into(),
            initial: VehicleState::initial(0.0, 0.0, launch_mass),
            vehicle,
            sim: SimConfig {
                end_time: 103.0,
                integrator: Integrator::Euler { dt: 1.0, mass_update: MassUpdate::ElapsedTime },
            },
        }
    }
}
