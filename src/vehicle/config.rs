use crate::dynamics::state::VehicleState;
use crate::error::{ConfigError, Result};
use crate::gnc::PitchProgram;
use crate::physics::{DensityModel, DragModel, GravityModel};

/// Share of max thrust kept once the dry mass is reached, unless configured.
pub const DEFAULT_THROTTLED_FRACTION: f64 = 0.6;

// ---------------------------------------------------------------------------
// Vehicle + planet constants for one run
// ---------------------------------------------------------------------------

/// Immutable constants of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleConfig {
    pub dry_mass: f64,           // kg
    pub propellant_mass: f64,    // kg
    pub max_thrust: f64,         // N
    pub throttled_fraction: f64, // share of max thrust once dry mass is reached
    pub burn_rate: f64,          // kg/s
    pub area: f64,               // reference cross-section, m^2
    pub planet_radius: f64,      // m
    pub gravity: GravityModel,
    pub density: DensityModel,
    pub drag: DragModel,
    pub pitch_program: Option<PitchProgram>,
}

impl VehicleConfig {
    /// Wet mass at ignition.
    pub fn launch_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    /// At rest on the surface with full tanks.
    pub fn launch_state(&self) -> VehicleState {
        VehicleState::initial(0.0, 0.0, self.launch_mass())
    }

    /// Surface gravitational acceleration of the configured planet.
    pub fn surface_gravity(&self) -> f64 {
        self.gravity.surface(self.planet_radius)
    }

    /// Thrust-to-weight ratio at ignition.
    pub fn twr(&self) -> f64 {
        self.max_thrust / (self.launch_mass() * self.surface_gravity())
    }

    /// Time to burn the propellant at the configured rate.
    pub fn burn_time(&self) -> f64 {
        if self.burn_rate > 0.0 {
            self.propellant_mass / self.burn_rate
        } else {
            f64::INFINITY
        }
    }

    /// Fail-fast checks run before integration. `end_time` is needed to
    /// check the temperature entries the run will read.
    pub fn validate(&self, end_time: f64) -> Result<()> {
        if !(self.burn_rate >= 0.0) {
            return Err(ConfigError::NegativeBurnRate(self.burn_rate).into());
        }
        if !(0.0..=1.0).contains(&self.throttled_fraction) {
            return Err(ConfigError::ThrottleOutOfRange(self.throttled_fraction).into());
        }
        for (name, value) in [
            ("dry mass", self.dry_mass),
            ("propellant mass", self.propellant_mass),
            ("max thrust", self.max_thrust),
            ("reference area", self.area),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value }.into());
            }
        }
        if !(self.planet_radius > 0.0) {
            return Err(ConfigError::NonPositive { name: "planet radius", value: self.planet_radius }.into());
        }
        if let Some(program) = &self.pitch_program {
            program.validate()?;
        }
        self.density.validate(end_time)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder seeded with the Kerbin single-stage ascent vehicle.
pub struct VehicleConfigBuilder {
    config: VehicleConfig,
}

impl Default for VehicleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: VehicleConfig {
                dry_mass: 61_700.0,
                propellant_mass: 71_500.0,
                max_thrust: 1_479_300.0,
                throttled_fraction: DEFAULT_THROTTLED_FRACTION,
                burn_rate: 400.0,
                area: 6.6,
                planet_radius: 600_000.0,
                gravity: GravityModel::SurfaceScaled { g0: 9.81 },
                density: DensityModel::exponential(0.084, 5_000.0),
                drag: DragModel::MachTable,
                pitch_program: Some(PitchProgram::new(250.0, 60_000.0)),
            },
        }
    }

    pub fn dry_mass(mut self, v: f64) -> Self { self.config.dry_mass = v; self }
    pub fn propellant_mass(mut self, v: f64) -> Self { self.config.propellant_mass = v; self }
    pub fn max_thrust(mut self, v: f64) -> Self { self.config.max_thrust = v; self }
    pub fn throttled_fraction(mut self, v: f64) -> Self { self.config.throttled_fraction = v; self }
    pub fn burn_rate(mut self, v: f64) -> Self { self.config.burn_rate = v; self }
    pub fn area(mut self, v: f64) -> Self { self.config.area = v; self }
    pub fn planet_radius(mut self, v: f64) -> Self { self.config.planet_radius = v; self }
    pub fn gravity(mut self, v: GravityModel) -> Self { self.config.gravity = v; self }
    pub fn density(mut self, v: DensityModel) -> Self { self.config.density = v; self }
    pub fn drag(mut self, v: DragModel) -> Self { self.config.drag = v; self }
    pub fn pitch_program(mut self, v: Option<PitchProgram>) -> Self { self.config.pitch_program = v; self }

    pub fn build(self) -> VehicleConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AscentError;
    use crate::physics::TemperatureTable;

    #[test]
    fn kerbin_defaults() {
        let v = VehicleConfigBuilder::new().build();
        assert_eq!(v.launch_mass(), 133_200.0);
        assert!(v.twr() > 1.0, "Kerbin vehicle must lift off");
        assert!((v.burn_time() - 178.75).abs() < 1e-9);
        assert!(v.validate(129.0).is_ok());
    }

    #[test]
    fn negative_burn_rate_rejected() {
        let v = VehicleConfigBuilder::new().burn_rate(-1.0).build();
        assert!(matches!(
            v.validate(10.0),
            Err(AscentError::Config(ConfigError::NegativeBurnRate(_)))
        ));
    }

    #[test]
    fn inverted_pitch_band_rejected() {
        let v = VehicleConfigBuilder::new()
            .pitch_program(Some(PitchProgram::new(60_000.0, 250.0)))
            .build();
        assert!(matches!(
            v.validate(10.0),
            Err(AscentError::Config(ConfigError::InvertedTurnBand { .. }))
        ));
    }

    #[test]
    fn nan_parameters_rejected() {
        let v = VehicleConfigBuilder::new().burn_rate(f64::NAN).build();
        assert!(matches!(
            v.validate(10.0),
            Err(AscentError::Config(ConfigError::NegativeBurnRate(_)))
        ));

        let v = VehicleConfigBuilder::new().dry_mass(f64::NAN).build();
        assert!(matches!(
            v.validate(10.0),
            Err(AscentError::Config(ConfigError::Negative { name: "dry mass", .. }))
        ));

        let v = VehicleConfigBuilder::new().area(f64::NAN).build();
        assert!(v.validate(10.0).is_err());

        let v = VehicleConfigBuilder::new().planet_radius(f64::NAN).build();
        assert!(v.validate(10.0).is_err());

        let v = VehicleConfigBuilder::new().density(DensityModel::exponential(f64::NAN, 5_000.0)).build();
        assert!(matches!(
            v.validate(10.0),
            Err(AscentError::Config(ConfigError::Negative { name: "reference density", .. }))
        ));

        let v = VehicleConfigBuilder::new()
            .pitch_program(Some(PitchProgram::new(250.0, f64::NAN)))
            .build();
        assert!(matches!(
            v.validate(10.0),
            Err(AscentError::Config(ConfigError::InvertedTurnBand { .. }))
        ));
    }

    #[test]
    fn throttle_fraction_bounded() {
        let v = VehicleConfigBuilder::new().throttled_fraction(1.5).build();
        assert!(v.validate(10.0).is_err());
    }

    #[test]
    fn zero_burn_rate_never_burns_out() {
        let v = VehicleConfigBuilder::new().burn_rate(0.0).build();
        assert!(v.burn_time().is_infinite());
        assert!(v.validate(10.0).is_ok());
    }

    #[test]
    fn broken_temperature_table_caught_up_front() {
        let mut temps: Vec<Option<f64>> = vec![Some(219.0); 20];
        temps[5] = None;
        let records: Vec<_> = temps
            .into_iter()
            .map(|t| crate::physics::atmosphere::TemperatureRecord { air_temperature: t })
            .collect();
        let v = VehicleConfigBuilder::new()
            .density(DensityModel::temperature_indexed(TemperatureTable::from_records(&records)))
            .build();
        assert!(matches!(
            v.validate(30.0),
            Err(AscentError::TemperatureLookup { index: 5, .. })
        ));
        assert!(v.validate(4.0).is_ok());
    }
}
