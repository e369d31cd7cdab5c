use serde::{Deserialize, Serialize};

use crate::error::{AscentError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MOLAR_MASS_AIR: f64 = 29.0;       // g/mol, used unscaled in the barometric exponent
pub const GAS_CONSTANT: f64 = 8.314;        // J/(mol·K)

const T0: f64 = 288.15;                     // sea-level temperature, K
const LAPSE_RATE: f64 = 0.0065;             // K/m
const SOUND_SPEED_SEA_LEVEL: f64 = 340.29;  // m/s

pub const DEFAULT_TABLE_CUTOFF: f64 = 103.0;       // s
pub const DEFAULT_FALLBACK_TEMPERATURE: f64 = 219.0; // K
pub const DEFAULT_TABLE_RHO0: f64 = 1.2;           // kg/m^3
pub const DEFAULT_BAROMETRIC_GRAVITY: f64 = 9.81;  // m/s^2

// ---------------------------------------------------------------------------
// Temperature table
// ---------------------------------------------------------------------------

/// One recorded entry of a flight temperature log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    #[serde(default)]
    pub air_temperature: Option<f64>,
}

/// Ambient temperature indexed by whole elapsed seconds.
///
/// Entries are kept as recorded; a missing or non-physical entry is only
/// reported when a lookup actually needs it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemperatureTable {
    temperatures: Vec<Option<f64>>,
}

impl TemperatureTable {
    pub fn from_records(records: &[TemperatureRecord]) -> Self {
        Self {
            temperatures: records.iter().map(|r| r.air_temperature).collect(),
        }
    }

    /// Table where every entry is known.
    pub fn from_kelvin(temperatures: impl IntoIterator<Item = f64>) -> Self {
        Self {
            temperatures: temperatures.into_iter().map(Some).collect(),
        }
    }

    /// Table of `len` entries all at `kelvin`.
    pub fn uniform(kelvin: f64, len: usize) -> Self {
        Self::from_kelvin(std::iter::repeat(kelvin).take(len))
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// Temperature for elapsed `time`, falling back to `fallback` past `cutoff`
    /// or past the end of the table.
    pub fn temperature_at(&self, time: f64, cutoff: f64, fallback: f64) -> Result<f64> {
        let index = time.max(0.0).floor() as usize;
        if index as f64 > cutoff || index >= self.temperatures.len() {
            return Ok(fallback);
        }
        match self.temperatures[index] {
            Some(t) if t.is_finite() && t > 0.0 => Ok(t),
            Some(t) => Err(AscentError::TemperatureLookup {
                index,
                reason: format!("non-physical air temperature {t} K"),
            }),
            None => Err(AscentError::TemperatureLookup {
                index,
                reason: "air_temperature is missing".into(),
            }),
        }
    }

    /// Checks every entry a run ending at `end_time` can reach.
    pub fn check_through(&self, end_time: f64, cutoff: f64, fallback: f64) -> Result<()> {
        let last = end_time.min(cutoff).max(0.0).floor() as usize;
        for second in 0..=last.min(self.temperatures.len().saturating_sub(1)) {
            self.temperature_at(second as f64, cutoff, fallback)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Density policies
// ---------------------------------------------------------------------------

/// Atmospheric density policy, fixed for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub enum DensityModel {
    /// `rho0 * exp(-h / scale_height)`
    Exponential { rho0: f64, scale_height: f64 },
    /// Isothermal barometric formula with the temperature taken from a
    /// per-second flight log.
    TemperatureIndexed {
        rho0: f64,
        table: TemperatureTable,
        cutoff: f64,
        fallback_temperature: f64,
        gravity: f64,
    },
}

impl DensityModel {
    pub fn exponential(rho0: f64, scale_height: f64) -> Self {
        DensityModel::Exponential { rho0, scale_height }
    }

    /// Temperature-indexed policy with the flight-log defaults
    /// (rho0 = 1.2, cutoff 103 s, fallback 219 K, g = 9.81).
    pub fn temperature_indexed(table: TemperatureTable) -> Self {
        DensityModel::TemperatureIndexed {
            rho0: DEFAULT_TABLE_RHO0,
            table,
            cutoff: DEFAULT_TABLE_CUTOFF,
            fallback_temperature: DEFAULT_FALLBACK_TEMPERATURE,
            gravity: DEFAULT_BAROMETRIC_GRAVITY,
        }
    }

    /// Density (kg/m^3) at `altitude` and elapsed `time`.
    pub fn density(&self, altitude: f64, time: f64) -> Result<f64> {
        match self {
            DensityModel::Exponential { rho0, scale_height } => {
                Ok(rho0 * (-altitude / scale_height).exp())
            }
            DensityModel::TemperatureIndexed {
                rho0,
                table,
                cutoff,
                fallback_temperature,
                gravity,
            } => {
                let temp = table.temperature_at(time, *cutoff, *fallback_temperature)?;
                let rt = GAS_CONSTANT * temp;
                // M is in g/mol here, so the exponent underflows and the
                // density is exactly 0.0 above roughly 4.8 km at 219 K.
                Ok(rho0 * (-altitude * MOLAR_MASS_AIR * gravity / rt).exp() * MOLAR_MASS_AIR / rt)
            }
        }
    }

    pub(crate) fn validate(&self, end_time: f64) -> Result<()> {
        use crate::error::ConfigError;
        match self {
            DensityModel::Exponential { rho0, scale_height } => {
                if !(*rho0 >= 0.0) {
                    return Err(ConfigError::Negative { name: "reference density", value: *rho0 }.into());
                }
                if !(*scale_height > 0.0) {
                    return Err(ConfigError::NonPositive { name: "scale height", value: *scale_height }.into());
                }
                Ok(())
            }
            DensityModel::TemperatureIndexed {
                rho0,
                table,
                cutoff,
                fallback_temperature,
                ..
            } => {
                if !(*rho0 >= 0.0) {
                    return Err(ConfigError::Negative { name: "reference density", value: *rho0 }.into());
                }
                if !(*fallback_temperature > 0.0) {
                    return Err(ConfigError::NonPositive {
                        name: "fallback temperature",
                        value: *fallback_temperature,
                    }
                    .into());
                }
                table.check_through(end_time, *cutoff, *fallback_temperature)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Speed of sound / Mach
// ---------------------------------------------------------------------------

/// Speed of sound from a linear tropospheric lapse.
///
/// The lapse is not bounded: above ~44.3 km the temperature goes
/// non-positive and the result is NaN.
pub fn speed_of_sound(altitude: f64) -> f64 {
    let temperature = T0 - LAPSE_RATE * altitude;
    SOUND_SPEED_SEA_LEVEL * (temperature / T0).sqrt()
}

pub fn mach_number(velocity: f64, altitude: f64) -> f64 {
    velocity / speed_of_sound(altitude)
}

/// Derived atmospheric quantities at one point of the flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereSample {
    pub density: f64,    // kg/m^3
    pub mach: f64,
}

impl AtmosphereSample {
    pub fn at(model: &DensityModel, altitude: f64, velocity: f64, time: f64) -> Result<Self> {
        Ok(Self {
            density: model.density(altitude, time)?,
            mach: mach_number(velocity, altitude),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
