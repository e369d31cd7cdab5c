use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Vertical point-mass state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub time: f64,     // s
    pub velocity: f64, // m/s, positive up
    pub altitude: f64, // m
    pub mass: f64,     // kg
}

impl VehicleState {
    /// State at t = 0.
    pub fn initial(velocity: f64, altitude: f64, mass: f64) -> Self {
        Self { time: 0.0, velocity, altitude, mass }
    }

    /// Advance state by a derivative scaled by dt.
    pub fn apply(&self, d: &Deriv, dt: f64) -> VehicleState {
        VehicleState {
            time: self.time + dt,
            velocity: self.velocity + d.dvel * dt,
            altitude: self.altitude + d.dalt * dt,
            mass: self.mass + d.dmass * dt,
        }
    }
}

// ---------------------------------------------------------------------------
// State derivative (dv/dt, dh/dt, dm/dt)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dvel: f64,  // net vertical acceleration
    pub dalt: f64,  // vertical velocity
    pub dmass: f64, // negative while burning
}

// ---------------------------------------------------------------------------
// Trajectory output
// ---------------------------------------------------------------------------

/// One row of a produced trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub mass: f64,
    pub pitch_deg: f64,
    pub drag: f64, // N
    pub mach: f64,
}

// ---------------------------------------------------------------------------
// Integration strategy
// ---------------------------------------------------------------------------

/// How the fixed-step scheme updates mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassUpdate {
    /// `m -= rate(m) * dt` every step.
    #[default]
    Accumulated,
    /// `m = m0 - burn_rate * t` while burning; frozen once the dry mass is hit.
    ElapsedTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Integrator {
    /// Explicit Euler, altitude advanced with the pre-update velocity.
    Euler {
        dt: f64,
        #[serde(default)]
        mass_update: MassUpdate,
    },
    /// Adaptive Dormand-Prince 5(4), sampled at `samples` evenly spaced times.
    Rk45 {
        samples: usize,
        #[serde(default = "default_rtol")]
        rtol: f64,
        #[serde(default = "default_atol")]
        atol: f64,
    },
}

fn default_rtol() -> f64 {
    1e-3
}

fn default_atol() -> f64 {
    1e-6
}

impl Integrator {
    pub fn euler(dt: f64) -> Self {
        Integrator::Euler { dt, mass_update: MassUpdate::Accumulated }
    }

    pub fn rk45(samples: usize) -> Self {
        Integrator::Rk45 { samples, rtol: default_rtol(), atol: default_atol() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Integrator::Euler { .. } => "euler",
            Integrator::Rk45 { .. } => "rk45",
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub end_time: f64, // s, runs always stop here
    pub integrator: Integrator,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            end_time: 129.0,
            integrator: Integrator::euler(1.0),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.end_time > 0.0) {
            return Err(ConfigError::NonPositiveEndTime(self.end_time));
        }
        match self.integrator {
            Integrator::Euler { dt, .. } => {
                if !(dt > 0.0) {
                    return Err(ConfigError::NonPositiveTimeStep(dt));
                }
            }
            Integrator::Rk45 { samples, rtol, atol } => {
                if samples < 2 {
                    return Err(ConfigError::TooFewSamples(samples));
                }
                if !(rtol > 0.0) {
                    return Err(ConfigError::NonPositive { name: "relative tolerance", value: rtol });
                }
                if !(atol > 0.0) {
                    return Err(ConfigError::NonPositive { name: "absolute tolerance", value: atol });
                }
            }
        }
        Ok(())
    }
}
