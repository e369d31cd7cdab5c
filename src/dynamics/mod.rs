pub mod state;

use crate::error::{AscentError, Result};
use crate::gnc::commanded_pitch;
use crate::physics::{aerodynamics, fuel_consumption_rate, thrust_force, AtmosphereSample};
use crate::vehicle::VehicleConfig;

use self::state::{Deriv, TrajectorySample, VehicleState};

// ---------------------------------------------------------------------------
// Equations of motion (1D vertical point mass)
// ---------------------------------------------------------------------------

/// Intermediate physical quantities at one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    pub pitch_deg: f64,
    pub atmosphere: AtmosphereSample,
    pub thrust: f64,    // N, up
    pub drag: f64,      // N, magnitude
    pub gravity: f64,   // m/s^2
    pub fuel_rate: f64, // kg/s consumed
}

impl Forces {
    /// Evaluate the force model at `state`.
    ///
    /// Forces modeled:
    ///   1. Gravity: inverse-square, down
    ///   2. Thrust: full while above dry mass, throttled after
    ///   3. Drag: quadratic in velocity, attitude-scaled for the Mach table
    pub fn at(state: &VehicleState, vehicle: &VehicleConfig) -> Result<Self> {
        let pitch_deg = commanded_pitch(vehicle.pitch_program.as_ref(), state.altitude);
        let atmosphere =
            AtmosphereSample::at(&vehicle.density, state.altitude, state.velocity, state.time)?;
        let drag = aerodynamics::drag_force(
            vehicle.drag,
            atmosphere.density,
            atmosphere.mach,
            vehicle.area,
            state.velocity,
            pitch_deg,
        );

        Ok(Forces {
            pitch_deg,
            atmosphere,
            thrust: thrust_force(
                state.mass,
                vehicle.dry_mass,
                vehicle.max_thrust,
                vehicle.throttled_fraction,
            ),
            drag,
            gravity: vehicle.gravity.accel(state.altitude, vehicle.planet_radius),
            fuel_rate: fuel_consumption_rate(state.mass, vehicle.dry_mass, vehicle.burn_rate),
        })
    }

    /// `(thrust - drag - m g) / m`. Zero mass has no defined acceleration.
    pub fn net_accel(&self, state: &VehicleState) -> Result<f64> {
        if state.mass == 0.0 {
            return Err(AscentError::ZeroMass { time: state.time });
        }
        Ok((self.thrust - self.drag - state.mass * self.gravity) / state.mass)
    }
}

/// State derivative `[a, v, -mdot]`.
pub fn derivatives(state: &VehicleState, vehicle: &VehicleConfig) -> Result<Deriv> {
    let forces = Forces::at(state, vehicle)?;
    Ok(Deriv {
        dvel: forces.net_accel(state)?,
        dalt: state.velocity,
        dmass: -forces.fuel_rate,
    })
}

/// Package a state as an output row, re-evaluating drag and Mach there.
pub fn observe(state: &VehicleState, vehicle: &VehicleConfig) -> Result<TrajectorySample> {
    let forces = Forces::at(state, vehicle)?;
    Ok(TrajectorySample {
        time: state.time,
        altitude: state.altitude,
        velocity: state.velocity,
        mass: state.mass,
        pitch_deg: forces.pitch_deg,
        drag: forces.drag,
        mach: forces.atmosphere.mach,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
