use std::cell::RefCell;

use ode_solvers::dopri5::Dopri5;
use ode_solvers::{System, Vector3};

use crate::dynamics::state::VehicleState;
use crate::dynamics::derivatives;
use crate::error::{AscentError, ConfigError, Result};
use crate::vehicle::VehicleConfig;

/// `[velocity, altitude, mass]`
pub type OdeState = Vector3<f64>;

// ---------------------------------------------------------------------------
// ODE system adapter
// ---------------------------------------------------------------------------

/// Exposes the force model to the Dormand-Prince stepper. The stepper
/// cannot carry errors, so the first one is parked in `fault` and the
/// derivative is zeroed until the caller collects it.
struct AscentOde<'a> {
    vehicle: &'a VehicleConfig,
    fault: &'a RefCell<Option<AscentError>>,
}

impl System<OdeState> for AscentOde<'_> {
    fn system(&self, t: f64, y: &OdeState, dy: &mut OdeState) {
        let state = VehicleState { time: t, velocity: y[0], altitude: y[1], mass: y[2] };
        match derivatives(&state, self.vehicle) {
            Ok(d) => {
                dy[0] = d.dvel;
                dy[1] = d.dalt;
                dy[2] = d.dmass;
            }
            Err(e) => {
                self.fault.borrow_mut().get_or_insert(e);
                dy.fill(0.0);
            }
        }
    }
}

/// How far past the last sample the stepper runs, in sample spacings, so the
/// final dense-output point is never lost to rounding.
pub const OVERRUN: f64 = 0.5;

/// Integrate from `initial` over `[initial.time, end_time]` and return the
/// state at `samples` evenly spaced times, both ends included.
pub fn integrate(
    vehicle: &VehicleConfig,
    initial: &VehicleState,
    end_time: f64,
    samples: usize,
    rtol: f64,
    atol: f64,
) -> Result<Vec<VehicleState>> {
    if samples < 2 {
        return Err(ConfigError::TooFewSamples(samples).into());
    }
    let t0 = initial.time;
    let spacing = (end_time - t0) / (samples - 1) as f64;
    let fault = RefCell::new(None);

    let ode = AscentOde { vehicle, fault: &fault };
    let y0 = OdeState::new(initial.velocity, initial.altitude, initial.mass);
    let mut stepper = Dopri5::new(ode, t0, end_time + OVERRUN * spacing, spacing, y0, rtol, atol);
    let stats = stepper
        .integrate()
        .map_err(|e| AscentError::Integration(e.to_string()));

    if let Some(e) = fault.borrow_mut().take() {
        return Err(e);
    }
    let stats = stats?;
    log::debug!("rk45 finished: {stats}");

    let mut states = Vec::with_capacity(samples);
    states.push(*initial);
    for (t, y) in stepper.x_out().iter().zip(stepper.y_out()) {
        if states.len() == samples {
            break;
        }
        // The initial point is already in place.
        if *t < t0 + 0.5 * spacing {
            continue;
        }
        let i = states.len();
        states.push(VehicleState {
            time: t0 + spacing * i as f64,
            velocity: y[0],
            altitude: y[1],
            mass: y[2],
        });
    }

    if states.len() != samples {
        return Err(AscentError::Integration(format!(
            "dense output produced {} of {} samples",
            states.len(),
            samples
        )));
    }
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{DensityModel, GravityModel};
    use crate::vehicle::VehicleConfigBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn samples_are_evenly_spaced_and_complete() {
        let v = VehicleConfigBuilder::new().build();
        let states = integrate(&v, &VehicleState::initial(0.0, 1.0, 133_200.0), 129.0, 1000, 1e-3, 1e-6).unwrap();
        assert_eq!(states.len(), 1000);
        assert_eq!(states[0].time, 0.0);
        assert_relative_eq!(states[999].time, 129.0, epsilon = 1e-9);
        assert_relative_eq!(states[1].time - states[0].time, 129.0 / 999.0, epsilon = 1e-12);
    }

    #[test]
    fn vacuum_constant_mass_matches_kinematics() {
        let v = VehicleConfigBuilder::new()
            .area(0.0)
            .burn_rate(0.0)
            .gravity(GravityModel::SurfaceScaled { g0: 9.81 })
            .planet_radius(1.0e15)
            .density(DensityModel::exponential(0.084, 5_000.0))
            .build();
        let m = 133_200.0;
        let a = (1_479_300.0 - m * 9.81) / m;
        let states = integrate(&v, &VehicleState::initial(0.0, 0.0, m), 60.0, 61, 1e-8, 1e-8).unwrap();
        for s in &states {
            assert_relative_eq!(s.velocity, a * s.time, epsilon = 1e-6);
            assert_relative_eq!(s.altitude, 0.5 * a * s.time * s.time, epsilon = 1e-4);
            assert_eq!(s.mass, m);
        }
    }
}
