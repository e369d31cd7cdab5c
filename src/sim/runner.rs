use log::{debug, trace, warn};

use crate::dynamics::state::{Deriv, Integrator, MassUpdate, SimConfig, TrajectorySample, VehicleState};
use crate::dynamics::{derivatives, observe};
use crate::error::Result;
use crate::vehicle::VehicleConfig;
use super::euler::euler_step;
use super::rk45;

// ---------------------------------------------------------------------------
// Ascent simulator
// ---------------------------------------------------------------------------

/// Validated vehicle + integration settings. Runs are pure: the same
/// simulator and initial state always give the same trajectory.
#[derive(Debug, Clone)]
pub struct AscentSimulator {
    vehicle: VehicleConfig,
    config: SimConfig,
}

impl AscentSimulator {
    /// Checks both configs before anything is integrated.
    pub fn new(vehicle: VehicleConfig, config: SimConfig) -> Result<Self> {
        config.validate()?;
        let horizon = match config.integrator {
            Integrator::Rk45 { samples, .. } if samples > 1 => {
                config.end_time * (1.0 + rk45::OVERRUN / (samples - 1) as f64)
            }
            _ => config.end_time,
        };
        vehicle.validate(horizon)?;
        Ok(Self { vehicle, config })
    }

    pub fn vehicle(&self) -> &VehicleConfig {
        &self.vehicle
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Right-hand side of the ascent ODE at `state`.
    pub fn derivative(&self, state: &VehicleState) -> Result<Deriv> {
        derivatives(state, &self.vehicle)
    }

    /// Integrate from `initial` to the configured end time.
    pub fn run(&self, initial: &VehicleState) -> Result<Vec<TrajectorySample>> {
        debug!(
            "ascent run: {} to t={} s from h={} m, v={} m/s, m={} kg",
            self.config.integrator.name(),
            self.config.end_time,
            initial.altitude,
            initial.velocity,
            initial.mass
        );

        let states = match self.config.integrator {
            Integrator::Euler { dt, mass_update } => self.run_euler(initial, dt, mass_update)?,
            Integrator::Rk45 { samples, rtol, atol } => {
                rk45::integrate(&self.vehicle, initial, self.config.end_time, samples, rtol, atol)?
            }
        };

        if let Some(s) = states.iter().find(|s| s.mass < self.vehicle.dry_mass) {
            warn!(
                "mass fell below dry mass ({:.1} < {:.1} kg) at t={:.2} s; continuing on the throttled branch",
                s.mass, self.vehicle.dry_mass, s.time
            );
        }

        let trajectory = states
            .iter()
            .map(|s| observe(s, &self.vehicle))
            .collect::<Result<Vec<_>>>()?;

        if let Some(last) = trajectory.last() {
            debug!(
                "ascent done: {} samples, final h={:.1} m, v={:.1} m/s, m={:.1} kg",
                trajectory.len(),
                last.altitude,
                last.velocity,
                last.mass
            );
        }
        Ok(trajectory)
    }

    fn run_euler(&self, initial: &VehicleState, dt: f64, mass_update: MassUpdate) -> Result<Vec<VehicleState>> {
        let end_time = self.config.end_time;
        let capacity = ((end_time - initial.time) / dt).ceil().max(0.0) as usize + 1;
        let mut states = Vec::with_capacity(capacity.min(1_000_000));
        let mut state = *initial;
        states.push(state);

        loop {
            let remaining = end_time - state.time;
            if remaining <= dt * 1e-9 {
                break;
            }
            state = euler_step(&state, &self.vehicle, dt.min(remaining), mass_update, initial.mass)?;
            trace!(
                "t={:.3} h={:.3} v={:.3} m={:.3}",
                state.time,
                state.altitude,
                state.velocity,
                state.mass
            );
            states.push(state);
        }
        Ok(states)
    }
}

/// Validate, then run once.
pub fn simulate(vehicle: &VehicleConfig, config: &SimConfig, initial: &VehicleState) -> Result<Vec<TrajectorySample>> {
    AscentSimulator::new(vehicle.clone(), *config)?.run(initial)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AscentError, ConfigError};
    use crate::vehicle::VehicleConfigBuilder;

    fn kerbin() -> VehicleConfig {
        VehicleConfigBuilder::new().build()
    }

    #[test]
    fn euler_emits_initial_plus_one_per_step() {
        let v = kerbin();
        let cfg = SimConfig { end_time: 129.0, integrator: Integrator::euler(1.0) };
        let traj = simulate(&v, &cfg, &VehicleState::initial(0.0, 1.0, 133_200.0)).unwrap();
        assert_eq!(traj.len(), 130);
        assert_eq!(traj[0].time, 0.0);
        assert_eq!(traj[129].time, 129.0);
    }

    #[test]
    fn euler_lands_on_end_time_with_uneven_step() {
        let v = kerbin();
        let cfg = SimConfig { end_time: 10.0, integrator: Integrator::euler(3.0) };
        let traj = simulate(&v, &cfg, &v.launch_state()).unwrap();
        let times: Vec<f64> = traj.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn rocket_goes_up() {
        let v = kerbin();
        let cfg = SimConfig { end_time: 60.0, integrator: Integrator::euler(1.0) };
        let traj = simulate(&v, &cfg, &v.launch_state()).unwrap();
        let last = traj.last().unwrap();
        assert!(last.altitude > 1_000.0, "Rocket should be >1 km after a minute");
        assert!(last.velocity > 0.0);
    }

    #[test]
    fn bad_config_fails_before_running() {
        let v = VehicleConfigBuilder::new().burn_rate(-3.0).build();
        let err = AscentSimulator::new(v, SimConfig::default()).unwrap_err();
        assert!(matches!(err, AscentError::Config(ConfigError::NegativeBurnRate(_))));

        let err = AscentSimulator::new(kerbin(), SimConfig { end_time: -1.0, ..SimConfig::default() }).unwrap_err();
        assert!(matches!(err, AscentError::Config(ConfigError::NonPositiveEndTime(_))));
    }

    #[test]
    fn zero_mass_surfaces_as_error() {
        let v = kerbin();
        let sim = AscentSimulator::new(v, SimConfig::default()).unwrap();
        let err = sim.run(&VehicleState::initial(0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, AscentError::ZeroMass { .. }));
    }

    #[test]
    fn overburn_is_not_fatal() {
        // 30 kg of propellant at 400 kg/s runs out inside the first step.
        let v = VehicleConfigBuilder::new().dry_mass(1_000.0).propellant_mass(30.0).max_thrust(50_000.0).build();
        let cfg = SimConfig { end_time: 5.0, integrator: Integrator::euler(1.0) };
        let traj = simulate(&v, &cfg, &v.launch_state()).unwrap();
        assert_eq!(traj[1].mass, 630.0);
        assert!(traj.iter().skip(1).all(|s| s.mass == 630.0));
    }

    #[test]
    fn derivative_exposed() {
        let sim = AscentSimulator::new(kerbin(), SimConfig::default()).unwrap();
        let d = sim.derivative(&VehicleState::initial(0.0, 0.0, 133_200.0)).unwrap();
        assert_eq!(d.dmass, -400.0);
    }
}
