use crate::dynamics::state::{MassUpdate, VehicleState};
use crate::dynamics::Forces;
use crate::error::Result;
use crate::vehicle::VehicleConfig;

// ---------------------------------------------------------------------------
// Fixed-step explicit Euler
// ---------------------------------------------------------------------------

/// Single Euler step of length `dt`.
///
/// Forces are taken at the current state. Altitude advances with the
/// velocity from before this step's update, which the reference
/// trajectories are tuned to. `launch_mass` anchors the elapsed-time mass
/// policy.
pub fn euler_step(
    state: &VehicleState,
    vehicle: &VehicleConfig,
    dt: f64,
    mass_update: MassUpdate,
    launch_mass: f64,
) -> Result<VehicleState> {
    let forces = Forces::at(state, vehicle)?;
    let accel = forces.net_accel(state)?;
    let time = state.time + dt;

    let mass = match mass_update {
        MassUpdate::Accumulated => state.mass - forces.fuel_rate * dt,
        MassUpdate::ElapsedTime if forces.fuel_rate > 0.0 => launch_mass - vehicle.burn_rate * time,
        MassUpdate::ElapsedTime => state.mass,
    };

    let previous_velocity = state.velocity;
    Ok(VehicleState {
        time,
        velocity: previous_velocity + accel * dt,
        altitude: state.altitude + previous_velocity * dt,
        mass,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleConfigBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn altitude_uses_pre_update_velocity() {
        let v = VehicleConfigBuilder::new().build();
        let s = VehicleState { time: 5.0, velocity: 40.0, altitude: 100.0, mass: 130_000.0 };
        let n = euler_step(&s, &v, 1.0, MassUpdate::Accumulated, 133_200.0).unwrap();
        assert_eq!(n.altitude, 140.0);
        assert!(n.velocity > 40.0);
        assert_eq!(n.time, 6.0);
    }

    #[test]
    fn first_step_from_rest_keeps_altitude() {
        let v = VehicleConfigBuilder::new().build();
        let s = VehicleState::initial(0.0, 1.0, 133_200.0);
        let n = euler_step(&s, &v, 1.0, MassUpdate::Accumulated, 133_200.0).unwrap();
        assert_eq!(n.altitude, 1.0);
        assert_relative_eq!(n.velocity, (1_479_300.0 - 133_200.0 * 9.81 * (600_000.0f64 / 600_001.0).powi(2)) / 133_200.0, max_relative = 1e-9);
    }

    #[test]
    fn accumulated_mass_drops_by_rate_times_dt() {
        let v = VehicleConfigBuilder::new().build();
        let s = VehicleState::initial(0.0, 0.0, 100_000.0);
        let n = euler_step(&s, &v, 0.5, MassUpdate::Accumulated, 133_200.0).unwrap();
        assert_eq!(n.mass, 99_800.0);
    }

    #[test]
    fn elapsed_mass_recomputed_from_launch_mass() {
        let v = VehicleConfigBuilder::new().build();
        let s = VehicleState { time: 9.0, velocity: 100.0, altitude: 500.0, mass: 1.0e5 };
        let n = euler_step(&s, &v, 1.0, MassUpdate::ElapsedTime, 133_630.0).unwrap();
        assert_eq!(n.mass, 133_630.0 - 400.0 * 10.0);
    }

    #[test]
    fn elapsed_mass_freezes_at_dry_mass() {
        let v = VehicleConfigBuilder::new().build();
        let s = VehicleState { time: 300.0, velocity: 100.0, altitude: 500.0, mass: v.dry_mass };
        let n = euler_step(&s, &v, 1.0, MassUpdate::ElapsedTime, 133_200.0).unwrap();
        assert_eq!(n.mass, v.dry_mass);
    }
}
