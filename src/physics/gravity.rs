use serde::{Deserialize, Serialize};

pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11; // m^3/(kg·s^2)

/// Gravity law used for the run. Both are radial inverse-square and agree
/// when `g0 == G * M / R^2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum GravityModel {
    /// `g0 * (R / (R + h))^2`
    SurfaceScaled { g0: f64 },
    /// `G * M / (R + h)^2`
    Newtonian { planet_mass: f64 },
}

impl GravityModel {
    /// Gravitational acceleration magnitude (m/s^2) at `altitude` above a
    /// body of radius `planet_radius`.
    pub fn accel(&self, altitude: f64, planet_radius: f64) -> f64 {
        match *self {
            GravityModel::SurfaceScaled { g0 } => {
                g0 * (planet_radius / (planet_radius + altitude)).powi(2)
            }
            GravityModel::Newtonian { planet_mass } => {
                GRAVITATIONAL_CONSTANT * planet_mass / (planet_radius + altitude).powi(2)
            }
        }
    }

    /// Surface value of the law for a body of radius `planet_radius`.
    pub fn surface(&self, planet_radius: f64) -> f64 {
        self.accel(0.0, planet_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const KERBIN_RADIUS: f64 = 600_000.0;
    const KERBIN_MASS: f64 = 5.2915158e22;

    #[test]
    fn surface_value_is_g0() {
        let g = GravityModel::SurfaceScaled { g0: 9.81 };
        assert_relative_eq!(g.surface(KERBIN_RADIUS), 9.81);
    }

    #[test]
    fn gravity_decreases_with_altitude() {
        let g = GravityModel::SurfaceScaled { g0: 9.81 };
        assert!(g.accel(70_000.0, KERBIN_RADIUS) < g.accel(0.0, KERBIN_RADIUS));
    }

    #[test]
    fn forms_agree_when_g0_matches() {
        let newton = GravityModel::Newtonian { planet_mass: KERBIN_MASS };
        let scaled = GravityModel::SurfaceScaled { g0: newton.surface(KERBIN_RADIUS) };
        for h in [0.0, 1_000.0, 25_000.0, 80_000.0] {
            assert_relative_eq!(
                scaled.accel(h, KERBIN_RADIUS),
                newton.accel(h, KERBIN_RADIUS),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn kerbin_newtonian_surface_gravity() {
        let newton = GravityModel::Newtonian { planet_mass: KERBIN_MASS };
        assert_relative_eq!(newton.surface(KERBIN_RADIUS), 9.81, epsilon = 0.01);
    }
}
