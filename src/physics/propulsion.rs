//! Thrust and propellant flow. Both switch exactly at `mass == dry_mass`;
//! below the dry mass the throttled branch applies, however low the mass is.

pub fn thrust_force(mass: f64, dry_mass: f64, max_thrust: f64, throttled_fraction: f64) -> f64 {
    if mass > dry_mass {
        max_thrust
    } else {
        max_thrust * throttled_fraction
    }
}

pub fn fuel_consumption_rate(mass: f64, dry_mass: f64, burn_rate: f64) -> f64 {
    if mass > dry_mass {
        burn_rate
    } else {
        0.0
    }
}
