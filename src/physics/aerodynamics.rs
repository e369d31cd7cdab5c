use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Drag coefficient policies
// ---------------------------------------------------------------------------

/// How the drag coefficient is chosen along the flight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DragModel {
    /// Transonic step table in Mach with the off-axis area factor.
    #[default]
    MachTable,
    /// Fixed coefficient, no attitude dependence.
    Constant { cd: f64 },
}

/// Coarse transonic drag-rise/fall table.
pub fn drag_coefficient(mach: f64) -> f64 {
    if mach < 0.5 {
        1.0
    } else if mach < 1.5 {
        0.6
    } else if mach < 3.0 {
        0.4
    } else {
        0.3
    }
}

/// Effective-area multiplier for flying at `pitch_deg` off vertical.
pub fn attitude_factor(pitch_deg: f64) -> f64 {
    1.0 + 0.5 * pitch_deg.to_radians().sin()
}

/// Drag magnitude (N). Uses `velocity^2`, so the caller subtracts it
/// from the upward force on ascent.
pub fn drag_force(model: DragModel, density: f64, mach: f64, area: f64, velocity: f64, pitch_deg: f64) -> f64 {
    let q_dyn = 0.5 * density * velocity * velocity;
    match model {
        DragModel::MachTable => q_dyn * drag_coefficient(mach) * area * attitude_factor(pitch_deg),
        DragModel::Constant { cd } => q_dyn * cd * area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cd_breakpoints_are_exact() {
        assert_eq!(drag_coefficient(0.0), 1.0);
        assert_eq!(drag_coefficient(0.499_999), 1.0);
        assert_eq!(drag_coefficient(0.5), 0.6);
        assert_eq!(drag_coefficient(1.499_999), 0.6);
        assert_eq!(drag_coefficient(1.5), 0.4);
        assert_eq!(drag_coefficient(2.999_999), 0.4);
        assert_eq!(drag_coefficient(3.0), 0.3);
        assert_eq!(drag_coefficient(25.0), 0.3);
    }

    #[test]
    fn no_drag_at_rest() {
        assert_eq!(drag_force(DragModel::MachTable, 1.2, 0.0, 6.6, 0.0, 45.0), 0.0);
    }

    #[test]
    fn vertical_flight_has_unit_attitude_factor() {
        let f = drag_force(DragModel::MachTable, 0.084, 0.2, 6.6, 50.0, 0.0);
        assert_relative_eq!(f, 0.5 * 0.084 * 1.0 * 6.6 * 2500.0, max_relative = 1e-12);
    }

    #[test]
    fn horizontal_flight_adds_half_again() {
        let vertical = drag_force(DragModel::MachTable, 0.084, 2.0, 6.6, 600.0, 0.0);
        let horizontal = drag_force(DragModel::MachTable, 0.084, 2.0, 6.6, 600.0, 90.0);
        assert_relative_eq!(horizontal, 1.5 * vertical, epsilon = 1e-9);
    }

    #[test]
    fn drag_ignores_velocity_sign() {
        let up = drag_force(DragModel::MachTable, 0.05, 0.8, 6.6, 250.0, 10.0);
        let down = drag_force(DragModel::MachTable, 0.05, 0.8, 6.6, -250.0, 10.0);
        assert_eq!(up, down);
    }

    #[test]
    fn constant_model_skips_attitude() {
        let f = drag_force(DragModel::Constant { cd: 0.5 }, 1.2, 4.0, 6.2, 100.0, 60.0);
        assert_relative_eq!(f, 0.5 * 1.2 * 10_000.0 / 2.0 * 6.2, max_relative = 1e-12);
    }

    #[test]
    fn mach_table_is_default() {
        assert_eq!(DragModel::default(), DragModel::MachTable);
    }
}
