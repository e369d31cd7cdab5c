pub mod aerodynamics;
pub mod atmosphere;
pub mod gravity;
pub mod propulsion;

pub use aerodynamics::{drag_coefficient, drag_force, DragModel};
pub use atmosphere::{mach_number, speed_of_sound, AtmosphereSample, DensityModel, TemperatureTable};
pub use gravity::GravityModel;
pub use propulsion::{fuel_consumption_rate, thrust_force};
