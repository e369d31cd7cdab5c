pub mod euler;
pub mod rk45;
pub mod runner;

pub use euler::euler_step;
pub use runner::{simulate, AscentSimulator};
