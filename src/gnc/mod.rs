pub mod guidance;

pub use guidance::{commanded_pitch, PitchProgram};
