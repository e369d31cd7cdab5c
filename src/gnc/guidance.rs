use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Guidance: commanded pitch from vertical as a function of altitude
// ---------------------------------------------------------------------------

/// Linear gravity-turn program, 0 deg at `turn_start_altitude` rising to
/// 90 deg at `turn_end_altitude`.
///
/// Outside the band the line is extrapolated unless `clamped` is set, so
/// just above the pad the pitch is slightly negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchProgram {
    pub turn_start_altitude: f64, // m
    pub turn_end_altitude: f64,   // m
    #[serde(default)]
    pub clamped: bool,
}

impl PitchProgram {
    pub fn new(turn_start_altitude: f64, turn_end_altitude: f64) -> Self {
        Self { turn_start_altitude, turn_end_altitude, clamped: false }
    }

    pub fn clamped(mut self, clamped: bool) -> Self {
        self.clamped = clamped;
        self
    }

    /// Commanded pitch from vertical, degrees.
    pub fn pitch_deg(&self, altitude: f64) -> f64 {
        let pitch = 90.0 * (altitude - self.turn_start_altitude)
            / (self.turn_end_altitude - self.turn_start_altitude);
        if self.clamped {
            pitch.clamp(0.0, 90.0)
        } else {
            pitch
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.turn_end_altitude > self.turn_start_altitude) {
            return Err(ConfigError::InvertedTurnBand {
                start: self.turn_start_altitude,
                end: self.turn_end_altitude,
            });
        }
        Ok(())
    }
}

/// Pitch for an optional program; no program means vertical flight.
pub fn commanded_pitch(program: Option<&PitchProgram>, altitude: f64) -> f64 {
    program.map_or(0.0, |p| p.pitch_deg(altitude))
}
