use serde::Serialize;

use crate::dynamics::state::TrajectorySample;
use super::telemetry::ReferenceTelemetry;

/// Model minus reference at one telemetry time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Residual {
    pub time: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub drag: f64,
    pub mass: Option<f64>,
}

/// Residuals plus RMS per column. Mass RMS is only present when every
/// compared telemetry record carries a mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub residuals: Vec<Residual>,
    pub rms_altitude: f64,
    pub rms_velocity: f64,
    pub rms_drag: f64,
    pub rms_mass: Option<f64>,
}

/// Linear interpolation of the trajectory at `time`; `None` outside its span.
pub fn interpolate(trajectory: &[TrajectorySample], time: f64) -> Option<TrajectorySample> {
    let first = trajectory.first()?;
    let last = trajectory.last()?;
    if time < first.time || time > last.time {
        return None;
    }
    let hi = trajectory.partition_point(|s| s.time < time);
    if hi == 0 {
        return Some(*first);
    }
    let (a, b) = (&trajectory[hi - 1], &trajectory[hi]);
    let span = b.time - a.time;
    if span <= 0.0 {
        return Some(*b);
    }
    let w = (time - a.time) / span;
    let lerp = |x: f64, y: f64| x + (y - x) * w;
    Some(TrajectorySample {
        time,
        altitude: lerp(a.altitude, b.altitude),
        velocity: lerp(a.velocity, b.velocity),
        mass: lerp(a.mass, b.mass),
        pitch_deg: lerp(a.pitch_deg, b.pitch_deg),
        drag: lerp(a.drag, b.drag),
        mach: lerp(a.mach, b.mach),
    })
}

/// Compare a produced trajectory against recorded telemetry. Telemetry rows
/// outside the trajectory's time span are skipped. The recorded drag is
/// compared by magnitude.
pub fn compare(trajectory: &[TrajectorySample], reference: &ReferenceTelemetry) -> Comparison {
    let residuals: Vec<Residual> = reference
        .points()
        .iter()
        .filter_map(|p| {
            let model = interpolate(trajectory, p.time)?;
            Some(Residual {
                time: p.time,
                altitude: model.altitude - p.altitude,
                velocity: model.velocity - p.speed,
                drag: model.drag - p.drag.abs(),
                mass: p.mass.map(|m| model.mass - m),
            })
        })
        .collect();

    let rms_mass = if !residuals.is_empty() && residuals.iter().all(|r| r.mass.is_some()) {
        Some(rms(&residuals, |r| r.mass.unwrap_or(0.0)))
    } else {
        None
    };

    Comparison {
        rms_altitude: rms(&residuals, |r| r.altitude),
        rms_velocity: rms(&residuals, |r| r.velocity),
        rms_drag: rms(&residuals, |r| r.drag),
        rms_mass,
        residuals,
    }
}

fn rms(residuals: &[Residual], column: impl Fn(&Residual) -> f64) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    (residuals.iter().map(|r| column(r).powi(2)).sum::<f64>() / residuals.len() as f64).sqrt()
}
