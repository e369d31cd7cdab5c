use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::dynamics::state::TrajectorySample;
use crate::io::compare::Comparison;

/// Summary statistics computed from an ascent trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AscentSummary {
    pub max_altitude: f64,
    pub max_velocity: f64,
    pub max_mach: f64,
    pub max_drag: f64,
    pub max_drag_time: f64,
    /// First sample at or below the dry mass, if reached.
    pub burnout_time: Option<f64>,
    pub final_time: f64,
    pub final_altitude: f64,
    pub final_velocity: f64,
    pub final_mass: f64,
}

impl AscentSummary {
    /// `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &[TrajectorySample], dry_mass: f64) -> Option<Self> {
        let last = trajectory.last()?;

        let max_drag_sample = trajectory
            .iter()
            .max_by(|a, b| a.drag.total_cmp(&b.drag))?;

        Some(AscentSummary {
            max_altitude: trajectory.iter().map(|s| s.altitude).fold(f64::MIN, f64::max),
            max_velocity: trajectory.iter().map(|s| s.velocity).fold(f64::MIN, f64::max),
            // NaN above the lapse model's range is skipped by f64::max.
            max_mach: trajectory.iter().map(|s| s.mach).fold(0.0_f64, f64::max),
            max_drag: max_drag_sample.drag,
            max_drag_time: max_drag_sample.time,
            burnout_time: trajectory.iter().find(|s| s.mass <= dry_mass).map(|s| s.time),
            final_time: last.time,
            final_altitude: last.altitude,
            final_velocity: last.velocity,
            final_mass: last.mass,
        })
    }
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: &'a str,
    summary: &'a AscentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonTotals>,
}

#[derive(Serialize)]
struct ComparisonTotals {
    points: usize,
    rms_altitude: f64,
    rms_velocity: f64,
    rms_drag: f64,
    rms_mass: Option<f64>,
}

/// Write the ascent summary, and comparison totals when given, as JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    scenario: &str,
    summary: &AscentSummary,
    comparison: Option<&Comparison>,
) -> io::Result<()> {
    let report = Report {
        scenario,
        summary,
        comparison: comparison.map(|c| ComparisonTotals {
            points: c.residuals.len(),
            rms_altitude: c.rms_altitude,
            rms_velocity: c.rms_velocity,
            rms_drag: c.rms_drag,
            rms_mass: c.rms_mass,
        }),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(
    path: P,
    scenario: &str,
    summary: &AscentSummary,
    comparison: Option<&Comparison>,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, scenario, summary, comparison)
}
