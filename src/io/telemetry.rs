//! Recorded flight data: reference telemetry and per-second temperature logs.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AscentError, Result};
use crate::physics::atmosphere::{TemperatureRecord, TemperatureTable};

#[derive(Debug, Deserialize)]
struct TelemetryRecord {
    time: f64,
    altitude: f64,
    speed: f64,
    aero_force: Vec<f64>,
    #[serde(default)]
    mass: Option<f64>,
}

/// One recorded telemetry row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryPoint {
    pub time: f64,     // s
    pub altitude: f64, // m
    pub speed: f64,    // m/s
    pub drag: f64,     // N, second component of the recorded aero force
    pub mass: Option<f64>,
}

/// Ordered recorded flight, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceTelemetry {
    points: Vec<TelemetryPoint>,
}

impl ReferenceTelemetry {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<TelemetryRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<TelemetryRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_records(records: Vec<TelemetryRecord>) -> Result<Self> {
        let mut points: Vec<TelemetryPoint> = Vec::with_capacity(records.len());
        for (index, r) in records.into_iter().enumerate() {
            let drag = *r.aero_force.get(1).ok_or_else(|| AscentError::MalformedTelemetry {
                index,
                reason: format!("aero_force has {} component(s), need at least 2", r.aero_force.len()),
            })?;
            if let Some(prev) = points.last() {
                if r.time < prev.time {
                    return Err(AscentError::MalformedTelemetry {
                        index,
                        reason: format!("time {} goes backwards from {}", r.time, prev.time),
                    });
                }
            }
            points.push(TelemetryPoint {
                time: r.time,
                altitude: r.altitude,
                speed: r.speed,
                drag,
                mass: r.mass,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[TelemetryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when every record carries a mass.
    pub fn has_mass(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.mass.is_some())
    }
}

// ---------------------------------------------------------------------------
// Temperature logs
// ---------------------------------------------------------------------------

/// Parse a temperature log: an array of records indexed by elapsed second,
/// each with a numeric `air_temperature` (K).
///
/// A record whose temperature is missing or not a number is kept as a gap;
/// it only fails if a run actually needs that second.
pub fn temperature_table_from_reader<R: Read>(reader: R) -> Result<TemperatureTable> {
    let records: Vec<Value> = serde_json::from_reader(reader)?;
    let records: Vec<TemperatureRecord> = records
        .iter()
        .map(|r| TemperatureRecord {
            air_temperature: r.get("air_temperature").and_then(Value::as_f64),
        })
        .collect();
    Ok(TemperatureTable::from_records(&records))
}

pub fn load_temperature_table<P: AsRef<Path>>(path: P) -> Result<TemperatureTable> {
    let file = File::open(path)?;
    temperature_table_from_reader(BufReader::new(file))
}
