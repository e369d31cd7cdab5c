use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::TrajectorySample;

/// Write trajectory data to CSV format.
///
/// Columns: time, altitude, velocity, mass, pitch_deg, drag, mach
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[TrajectorySample]) -> io::Result<()> {
    writeln!(writer, "time,altitude,velocity,mass,pitch_deg,drag,mach")?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.6}",
            s.time, s.altitude, s.velocity, s.mass, s.pitch_deg, s.drag, s.mach,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>>(path: P, trajectory: &[TrajectorySample]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_header_and_rows() {
        let traj = vec![
            TrajectorySample {
                time: 0.0,
                altitude: 1.0,
                velocity: 0.0,
                mass: 133_200.0,
                pitch_deg: -0.375,
                drag: 0.0,
                mach: 0.0,
            },
            TrajectorySample {
                time: 1.0,
                altitude: 1.0,
                velocity: 1.3,
                mass: 132_800.0,
                pitch_deg: -0.375,
                drag: 0.5,
                mach: 0.004,
            },
        ];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,1.0000,"));
        assert!(lines[2].contains("132800.0000"));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.csv");
        write_trajectory_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
